use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api;
use crate::components::layout::{Layout, Page};
use crate::pages::auth::AuthScreen;
use crate::pages::dashboard::DashboardPage;
use crate::pages::profile::ProfilePage;
use crate::pages::transactions::TransactionsPage;
use crate::models::TransactionKind;
use crate::session::{self, Session, SessionHandle, SessionState};

#[function_component(App)]
pub fn app() -> Html {
    let active_page = use_state(|| Page::Dashboard);
    let session_state = use_state(|| SessionState::Checking);
    let session = SessionHandle::new(session_state.clone());

    let on_select = {
        let active_page = active_page.clone();
        Callback::from(move |page: Page| active_page.set(page))
    };

    // Session bootstrap: a persisted token grants optimistic access with
    // whatever identity the token payload carries, then the authoritative
    // record is fetched. Any failure of that fetch ends the session.
    {
        let session = session.clone();
        use_effect_with_deps(
            move |_| {
                match session::stored_token() {
                    None => session.logout(),
                    Some(token) => {
                        let optimistic = Session {
                            user_id: None,
                            username: session::claims_username(&token).unwrap_or_default(),
                            email: None,
                            role: None,
                            token: token.clone(),
                        };
                        session.set_session(optimistic.clone());

                        spawn_local(async move {
                            match api::current_user().await {
                                Ok(profile) => {
                                    session.set_session(Session {
                                        user_id: profile.id,
                                        username: if profile.username.is_empty() {
                                            optimistic.username
                                        } else {
                                            profile.username
                                        },
                                        email: if profile.email.is_empty() {
                                            None
                                        } else {
                                            Some(profile.email)
                                        },
                                        role: profile.role,
                                        token,
                                    });
                                }
                                Err(err) => {
                                    gloo_console::warn!(format!(
                                        "session confirm failed: {}",
                                        err
                                    ));
                                    session.expire();
                                }
                            }
                        });
                    }
                }
                || ()
            },
            (),
        );
    }

    match session.state() {
        SessionState::Checking => html! {
            <div class="min-h-screen flex items-center justify-center bg-background text-muted-foreground">
                {"Checking session..."}
            </div>
        },
        SessionState::Unauthenticated { notice } => {
            let on_authenticated = {
                let session = session.clone();
                let active_page = active_page.clone();
                Callback::from(move |authenticated: Session| {
                    active_page.set(Page::Dashboard);
                    session.set_session(authenticated);
                })
            };
            html! { <AuthScreen on_authenticated={on_authenticated} notice={notice} /> }
        }
        SessionState::Authenticated(_) => {
            let content = match *active_page {
                Page::Dashboard => html! { <DashboardPage /> },
                Page::Income => html! { <TransactionsPage kind={TransactionKind::Income} /> },
                Page::Expense => html! { <TransactionsPage kind={TransactionKind::Expense} /> },
                Page::Profile => html! { <ProfilePage /> },
            };

            html! {
                <ContextProvider<SessionHandle> context={session.clone()}>
                    <Layout active_page={*active_page} on_select={on_select} session={session}>
                        { content }
                    </Layout>
                </ContextProvider<SessionHandle>>
            }
        }
    }
}
