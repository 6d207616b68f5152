use wasm_bindgen_futures::spawn_local;
use web_sys::InputEvent;
use yew::prelude::*;

use crate::api;
use crate::session::Session;

#[derive(Properties, PartialEq)]
pub struct AuthScreenProps {
    pub on_authenticated: Callback<Session>,
    /// Message carried over from a logout or an expired session.
    #[prop_or_default]
    pub notice: Option<String>,
}

fn text_input(
    label: &'static str,
    kind: &'static str,
    value: &UseStateHandle<String>,
) -> Html {
    let handle = value.clone();
    html! {
        <div class="space-y-1">
            <label class="text-sm font-medium text-foreground">{ label }</label>
            <input
                type={kind}
                class="w-full px-4 py-2 bg-input border border-input rounded-lg text-foreground focus:outline-none focus:ring-2 focus:ring-primary"
                value={(**value).clone()}
                oninput={Callback::from(move |e: InputEvent| {
                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                    handle.set(input.value());
                })}
            />
        </div>
    }
}

#[function_component(AuthScreen)]
pub fn auth_screen(props: &AuthScreenProps) -> Html {
    let is_login = use_state(|| true);
    let first_name = use_state(String::new);
    let last_name = use_state(String::new);
    let email = use_state(String::new);
    let username = use_state(String::new);
    let password = use_state(String::new);
    let confirm_password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let info = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let on_submit = {
        let is_login = is_login.clone();
        let first_name = first_name.clone();
        let last_name = last_name.clone();
        let email = email.clone();
        let username = username.clone();
        let password = password.clone();
        let confirm_password = confirm_password.clone();
        let error = error.clone();
        let info = info.clone();
        let loading = loading.clone();
        let on_authenticated = props.on_authenticated.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let username_val = username.trim().to_string();
            let password_val = (*password).clone();

            if username_val.is_empty() || password_val.is_empty() {
                error.set(Some("Username and password are required".to_string()));
                return;
            }

            if *is_login {
                error.set(None);
                info.set(None);
                loading.set(true);

                let error = error.clone();
                let loading = loading.clone();
                let on_authenticated = on_authenticated.clone();
                spawn_local(async move {
                    match api::login(&username_val, &password_val).await {
                        Ok(resp) => {
                            on_authenticated.emit(Session {
                                user_id: resp.id,
                                username: resp.username,
                                email: resp.email,
                                role: resp.role,
                                token: resp.token,
                            });
                        }
                        Err(err) => {
                            error.set(Some(err.login_message()));
                        }
                    }
                    loading.set(false);
                });
                return;
            }

            // Registration path.
            let first_val = first_name.trim().to_string();
            let last_val = last_name.trim().to_string();
            let email_val = email.trim().to_string();

            if first_val.is_empty() || last_val.is_empty() || email_val.is_empty() {
                error.set(Some("All fields are required".to_string()));
                return;
            }
            if password_val.len() < 8 {
                error.set(Some("Password must be at least 8 characters".to_string()));
                return;
            }
            if password_val != *confirm_password {
                error.set(Some("Passwords do not match".to_string()));
                return;
            }

            error.set(None);
            info.set(None);
            loading.set(true);

            let payload = api::RegisterRequest {
                first_name: first_val,
                last_name: last_val,
                email: email_val,
                username: username_val,
                password: password_val,
            };

            let is_login = is_login.clone();
            let error = error.clone();
            let info = info.clone();
            let loading = loading.clone();
            let password = password.clone();
            let confirm_password = confirm_password.clone();
            spawn_local(async move {
                match api::register(&payload).await {
                    Ok(_) => {
                        password.set(String::new());
                        confirm_password.set(String::new());
                        info.set(Some("Account created. Please log in.".to_string()));
                        is_login.set(true);
                    }
                    Err(err) => {
                        // Server validation messages are shown verbatim.
                        error.set(Some(err.to_string()));
                    }
                }
                loading.set(false);
            });
        })
    };

    let toggle_mode = {
        let is_login = is_login.clone();
        let error = error.clone();
        let info = info.clone();
        Callback::from(move |_| {
            error.set(None);
            info.set(None);
            is_login.set(!*is_login);
        })
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-background">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold text-foreground">{ if *is_login { "Welcome back" } else { "Create account" } }</h1>
                    <p class="text-sm text-muted-foreground mt-2">
                        { if *is_login { "Sign in to continue." } else { "Start tracking your money." } }
                    </p>
                </div>

                if let Some(msg) = &props.notice {
                    <div class="mb-4 p-3 rounded-lg bg-amber-50 border border-amber-200 text-amber-700 text-sm">{ msg.clone() }</div>
                }

                if let Some(msg) = &*info {
                    <div class="mb-4 p-3 rounded-lg bg-green-50 border border-green-200 text-green-700 text-sm">{ msg.clone() }</div>
                }

                <form class="space-y-4" onsubmit={on_submit}>
                    if !*is_login {
                        <div class="grid grid-cols-2 gap-3">
                            { text_input("First Name", "text", &first_name) }
                            { text_input("Last Name", "text", &last_name) }
                        </div>
                        { text_input("Email", "email", &email) }
                    }

                    { text_input("Username", "text", &username) }
                    { text_input("Password", "password", &password) }

                    if !*is_login {
                        { text_input("Confirm Password", "password", &confirm_password) }
                    }

                    if let Some(msg) = &*error {
                        <div class="text-sm text-red-500">{ msg.clone() }</div>
                    }

                    <button
                        type="submit"
                        class="w-full bg-primary text-primary-foreground py-2 rounded-lg font-semibold hover:opacity-90 transition-opacity"
                        disabled={*loading}
                    >
                        { if *loading { "Please wait..." } else if *is_login { "Login" } else { "Sign up" } }
                    </button>
                </form>

                <div class="mt-6 text-center text-sm text-muted-foreground">
                    { if *is_login { "No account?" } else { "Already have an account?" } }
                    <button class="ml-2 text-primary font-semibold" onclick={toggle_mode}>
                        { if *is_login { "Sign up" } else { "Login" } }
                    </button>
                </div>
            </div>
        </div>
    }
}
