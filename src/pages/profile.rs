use wasm_bindgen_futures::spawn_local;
use web_sys::InputEvent;
use yew::prelude::*;

use crate::api::{self, UserProfile};
use crate::components::layout::page_shell;
use crate::session::SessionHandle;

fn field(
    label: &'static str,
    kind: &'static str,
    value: &UseStateHandle<String>,
    disabled: bool,
) -> Html {
    let handle = value.clone();
    html! {
        <div class="space-y-1">
            <label class="text-[12px] font-bold text-muted-foreground">{ label }</label>
            <input
                type={kind}
                value={(**value).clone()}
                disabled={disabled}
                oninput={Callback::from(move |e: InputEvent| {
                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                    handle.set(input.value());
                })}
                class="w-full bg-[#f1f4f9] rounded-[10px] px-3 py-2 text-[12px] text-[#173E63] border-none disabled:opacity-60"
            />
        </div>
    }
}

#[function_component(ProfilePage)]
pub fn profile_page() -> Html {
    let session = use_context::<SessionHandle>();

    let profile = use_state(UserProfile::default);
    let loading = use_state(|| true);
    let first_name = use_state(String::new);
    let last_name = use_state(String::new);
    let email = use_state(String::new);
    let username = use_state(String::new);
    let profile_error = use_state(|| None::<String>);
    let profile_success = use_state(|| None::<String>);
    let saving = use_state(|| false);

    let current_password = use_state(String::new);
    let new_password = use_state(String::new);
    let confirm_password = use_state(String::new);
    let password_error = use_state(|| None::<String>);
    let password_success = use_state(|| None::<String>);
    let changing = use_state(|| false);

    {
        let profile = profile.clone();
        let loading = loading.clone();
        let first_name = first_name.clone();
        let last_name = last_name.clone();
        let email = email.clone();
        let username = username.clone();
        let profile_error = profile_error.clone();
        let session = session.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    match api::fetch_profile().await {
                        Ok(fetched) => {
                            first_name.set(fetched.first_name.clone());
                            last_name.set(fetched.last_name.clone());
                            email.set(fetched.email.clone());
                            username.set(fetched.username.clone());
                            profile.set(fetched);
                        }
                        Err(err) => {
                            if err.is_unauthorized() {
                                if let Some(session) = session {
                                    session.expire();
                                }
                                return;
                            }
                            profile_error.set(Some(err.to_string()));
                        }
                    }
                    loading.set(false);
                });
                || ()
            },
            (),
        );
    }

    let on_save_profile = {
        let profile = profile.clone();
        let first_name = first_name.clone();
        let last_name = last_name.clone();
        let email = email.clone();
        let profile_error = profile_error.clone();
        let profile_success = profile_success.clone();
        let saving = saving.clone();
        let session = session.clone();
        Callback::from(move |_| {
            let first_val = first_name.trim().to_string();
            let last_val = last_name.trim().to_string();
            let email_val = email.trim().to_string();

            if first_val.is_empty() || last_val.is_empty() || email_val.is_empty() {
                profile_error.set(Some("All profile fields are required.".to_string()));
                return;
            }

            let payload = UserProfile {
                first_name: first_val,
                last_name: last_val,
                email: email_val,
                ..(*profile).clone()
            };

            profile_error.set(None);
            profile_success.set(None);
            saving.set(true);

            let profile = profile.clone();
            let profile_error = profile_error.clone();
            let profile_success = profile_success.clone();
            let saving = saving.clone();
            let session = session.clone();
            spawn_local(async move {
                match api::update_profile(&payload).await {
                    Ok(updated) => {
                        profile.set(updated);
                        profile_success.set(Some("Profile updated.".to_string()));
                    }
                    Err(err) => {
                        if err.is_unauthorized() {
                            if let Some(session) = session {
                                session.expire();
                            }
                            return;
                        }
                        profile_error.set(Some(err.to_string()));
                    }
                }
                saving.set(false);
            });
        })
    };

    let on_change_password = {
        let current_password = current_password.clone();
        let new_password = new_password.clone();
        let confirm_password = confirm_password.clone();
        let password_error = password_error.clone();
        let password_success = password_success.clone();
        let changing = changing.clone();
        let session = session.clone();
        Callback::from(move |_| {
            let current_val = (*current_password).clone();
            let new_val = (*new_password).clone();
            let confirm_val = (*confirm_password).clone();

            if current_val.is_empty() || new_val.is_empty() {
                password_error.set(Some("Current and new password are required.".to_string()));
                return;
            }
            if new_val.len() < 8 {
                password_error.set(Some("New password must be at least 8 characters.".to_string()));
                return;
            }
            if new_val != confirm_val {
                password_error.set(Some("New passwords do not match.".to_string()));
                return;
            }

            password_error.set(None);
            password_success.set(None);
            changing.set(true);

            let current_password = current_password.clone();
            let new_password = new_password.clone();
            let confirm_password = confirm_password.clone();
            let password_error = password_error.clone();
            let password_success = password_success.clone();
            let changing = changing.clone();
            let session = session.clone();
            spawn_local(async move {
                match api::change_password(&current_val, &new_val).await {
                    Ok(()) => {
                        current_password.set(String::new());
                        new_password.set(String::new());
                        confirm_password.set(String::new());
                        password_success.set(Some("Password changed.".to_string()));
                    }
                    Err(err) => {
                        if err.is_unauthorized() {
                            if let Some(session) = session {
                                session.expire();
                            }
                            return;
                        }
                        password_error.set(Some(err.to_string()));
                    }
                }
                changing.set(false);
            });
        })
    };

    html! {
        { page_shell(
            "Profile",
            html! {},
            html! {
                <>
                    <div class="grid grid-cols-1 lg:grid-cols-2 gap-6 items-start">
                        <div class="bg-white p-6 rounded-[10px] shadow-sm border border-white/50 space-y-4">
                            <h4 class="text-[#1D617A] font-bold text-[15px] tracking-wider">{"Account Details"}</h4>
                            { if *loading {
                                html! { <p class="text-sm text-muted-foreground">{"Loading..."}</p> }
                            } else {
                                html! {
                                    <>
                                        <div class="grid grid-cols-2 gap-3">
                                            { field("First Name", "text", &first_name, false) }
                                            { field("Last Name", "text", &last_name, false) }
                                        </div>
                                        { field("Username", "text", &username, true) }
                                        { field("Email", "email", &email, false) }
                                        <button onclick={on_save_profile} class="w-full bg-[#173E63] text-white py-2.5 rounded-[10px] text-[11px] font-bold" disabled={*saving}>
                                            { if *saving { "Saving..." } else { "Save Changes" } }
                                        </button>
                                        {
                                            if let Some(msg) = &*profile_error {
                                                html! { <p class="text-sm text-red-500">{ msg.clone() }</p> }
                                            } else if let Some(msg) = &*profile_success {
                                                html! { <p class="text-sm text-green-600">{ msg.clone() }</p> }
                                            } else { html! {} }
                                        }
                                    </>
                                }
                            }}
                        </div>

                        <div class="bg-white p-6 rounded-[10px] shadow-sm border border-white/50 space-y-4">
                            <h4 class="text-[#1D617A] font-bold text-[15px] tracking-wider">{"Change Password"}</h4>
                            { field("Current Password", "password", &current_password, false) }
                            { field("New Password", "password", &new_password, false) }
                            { field("Confirm New Password", "password", &confirm_password, false) }
                            <button onclick={on_change_password} class="w-full bg-[#173E63] text-white py-2.5 rounded-[10px] text-[11px] font-bold" disabled={*changing}>
                                { if *changing { "Updating..." } else { "Change Password" } }
                            </button>
                            {
                                if let Some(msg) = &*password_error {
                                    html! { <p class="text-sm text-red-500">{ msg.clone() }</p> }
                                } else if let Some(msg) = &*password_success {
                                    html! { <p class="text-sm text-green-600">{ msg.clone() }</p> }
                                } else { html! {} }
                            }
                        </div>
                    </div>
                </>
            }
        ) }
    }
}
