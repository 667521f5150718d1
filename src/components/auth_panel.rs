//! Auth Panel Component
//!
//! Login or registration form, switchable in place.

use leptos::prelude::*;
use todo_client::AuthMode;

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn AuthPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let is_register = move || store.auth_mode().get() == AuthMode::Register;

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let user = username.get_untracked();
        let pass = password.get_untracked();
        let mode = store.auth_mode().get_untracked();

        ctx.dispatch(move |client| async move {
            let accepted = match mode {
                AuthMode::Login => client.login(&user, &pass).await,
                AuthMode::Register => client.register(&user, &pass).await,
            };
            if accepted {
                set_username.set(String::new());
                set_password.set(String::new());
            }
        });
    };

    let switch_mode = move |_| {
        let next = store.auth_mode().get_untracked().toggled();
        ctx.with_client(|client| client.set_auth_mode(next));
    };

    view! {
        <div class="auth-panel">
            <h2>{move || if is_register() { "Register" } else { "Log in" }}</h2>
            <form class="auth-form" on:submit=submit>
                <input
                    type="text"
                    placeholder="Username"
                    autocomplete="username"
                    prop:value=move || username.get()
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                    required
                />
                <input
                    type="password"
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                    required
                />
                <button type="submit">
                    {move || if is_register() { "Create account" } else { "Log in" }}
                </button>
            </form>
            <p class="auth-switch">
                {move || if is_register() { "Already have an account? " } else { "No account yet? " }}
                <button type="button" class="link-btn" on:click=switch_mode>
                    {move || if is_register() { "Log in" } else { "Register" }}
                </button>
            </p>
        </div>
    }
}
