//! Session Bar Component
//!
//! Greeting plus the logout control.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn SessionBar() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    // Restored sessions don't know the username
    let greeting = move || {
        let session = store.session().get();
        format!("Welcome, {}!", session.username().unwrap_or("user"))
    };

    view! {
        <div class="session-bar">
            <span class="greeting">{greeting}</span>
            <button class="logout-btn" on:click=move |_| ctx.with_client(|client| client.logout())>
                "Log out"
            </button>
        </div>
    }
}
