//! Status Banner Component
//!
//! Renders the error slot and the notice slot.

use leptos::prelude::*;

use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn StatusBanner() -> impl IntoView {
    let store = use_app_store();

    view! {
        {move || store.error().get().map(|msg| view! {
            <p class="status error" role="alert">{msg}</p>
        })}
        {move || store.notice().get().map(|msg| view! {
            <p class="status notice">{msg}</p>
        })}
    }
}
