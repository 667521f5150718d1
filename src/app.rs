//! Todo Web Client App
//!
//! Root component: login/registration when logged out, the task list
//! when logged in.

use leptos::prelude::*;
use reactive_stores::Store;
use todo_client::api::HttpTransport;
use todo_client::{LocalStorageCredentials, TodoClient};

use crate::components::{AuthPanel, NewTaskForm, SessionBar, StatusBanner, TaskList};
use crate::config;
use crate::context::AppContext;
use crate::store::{store_sync, AppState, AppStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let config = config::client_config();
    log::info!("API base URL: {}", config.base_url);

    let credentials = LocalStorageCredentials::new(config.storage_key.clone());
    let client = TodoClient::new(credentials, HttpTransport::new(config));

    // Mirror every client state change into the reactive store
    let store = Store::new(AppState::from(&client.snapshot()));
    client.subscribe(move |state| store_sync(&store, state));

    let ctx = AppContext::new(client);
    provide_context(ctx);
    provide_context(store);

    // Restored sessions load their tasks on mount
    ctx.dispatch(|client| async move { client.start().await });

    view! {
        <div class="app">
            <header class="app-header">
                <h1>"Todo List"</h1>
            </header>

            <StatusBanner />

            <Show
                when=move || store.session().get().is_logged_in()
                fallback=|| view! { <AuthPanel /> }
            >
                <SessionBar />
                <NewTaskForm />
                <TaskList />
            </Show>
        </div>
    }
}
