//! Reactive Mirror of Client State
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The todo
//! client pushes every snapshot here; components only read.

use leptos::prelude::*;
use reactive_stores::Store;
use todo_client::{AuthMode, ClientState, Session, Task};

/// View-facing copy of the client state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    pub session: Session,
    pub tasks: Vec<Task>,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub auth_mode: AuthMode,
}

impl From<&ClientState> for AppState {
    fn from(state: &ClientState) -> Self {
        Self {
            session: state.session.clone(),
            tasks: state.tasks.clone(),
            error: state.error.clone(),
            notice: state.notice.clone(),
            auth_mode: state.auth_mode,
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

/// Copy a client snapshot into the store, touching only changed fields
pub fn store_sync(store: &AppStore, state: &ClientState) {
    if store.session().with_untracked(|s| s != &state.session) {
        *store.session().write() = state.session.clone();
    }
    if store.tasks().with_untracked(|t| t != &state.tasks) {
        *store.tasks().write() = state.tasks.clone();
    }
    if store.error().with_untracked(|e| e != &state.error) {
        *store.error().write() = state.error.clone();
    }
    if store.notice().with_untracked(|n| n != &state.notice) {
        *store.notice().write() = state.notice.clone();
    }
    if store.auth_mode().get_untracked() != state.auth_mode {
        *store.auth_mode().write() = state.auth_mode;
    }
}
