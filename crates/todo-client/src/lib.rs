//! Todo Client Core
//!
//! Keeps local UI state, the persisted credential and the server's task list
//! consistent. Layered like the rest of the app:
//! - credentials: persisted bearer token slot
//! - api: REST endpoints over a pluggable transport
//! - state: observable client state and refresh sequencing
//! - session / tasks: controllers that own the state transitions
//! - client: facade wiring the controllers together

mod client;
mod config;
mod credentials;
mod models;
mod session;
mod state;
mod tasks;

pub mod api;

#[cfg(test)]
mod testing;

pub use client::TodoClient;
pub use config::{ClientConfig, DEFAULT_STORAGE_KEY};
pub use credentials::{CredentialStore, LocalStorageCredentials, MemoryCredentials};
pub use models::{Credentials, LoginResponse, MessageBody, Task, TaskId};
pub use session::{SessionController, LOGGED_OUT_NOTICE, SESSION_EXPIRED_MESSAGE};
pub use state::{
    done_count, open_count, AuthMode, ClientState, RefreshSequencer, RefreshTicket, Session,
    StateStore,
};
pub use tasks::{TaskListController, EMPTY_TITLE_MESSAGE};
