//! Application Context
//!
//! Shared client handle provided via Leptos Context API.

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_client::api::HttpTransport;
use todo_client::{LocalStorageCredentials, TodoClient};

pub type AppClient = TodoClient<LocalStorageCredentials, HttpTransport>;

/// App-wide handle to the todo client
#[derive(Clone, Copy)]
pub struct AppContext {
    /// The client is `!Send`, so it lives in local storage of the arena
    client: StoredValue<AppClient, LocalStorage>,
}

impl AppContext {
    pub fn new(client: AppClient) -> Self {
        Self {
            client: StoredValue::new_local(client),
        }
    }

    /// Run a synchronous intent (logout, auth mode switch)
    pub fn with_client<R>(&self, f: impl FnOnce(&AppClient) -> R) -> R {
        self.client.with_value(f)
    }

    /// Run an async intent on the event loop
    pub fn dispatch<F, Fut>(&self, f: F)
    where
        F: FnOnce(AppClient) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        let client = self.client.with_value(|c| c.clone());
        spawn_local(f(client));
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
