//! Credential Store
//!
//! A single persisted slot holding the bearer token. Operations are
//! synchronous, idempotent and touch only the configured key.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::DEFAULT_STORAGE_KEY;

/// Persisted bearer token slot
pub trait CredentialStore {
    /// Current token, if one is persisted
    fn get(&self) -> Option<String>;

    /// Persist a token, replacing any previous one
    fn set(&self, token: &str);

    /// Remove the persisted token
    fn clear(&self);
}

/// Token slot in the browser's `localStorage`
#[derive(Debug, Clone)]
pub struct LocalStorageCredentials {
    key: String,
}

impl LocalStorageCredentials {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage(&self) -> Option<web_sys::Storage> {
        match web_sys::window().map(|w| w.local_storage()) {
            Some(Ok(Some(storage))) => Some(storage),
            Some(Err(e)) => {
                log::warn!("localStorage unavailable: {:?}", e);
                None
            }
            _ => {
                log::warn!("localStorage unavailable");
                None
            }
        }
    }
}

impl Default for LocalStorageCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_KEY)
    }
}

impl CredentialStore for LocalStorageCredentials {
    fn get(&self) -> Option<String> {
        match self.storage()?.get_item(&self.key) {
            Ok(token) => token,
            Err(e) => {
                log::warn!("Failed to read credential under {}: {:?}", self.key, e);
                None
            }
        }
    }

    fn set(&self, token: &str) {
        if let Some(storage) = self.storage() {
            if let Err(e) = storage.set_item(&self.key, token) {
                log::warn!("Failed to persist credential under {}: {:?}", self.key, e);
            }
        }
    }

    fn clear(&self) {
        if let Some(storage) = self.storage() {
            if let Err(e) = storage.remove_item(&self.key) {
                log::warn!("Failed to clear credential under {}: {:?}", self.key, e);
            }
        }
    }
}

/// In-memory token slot. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentials {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token already persisted
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(token.into()))),
        }
    }
}

impl CredentialStore for MemoryCredentials {
    fn get(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    fn set(&self, token: &str) {
        *self.slot.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.slot.borrow_mut() = None;
    }
}
