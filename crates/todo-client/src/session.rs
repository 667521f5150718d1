//! Session Controller
//!
//! Owns the logged-out / logged-in state machine and the persisted
//! credential. The session is always a function of the credential:
//! every write to the credential slot is paired with a session update.

use std::rc::Rc;

use crate::api::Transport;
use crate::client::{failure_message, Core};
use crate::credentials::CredentialStore;
use crate::state::{AuthMode, Session};

/// Shown after a rejected credential forces a logout
pub const SESSION_EXPIRED_MESSAGE: &str =
    "Your session has expired or is invalid. Please log in again.";

/// Shown after an explicit logout
pub const LOGGED_OUT_NOTICE: &str = "Session closed.";

const MISSING_CREDENTIALS_MESSAGE: &str = "Username and password are required.";

pub struct SessionController<C, T> {
    core: Rc<Core<C, T>>,
}

impl<C, T> Clone for SessionController<C, T> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<C: CredentialStore, T: Transport> SessionController<C, T> {
    pub(crate) fn new(core: Rc<Core<C, T>>) -> Self {
        Self { core }
    }

    /// Current bearer token, if any
    pub fn credential(&self) -> Option<String> {
        self.core.credentials.get()
    }

    pub fn is_logged_in(&self) -> bool {
        self.core.state.read(|s| s.is_logged_in())
    }

    /// Enter `LoggedIn` if a credential was persisted, without asking the
    /// server. Returns whether a session was restored.
    pub fn restore(&self) -> bool {
        match self.credential() {
            Some(_) => {
                log::info!("Restoring session from persisted credential");
                self.core.state.update(|s| {
                    s.session = Session::LoggedIn { username: None };
                });
                true
            }
            None => {
                self.core.state.update(|s| s.session = Session::LoggedOut);
                false
            }
        }
    }

    /// Exchange username/password for a token. On success the token is
    /// persisted and the session becomes `LoggedIn`.
    pub async fn login(&self, username: &str, password: &str) -> bool {
        self.core.state.begin_operation();
        if !validate_credentials(username, password) {
            self.core.state.set_error(MISSING_CREDENTIALS_MESSAGE);
            return false;
        }

        match self.core.api.login(username, password).await {
            Ok(login) => {
                self.core.credentials.set(&login.access_token);
                self.core.sequencer.new_epoch();
                let username = username.to_string();
                self.core.state.update(|s| {
                    s.session = Session::LoggedIn {
                        username: Some(username),
                    };
                    s.error = None;
                });
                log::info!("Logged in");
                true
            }
            Err(e) => {
                // 401 here means bad credentials, not an expired session
                self.core.state.set_error(failure_message("Login failed", &e));
                false
            }
        }
    }

    /// Create an account. No credential is issued; the form switches to
    /// login mode and the server's confirmation becomes the notice.
    pub async fn register(&self, username: &str, password: &str) -> bool {
        self.core.state.begin_operation();
        if !validate_credentials(username, password) {
            self.core.state.set_error(MISSING_CREDENTIALS_MESSAGE);
            return false;
        }

        match self.core.api.register(username, password).await {
            Ok(body) => {
                self.core.state.update(|s| {
                    s.auth_mode = AuthMode::Login;
                    s.notice = Some(body.msg);
                });
                log::info!("Registered new account");
                true
            }
            Err(e) => {
                self.core
                    .state
                    .set_error(failure_message("Registration failed", &e));
                false
            }
        }
    }

    /// User-initiated logout. Never touches the network.
    pub fn logout(&self) {
        self.end_session(None, Some(LOGGED_OUT_NOTICE.to_string()));
        log::info!("Logged out");
    }

    /// Logout after the server rejected the credential. The expiry
    /// message stays in the error slot.
    pub fn force_logout(&self) {
        self.end_session(Some(SESSION_EXPIRED_MESSAGE.to_string()), None);
        log::warn!("Credential rejected, session ended");
    }

    pub fn set_auth_mode(&self, mode: AuthMode) {
        self.core.state.update(|s| s.auth_mode = mode);
    }

    fn end_session(&self, error: Option<String>, notice: Option<String>) {
        self.core.credentials.clear();
        self.core.sequencer.new_epoch();
        self.core.state.update(|s| {
            s.session = Session::LoggedOut;
            s.replace_collection(Vec::new());
            s.error = error;
            s.notice = notice;
        });
    }
}

fn validate_credentials(username: &str, password: &str) -> bool {
    !username.trim().is_empty() && !password.is_empty()
}
