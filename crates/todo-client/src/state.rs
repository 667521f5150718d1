//! Client State
//!
//! The single observable snapshot of session, task collection and
//! user-visible messages, plus sequencing for task-list refreshes.

use std::cell::{Cell, RefCell};

use crate::models::Task;

/// Logged-in status, derived from credential presence
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    LoggedOut,
    /// `username` is unknown when the session was restored from storage
    LoggedIn { username: Option<String> },
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::LoggedIn { .. })
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Session::LoggedIn { username } => username.as_deref(),
            Session::LoggedOut => None,
        }
    }
}

/// Which form the logged-out view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }
}

/// Everything the view renders besides its own form drafts
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClientState {
    pub session: Session,
    /// Last successfully fetched collection, in server order
    pub tasks: Vec<Task>,
    /// At most one error message
    pub error: Option<String>,
    /// Informational message (registration confirmed, logged out)
    pub notice: Option<String>,
    pub auth_mode: AuthMode,
}

impl ClientState {
    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn open_count(&self) -> usize {
        open_count(&self.tasks)
    }

    pub fn done_count(&self) -> usize {
        done_count(&self.tasks)
    }

    /// The only write path for `tasks`: always a wholesale replacement
    pub fn replace_collection(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }
}

pub fn open_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| !t.done).count()
}

pub fn done_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| t.done).count()
}

type Listener = Box<dyn Fn(&ClientState)>;

/// Owner of [`ClientState`]; every write notifies subscribers with a fresh snapshot
#[derive(Default)]
pub struct StateStore {
    state: RefCell<ClientState>,
    listeners: RefCell<Vec<Listener>>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ClientState {
        self.state.borrow().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&ClientState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Register a listener called after every change
    pub fn subscribe(&self, listener: impl Fn(&ClientState) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn update(&self, f: impl FnOnce(&mut ClientState)) {
        f(&mut self.state.borrow_mut());
        self.notify();
    }

    /// Apply a successfully fetched collection; a good fetch also clears
    /// the error slot
    pub fn replace_collection(&self, tasks: Vec<Task>) {
        self.update(|s| {
            s.replace_collection(tasks);
            s.error = None;
        });
    }

    /// Clear error and notice at the start of an operation attempt
    pub fn begin_operation(&self) {
        self.update(|s| {
            s.error = None;
            s.notice = None;
        });
    }

    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|s| s.error = Some(message));
    }

    pub fn clear_error(&self) {
        self.update(|s| s.error = None);
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        for listener in self.listeners.borrow().iter() {
            listener(&snapshot);
        }
    }
}

/// Identifies one issued refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket {
    seq: u64,
    epoch: u64,
}

impl RefreshTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Orders refresh responses and tracks session epochs.
///
/// A refresh result is applied only when it is newer than the last applied
/// one and no session transition happened while it was in flight.
#[derive(Debug, Default)]
pub struct RefreshSequencer {
    issued: Cell<u64>,
    applied: Cell<u64>,
    epoch: Cell<u64>,
}

impl RefreshSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> RefreshTicket {
        let seq = self.issued.get() + 1;
        self.issued.set(seq);
        RefreshTicket {
            seq,
            epoch: self.epoch.get(),
        }
    }

    /// Whether the response for `ticket` may replace the collection.
    /// Accepting a ticket makes every older ticket stale.
    pub fn accept(&self, ticket: RefreshTicket) -> bool {
        if ticket.epoch != self.epoch.get() || ticket.seq <= self.applied.get() {
            return false;
        }
        self.applied.set(ticket.seq);
        true
    }

    /// A newer refresh has already been applied
    pub fn is_stale(&self, ticket: RefreshTicket) -> bool {
        ticket.seq <= self.applied.get()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch.get() == epoch
    }

    /// Called on every login/logout; invalidates everything in flight
    pub fn new_epoch(&self) {
        self.epoch.set(self.epoch.get() + 1);
    }
}
