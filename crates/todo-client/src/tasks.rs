//! Task List Controller
//!
//! Holds the last server snapshot of the task collection. Mutations never
//! patch it locally: each successful mutation is followed by a full refetch.

use std::rc::Rc;

use crate::api::{ApiError, Transport};
use crate::client::{failure_message, Core};
use crate::credentials::CredentialStore;
use crate::models::{Task, TaskId};
use crate::session::SessionController;

/// Validation error for blank titles
pub const EMPTY_TITLE_MESSAGE: &str = "Task title cannot be empty.";

pub struct TaskListController<C, T> {
    core: Rc<Core<C, T>>,
    session: SessionController<C, T>,
}

impl<C, T> Clone for TaskListController<C, T> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
            session: self.session.clone(),
        }
    }
}

impl<C: CredentialStore, T: Transport> TaskListController<C, T> {
    pub(crate) fn new(core: Rc<Core<C, T>>, session: SessionController<C, T>) -> Self {
        Self { core, session }
    }

    /// Refetch the authoritative collection. Without a credential this is a
    /// no-op that leaves the error slot alone. Returns whether the fetched
    /// collection was applied.
    pub async fn refresh(&self) -> bool {
        let Some(token) = self.session.credential() else {
            return false;
        };

        let ticket = self.core.sequencer.issue();
        match self.core.api.list_tasks(Some(&token)).await {
            Ok(tasks) => {
                if !self.core.sequencer.accept(ticket) {
                    log::debug!("Discarding stale task list");
                    return false;
                }
                log::debug!("Loaded {} tasks", tasks.len());
                self.replace_collection(tasks);
                true
            }
            Err(e) => {
                if !e.is_unauthorized() && self.core.sequencer.is_stale(ticket) {
                    log::debug!("Ignoring failure of a superseded refresh: {}", e);
                    return false;
                }
                self.fail(ticket.epoch(), "Could not load tasks", e);
                false
            }
        }
    }

    /// Create a task titled `title` (trimmed). Blank titles are rejected
    /// without a request. Returns whether the server accepted the task.
    pub async fn add(&self, title: &str) -> bool {
        self.core.state.begin_operation();
        let title = title.trim();
        if title.is_empty() {
            self.core.state.set_error(EMPTY_TITLE_MESSAGE);
            return false;
        }

        let epoch = self.core.sequencer.epoch();
        let token = self.session.credential();
        let result = self.core.api.create_task(title, token.as_deref()).await;
        self.finish(epoch, "Could not add task", result.map(|_| ())).await
    }

    /// Flip the done flag: sends `!current_done`
    pub async fn toggle(&self, id: TaskId, current_done: bool) -> bool {
        self.core.state.begin_operation();
        let epoch = self.core.sequencer.epoch();
        let token = self.session.credential();
        let result = self
            .core
            .api
            .set_task_done(id, !current_done, token.as_deref())
            .await;
        self.finish(epoch, "Could not update task", result.map(|_| ()))
            .await
    }

    pub async fn remove(&self, id: TaskId) -> bool {
        self.core.state.begin_operation();
        let epoch = self.core.sequencer.epoch();
        let token = self.session.credential();
        let result = self.core.api.delete_task(id, token.as_deref()).await;
        self.finish(epoch, "Could not delete task", result).await
    }

    /// Change a task's title; blank titles are rejected like in [`Self::add`]
    pub async fn rename(&self, id: TaskId, title: &str) -> bool {
        self.core.state.begin_operation();
        let title = title.trim();
        if title.is_empty() {
            self.core.state.set_error(EMPTY_TITLE_MESSAGE);
            return false;
        }

        let epoch = self.core.sequencer.epoch();
        let token = self.session.credential();
        let result = self
            .core
            .api
            .update_task_title(id, title, token.as_deref())
            .await;
        self.finish(epoch, "Could not rename task", result.map(|_| ()))
            .await
    }

    /// Replace the whole collection with a fetched server snapshot
    pub fn replace_collection(&self, tasks: Vec<Task>) {
        self.core.state.replace_collection(tasks);
    }

    /// Shared tail of every mutation: refetch on success, report on failure
    async fn finish(&self, epoch: u64, action: &str, result: Result<(), ApiError>) -> bool {
        match result {
            Ok(()) => {
                if !self.core.sequencer.is_current(epoch) {
                    log::debug!("{}: session changed while in flight", action);
                    return false;
                }
                self.core.state.clear_error();
                self.refresh().await;
                true
            }
            Err(e) => {
                self.fail(epoch, action, e);
                false
            }
        }
    }

    fn fail(&self, epoch: u64, action: &str, error: ApiError) {
        if !self.core.sequencer.is_current(epoch) {
            log::debug!("{}: ignoring failure from a previous session: {}", action, error);
            return;
        }
        if error.is_unauthorized() {
            self.session.force_logout();
        } else {
            self.core.state.set_error(failure_message(action, &error));
        }
    }
}
