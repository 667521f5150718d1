//! Todo Client Facade
//!
//! Wires the session and task-list controllers over one shared core and
//! exposes the user intents the view emits.

use std::rc::Rc;

use crate::api::{ApiClient, ApiError, Transport};
use crate::credentials::CredentialStore;
use crate::models::TaskId;
use crate::session::SessionController;
use crate::state::{AuthMode, ClientState, RefreshSequencer, StateStore};
use crate::tasks::TaskListController;

const NETWORK_MESSAGE: &str = "could not reach the server. Is the backend running?";

/// Dependencies shared by both controllers
pub(crate) struct Core<C, T> {
    pub(crate) api: ApiClient<T>,
    pub(crate) credentials: C,
    pub(crate) state: StateStore,
    pub(crate) sequencer: RefreshSequencer,
}

/// User-facing text for a failed call
pub(crate) fn failure_message(action: &str, error: &ApiError) -> String {
    match error {
        ApiError::Unauthorized { message } => format!("{}: HTTP 401 - {}", action, message),
        ApiError::Status { status, message } => format!("{}: HTTP {} - {}", action, status, message),
        ApiError::Transport(_) => format!("{}: {}", action, NETWORK_MESSAGE),
        ApiError::Decode(detail) => format!("{}: unexpected server response ({})", action, detail),
    }
}

/// Entry point for the view: one method per user intent
pub struct TodoClient<C, T> {
    core: Rc<Core<C, T>>,
    session: SessionController<C, T>,
    tasks: TaskListController<C, T>,
}

impl<C, T> Clone for TodoClient<C, T> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
            session: self.session.clone(),
            tasks: self.tasks.clone(),
        }
    }
}

impl<C: CredentialStore, T: Transport> TodoClient<C, T> {
    /// Build the client. The initial session is derived from whatever
    /// credential is already persisted; no request is made yet.
    pub fn new(credentials: C, transport: T) -> Self {
        let core = Rc::new(Core {
            api: ApiClient::new(transport),
            credentials,
            state: StateStore::new(),
            sequencer: RefreshSequencer::new(),
        });
        let session = SessionController::new(Rc::clone(&core));
        let tasks = TaskListController::new(Rc::clone(&core), session.clone());
        session.restore();
        Self {
            core,
            session,
            tasks,
        }
    }

    pub fn session(&self) -> &SessionController<C, T> {
        &self.session
    }

    pub fn tasks(&self) -> &TaskListController<C, T> {
        &self.tasks
    }

    pub fn state(&self) -> &StateStore {
        &self.core.state
    }

    pub fn snapshot(&self) -> ClientState {
        self.core.state.snapshot()
    }

    pub fn subscribe(&self, listener: impl Fn(&ClientState) + 'static) {
        self.core.state.subscribe(listener);
    }

    /// Initial load: a restored session fetches its tasks right away
    pub async fn start(&self) {
        if self.session.is_logged_in() {
            self.tasks.refresh().await;
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> bool {
        if !self.session.login(username, password).await {
            return false;
        }
        self.tasks.refresh().await;
        true
    }

    pub async fn register(&self, username: &str, password: &str) -> bool {
        self.session.register(username, password).await
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    pub fn set_auth_mode(&self, mode: AuthMode) {
        self.session.set_auth_mode(mode);
    }

    pub async fn refresh(&self) -> bool {
        self.tasks.refresh().await
    }

    pub async fn add_task(&self, title: &str) -> bool {
        self.tasks.add(title).await
    }

    pub async fn toggle_task(&self, id: TaskId, current_done: bool) -> bool {
        self.tasks.toggle(id, current_done).await
    }

    pub async fn delete_task(&self, id: TaskId) -> bool {
        self.tasks.remove(id).await
    }

    pub async fn rename_task(&self, id: TaskId, title: &str) -> bool {
        self.tasks.rename(id, title).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Method;
    use crate::credentials::MemoryCredentials;
    use crate::session::{LOGGED_OUT_NOTICE, SESSION_EXPIRED_MESSAGE};
    use crate::state::Session;
    use crate::tasks::EMPTY_TITLE_MESSAGE;
    use crate::testing::{GatedTransport, ScriptedTransport};

    const TWO_TASKS: &str = r#"[
        {"id": 1, "title": "Buy milk", "done": false, "created_at": "Tue, 03 Jun 2025 10:15:00 GMT"},
        {"id": 2, "title": "Walk dog", "done": true, "created_at": "Tue, 03 Jun 2025 11:00:00 GMT"}
    ]"#;

    type TestClient = TodoClient<MemoryCredentials, ScriptedTransport>;

    fn setup(credentials: MemoryCredentials) -> (TestClient, MemoryCredentials, ScriptedTransport) {
        let transport = ScriptedTransport::new();
        let client = TodoClient::new(credentials.clone(), transport.clone());
        (client, credentials, transport)
    }

    /// Client restored from a persisted token with the given task list loaded
    async fn logged_in_with(body: &str) -> (TestClient, MemoryCredentials, ScriptedTransport) {
        let (client, credentials, transport) = setup(MemoryCredentials::with_token("abc"));
        transport.respond(200, body);
        client.start().await;
        (client, credentials, transport)
    }

    #[tokio::test]
    async fn test_starts_logged_out_without_credential() {
        let (client, _, transport) = setup(MemoryCredentials::new());
        client.start().await;

        let state = client.snapshot();
        assert_eq!(state.session, Session::LoggedOut);
        assert!(state.tasks.is_empty());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_login_persists_token_and_refreshes_once() {
        let (client, credentials, transport) = setup(MemoryCredentials::new());
        transport.respond(200, r#"{"access_token": "tok"}"#);
        transport.respond(200, TWO_TASKS);

        assert!(client.login("ana", "pw").await);

        assert_eq!(credentials.get().as_deref(), Some("tok"));
        let state = client.snapshot();
        assert_eq!(
            state.session,
            Session::LoggedIn {
                username: Some("ana".to_string())
            }
        );
        assert_eq!(state.tasks.len(), 2);
        assert_eq!(transport.count(Method::Post, "/login"), 1);
        assert_eq!(transport.count(Method::Get, "/tasks"), 1);
        assert_eq!(
            transport.last_request().unwrap().header_value("Authorization"),
            Some("Bearer tok")
        );
    }

    #[tokio::test]
    async fn test_bad_login_is_not_a_forced_logout() {
        let (client, credentials, transport) = setup(MemoryCredentials::new());
        transport.respond(401, r#"{"msg": "Bad username or password"}"#);

        assert!(!client.login("ana", "wrong").await);

        let state = client.snapshot();
        assert_eq!(state.session, Session::LoggedOut);
        assert_eq!(
            state.error.as_deref(),
            Some("Login failed: HTTP 401 - Bad username or password")
        );
        assert_eq!(credentials.get(), None);
        assert_eq!(transport.count(Method::Get, "/tasks"), 0);
    }

    #[tokio::test]
    async fn test_login_requires_username_and_password() {
        let (client, _, transport) = setup(MemoryCredentials::new());

        assert!(!client.login("  ", "pw").await);
        assert!(!client.login("ana", "").await);

        assert!(transport.requests().is_empty());
        assert!(client.snapshot().error.is_some());
    }

    #[tokio::test]
    async fn test_persisted_credential_restores_without_login() {
        let (client, _, transport) = setup(MemoryCredentials::with_token("abc"));
        assert!(client.snapshot().is_logged_in());

        transport.respond(200, TWO_TASKS);
        client.start().await;

        assert_eq!(transport.count(Method::Post, "/login"), 0);
        assert_eq!(transport.calls(), vec![(Method::Get, "/tasks".to_string())]);
        assert_eq!(
            transport.last_request().unwrap().header_value("Authorization"),
            Some("Bearer abc")
        );
        assert_eq!(client.snapshot().session, Session::LoggedIn { username: None });
    }

    #[tokio::test]
    async fn test_restored_token_rejected_falls_back_to_logged_out() {
        let (client, credentials, transport) = setup(MemoryCredentials::with_token("expired"));
        transport.respond(401, r#"{"msg": "Token has expired"}"#);

        client.start().await;

        let state = client.snapshot();
        assert_eq!(state.session, Session::LoggedOut);
        assert_eq!(state.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
        assert_eq!(credentials.get(), None);
    }

    #[tokio::test]
    async fn test_401_on_mutation_forces_logout() {
        let (client, credentials, transport) = logged_in_with(TWO_TASKS).await;
        transport.respond(401, r#"{"msg": "Token has expired"}"#);

        assert!(!client.delete_task(TaskId(1)).await);

        let state = client.snapshot();
        assert_eq!(state.session, Session::LoggedOut);
        assert!(state.tasks.is_empty());
        assert_eq!(state.error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
        assert_eq!(credentials.get(), None);
        // No refetch after a failed mutation
        assert_eq!(transport.count(Method::Get, "/tasks"), 1);
    }

    #[tokio::test]
    async fn test_blank_title_never_hits_the_api() {
        let (client, _, transport) = logged_in_with("[]").await;

        assert!(!client.add_task("").await);
        assert!(!client.add_task("   ").await);

        assert_eq!(transport.calls(), vec![(Method::Get, "/tasks".to_string())]);
        assert_eq!(client.snapshot().error.as_deref(), Some(EMPTY_TITLE_MESSAGE));
    }

    #[tokio::test]
    async fn test_add_refetches_instead_of_appending() {
        let (client, _, transport) = logged_in_with("[]").await;
        transport.respond(
            201,
            r#"{"msg": "Task added successfully", "id": 99, "title": "Buy milk", "done": false}"#,
        );
        transport.respond(200, TWO_TASKS);

        assert!(client.add_task("Buy milk").await);

        assert_eq!(
            transport.calls()[1..],
            [
                (Method::Post, "/tasks".to_string()),
                (Method::Get, "/tasks".to_string()),
            ]
        );
        let post = &transport.requests()[1];
        assert_eq!(post.body, Some(serde_json::json!({"title": "Buy milk"})));

        let ids: Vec<_> = client.snapshot().tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TaskId(1), TaskId(2)]);
    }

    #[tokio::test]
    async fn test_toggle_sends_negated_flag() {
        let (client, _, transport) = logged_in_with("[]").await;
        transport.respond(200, "");
        transport.respond(200, "[]");

        assert!(client.toggle_task(TaskId(7), false).await);

        let put = &transport.requests()[1];
        assert_eq!(put.method, Method::Put);
        assert_eq!(put.path, "/tasks/7");
        assert_eq!(put.body, Some(serde_json::json!({"done": true})));
        assert_eq!(transport.count(Method::Get, "/tasks"), 2);
    }

    #[tokio::test]
    async fn test_rename_sends_title() {
        let (client, _, transport) = logged_in_with("[]").await;
        transport.respond(200, "");
        transport.respond(200, "[]");

        assert!(client.rename_task(TaskId(3), "  Buy oat milk ").await);

        let put = &transport.requests()[1];
        assert_eq!(put.path, "/tasks/3");
        assert_eq!(put.body, Some(serde_json::json!({"title": "Buy oat milk"})));
    }

    #[tokio::test]
    async fn test_logout_clears_everything_without_network() {
        let (client, credentials, transport) = logged_in_with(TWO_TASKS).await;
        let before = transport.requests().len();

        client.logout();

        let state = client.snapshot();
        assert_eq!(state.session, Session::LoggedOut);
        assert!(state.tasks.is_empty());
        assert_eq!(state.error, None);
        assert_eq!(state.notice.as_deref(), Some(LOGGED_OUT_NOTICE));
        assert_eq!(credentials.get(), None);
        assert_eq!(transport.requests().len(), before);
    }

    #[tokio::test]
    async fn test_logout_when_already_logged_out() {
        let (client, credentials, transport) = setup(MemoryCredentials::new());
        client.logout();

        assert_eq!(client.snapshot().session, Session::LoggedOut);
        assert_eq!(credentials.get(), None);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_double_refresh_is_not_deduplicated() {
        let (client, _, transport) = logged_in_with("[]").await;
        transport.respond(200, TWO_TASKS);
        transport.respond(200, TWO_TASKS);

        assert!(client.refresh().await);
        let first = client.snapshot().tasks;
        assert!(client.refresh().await);
        let second = client.snapshot().tasks;

        assert_eq!(first, second);
        assert_eq!(transport.count(Method::Get, "/tasks"), 3);
    }

    #[tokio::test]
    async fn test_refresh_without_credential_is_noop() {
        let (client, _, transport) = setup(MemoryCredentials::new());
        client.state().set_error("keep me");

        assert!(!client.refresh().await);

        assert!(transport.requests().is_empty());
        assert_eq!(client.snapshot().error.as_deref(), Some("keep me"));
    }

    #[tokio::test]
    async fn test_server_error_keeps_collection() {
        let (client, _, transport) = logged_in_with(TWO_TASKS).await;
        transport.respond(404, r#"{"msg": "Task not found or you don't have permission"}"#);

        assert!(!client.delete_task(TaskId(42)).await);

        let state = client.snapshot();
        assert_eq!(state.tasks.len(), 2);
        assert!(state.is_logged_in());
        assert_eq!(
            state.error.as_deref(),
            Some("Could not delete task: HTTP 404 - Task not found or you don't have permission")
        );
    }

    #[tokio::test]
    async fn test_network_failure_is_reported_once() {
        let (client, _, transport) = logged_in_with(TWO_TASKS).await;
        transport.fail("connection refused");

        assert!(!client.add_task("Buy milk").await);

        let error = client.snapshot().error.unwrap();
        assert!(error.starts_with("Could not add task: could not reach the server"));
        // Exactly one attempt, no retry
        assert_eq!(transport.count(Method::Post, "/tasks"), 1);
    }

    #[tokio::test]
    async fn test_new_operation_clears_previous_error() {
        let (client, _, transport) = logged_in_with("[]").await;
        assert!(!client.add_task(" ").await);
        assert!(client.snapshot().error.is_some());

        transport.respond(200, "");
        transport.respond(200, "[]");
        assert!(client.delete_task(TaskId(1)).await);

        assert_eq!(client.snapshot().error, None);
    }

    #[tokio::test]
    async fn test_register_switches_to_login_mode() {
        let (client, credentials, transport) = setup(MemoryCredentials::new());
        client.set_auth_mode(AuthMode::Register);
        transport.respond(201, r#"{"msg": "User registered successfully"}"#);

        assert!(client.register("ana", "pw").await);

        let state = client.snapshot();
        assert_eq!(state.auth_mode, AuthMode::Login);
        assert_eq!(state.session, Session::LoggedOut);
        assert_eq!(state.notice.as_deref(), Some("User registered successfully"));
        assert_eq!(credentials.get(), None);
    }

    #[tokio::test]
    async fn test_register_conflict_reports_server_message() {
        let (client, _, transport) = setup(MemoryCredentials::new());
        client.set_auth_mode(AuthMode::Register);
        transport.respond(409, r#"{"msg": "User already exists"}"#);

        assert!(!client.register("ana", "pw").await);

        let state = client.snapshot();
        assert_eq!(state.auth_mode, AuthMode::Register);
        assert_eq!(
            state.error.as_deref(),
            Some("Registration failed: HTTP 409 - User already exists")
        );
    }

    #[tokio::test]
    async fn test_listener_observes_login_transition() {
        let (client, _, transport) = setup(MemoryCredentials::new());
        let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        client.subscribe(move |s| sink.borrow_mut().push(s.is_logged_in()));

        transport.respond(200, r#"{"access_token": "tok"}"#);
        transport.respond(200, "[]");
        client.login("ana", "pw").await;

        assert_eq!(seen.borrow().first(), Some(&false));
        assert_eq!(seen.borrow().last(), Some(&true));
    }

    // ========================
    // Interleaved responses
    // ========================

    type GatedClient = TodoClient<MemoryCredentials, GatedTransport>;

    fn gated(credentials: MemoryCredentials) -> (GatedClient, GatedTransport) {
        let gate = GatedTransport::new();
        (TodoClient::new(credentials, gate.clone()), gate)
    }

    async fn until_tasks_loaded(client: &GatedClient) {
        while client.snapshot().tasks.is_empty() {
            tokio::task::yield_now().await;
        }
    }

    const ONLY_TASK_2: &str = r#"[{"id": 2, "title": "Walk dog", "done": false}]"#;

    #[tokio::test]
    async fn test_older_refresh_arriving_late_is_discarded() {
        let (client, gate) = gated(MemoryCredentials::with_token("abc"));

        let (first, second, _) = tokio::join!(client.refresh(), client.refresh(), async {
            gate.wait_for(2).await;
            gate.release(1, 200, ONLY_TASK_2);
            until_tasks_loaded(&client).await;
            gate.release(0, 200, TWO_TASKS);
        });

        assert!(!first);
        assert!(second);
        let ids: Vec<_> = client.snapshot().tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TaskId(2)]);
    }

    #[tokio::test]
    async fn test_older_refresh_failing_late_keeps_error_slot_clear() {
        let (client, gate) = gated(MemoryCredentials::with_token("abc"));

        let (first, second, _) = tokio::join!(client.refresh(), client.refresh(), async {
            gate.wait_for(2).await;
            gate.release(1, 200, ONLY_TASK_2);
            until_tasks_loaded(&client).await;
            gate.release(0, 500, r#"{"msg": "boom"}"#);
        });

        assert!(!first);
        assert!(second);
        let state = client.snapshot();
        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_refresh_in_flight_during_logout_is_dropped() {
        let (client, gate) = gated(MemoryCredentials::with_token("abc"));

        let (refreshed, _) = tokio::join!(client.refresh(), async {
            gate.wait_for(1).await;
            client.logout();
            gate.release(0, 200, TWO_TASKS);
        });

        assert!(!refreshed);
        let state = client.snapshot();
        assert_eq!(state.session, Session::LoggedOut);
        assert!(state.tasks.is_empty());
        assert_eq!(state.notice.as_deref(), Some(LOGGED_OUT_NOTICE));
    }

    #[tokio::test]
    async fn test_late_401_from_previous_session_is_ignored() {
        let credentials = MemoryCredentials::with_token("abc");
        let (client, gate) = gated(credentials.clone());

        let (deleted, _) = tokio::join!(client.delete_task(TaskId(1)), async {
            gate.wait_for(1).await;
            client.logout();
            let (logged_in, _) = tokio::join!(client.login("ana", "pw"), async {
                gate.wait_for(2).await;
                gate.release(1, 200, r#"{"access_token": "tok"}"#);
                gate.wait_for(3).await;
                gate.release(2, 200, "[]");
            });
            assert!(logged_in);
            gate.release(0, 401, r#"{"msg": "Token has expired"}"#);
        });

        assert!(!deleted);
        let state = client.snapshot();
        assert_eq!(
            state.session,
            Session::LoggedIn {
                username: Some("ana".to_string())
            }
        );
        assert_eq!(state.error, None);
        assert_eq!(credentials.get().as_deref(), Some("tok"));
        let paths: Vec<_> = gate.requests().iter().map(|r| r.path.clone()).collect();
        assert_eq!(paths, vec!["/tasks/1", "/login", "/tasks"]);
    }
}
