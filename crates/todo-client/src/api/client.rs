//! API Client
//!
//! Typed wrappers for `/register`, `/login`, `/tasks` and `/tasks/:id`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{ApiError, ApiResult, FALLBACK_MESSAGE};
use super::transport::{HttpRequest, HttpResponse, Method, Transport};
use crate::models::{Credentials, DoneBody, LoginResponse, MessageBody, Task, TaskId, TitleBody};

/// REST client over any [`Transport`]
pub struct ApiClient<T> {
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    // ========================
    // Authentication
    // ========================

    /// `POST /register`
    pub async fn register(&self, username: &str, password: &str) -> ApiResult<MessageBody> {
        let body = encode(&Credentials { username, password })?;
        let request = build(Method::Post, "/register", None).json(body);
        let response = self.execute(request).await?;
        decode(&response)
    }

    /// `POST /login`, yielding the new bearer token
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = encode(&Credentials { username, password })?;
        let request = build(Method::Post, "/login", None).json(body);
        let response = self.execute(request).await?;
        decode(&response)
    }

    // ========================
    // Tasks
    // ========================

    /// `GET /tasks`
    pub async fn list_tasks(&self, credential: Option<&str>) -> ApiResult<Vec<Task>> {
        let request = build(Method::Get, "/tasks", credential);
        let response = self.execute(request).await?;
        decode(&response)
    }

    /// `POST /tasks` with `{title}`
    pub async fn create_task(&self, title: &str, credential: Option<&str>) -> ApiResult<Option<Task>> {
        let body = encode(&TitleBody { title })?;
        let request = build(Method::Post, "/tasks", credential).json(body);
        let response = self.execute(request).await?;
        Ok(decode_lenient(&response))
    }

    /// `PUT /tasks/:id` with `{done}`
    pub async fn set_task_done(
        &self,
        id: TaskId,
        done: bool,
        credential: Option<&str>,
    ) -> ApiResult<Option<Task>> {
        let body = encode(&DoneBody { done })?;
        let request = build(Method::Put, &format!("/tasks/{}", id), credential).json(body);
        let response = self.execute(request).await?;
        Ok(decode_lenient(&response))
    }

    /// `PUT /tasks/:id` with `{title}`
    pub async fn update_task_title(
        &self,
        id: TaskId,
        title: &str,
        credential: Option<&str>,
    ) -> ApiResult<Option<Task>> {
        let body = encode(&TitleBody { title })?;
        let request = build(Method::Put, &format!("/tasks/{}", id), credential).json(body);
        let response = self.execute(request).await?;
        Ok(decode_lenient(&response))
    }

    /// `DELETE /tasks/:id`
    pub async fn delete_task(&self, id: TaskId, credential: Option<&str>) -> ApiResult<()> {
        let request = build(Method::Delete, &format!("/tasks/{}", id), credential);
        self.execute(request).await?;
        Ok(())
    }

    /// Send and classify: any non-2xx status becomes an [`ApiError`]
    async fn execute(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let method = request.method;
        let path = request.path.clone();
        log::debug!("{} {}", method.as_str(), path);

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("{} {} failed: {}", method.as_str(), path, e);
                return Err(e.into());
            }
        };

        if response.is_success() {
            Ok(response)
        } else {
            let message = server_message(&response.body);
            log::warn!("{} {} -> {} ({})", method.as_str(), path, response.status, message);
            Err(ApiError::from_status(response.status, message))
        }
    }
}

fn build(method: Method, path: &str, credential: Option<&str>) -> HttpRequest {
    let request = HttpRequest::new(method, path).header("Content-Type", "application/json");
    match credential {
        Some(token) => request.header("Authorization", format!("Bearer {}", token)),
        None => request,
    }
}

fn encode<B: Serialize>(body: &B) -> ApiResult<serde_json::Value> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(format!("encode request: {}", e)))
}

fn decode<R: DeserializeOwned>(response: &HttpResponse) -> ApiResult<R> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Optional bodies: empty or non-matching content yields `None`
fn decode_lenient<R: DeserializeOwned>(response: &HttpResponse) -> Option<R> {
    if response.body.trim().is_empty() {
        return None;
    }
    serde_json::from_str(&response.body).ok()
}

/// The `msg` field of an error body, or the generic fallback
fn server_message(body: &str) -> String {
    serde_json::from_str::<MessageBody>(body)
        .map(|b| b.msg)
        .unwrap_or_else(|_| FALLBACK_MESSAGE.to_string())
}
