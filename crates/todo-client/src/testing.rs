//! Test Support
//!
//! Scripted transport that replays queued responses and records requests,
//! and a gated transport whose responses are released by the test in any
//! order.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::api::{HttpRequest, HttpResponse, Method, Transport, TransportError};

#[derive(Default)]
struct Script {
    responses: VecDeque<Result<HttpResponse, TransportError>>,
    requests: Vec<HttpRequest>,
}

/// Replays queued responses in order. Clones share the same script.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Rc<RefCell<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response
    pub fn respond(&self, status: u16, body: &str) {
        self.script
            .borrow_mut()
            .responses
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Queue a network failure
    pub fn fail(&self, message: &str) {
        self.script
            .borrow_mut()
            .responses
            .push_back(Err(TransportError(message.to_string())));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.script.borrow().requests.clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.script.borrow().requests.last().cloned()
    }

    /// `(method, path)` of every request, in order
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.script
            .borrow()
            .requests
            .iter()
            .map(|r| (r.method, r.path.clone()))
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.script
            .borrow()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut script = self.script.borrow_mut();
        script.requests.push(request);
        script
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(TransportError("no scripted response".to_string())))
    }
}

type Reply = Result<HttpResponse, TransportError>;

#[derive(Default)]
struct Gate {
    requests: Vec<HttpRequest>,
    replies: Vec<Option<oneshot::Sender<Reply>>>,
}

/// Holds every request open until the test releases it by index.
/// Clones share the same gate.
#[derive(Clone, Default)]
pub struct GatedTransport {
    gate: Rc<RefCell<Gate>>,
}

impl GatedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.gate.borrow().requests.clone()
    }

    /// Yield to the other joined futures until `count` requests are in flight
    pub async fn wait_for(&self, count: usize) {
        while self.gate.borrow().requests.len() < count {
            tokio::task::yield_now().await;
        }
    }

    /// Answer request number `index` (0-based, in send order)
    pub fn release(&self, index: usize, status: u16, body: &str) {
        let sender = self.gate.borrow_mut().replies[index]
            .take()
            .expect("request already released");
        let _ = sender.send(Ok(HttpResponse::new(status, body)));
    }
}

#[async_trait(?Send)]
impl Transport for GatedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let (tx, rx) = oneshot::channel();
        {
            let mut gate = self.gate.borrow_mut();
            gate.requests.push(request);
            gate.replies.push(Some(tx));
        }
        rx.await
            .unwrap_or_else(|_| Err(TransportError("gate dropped".to_string())))
    }
}
