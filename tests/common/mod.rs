//! Shared test doubles for the integration suite.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use tokio::sync::Notify;

use realty_client::transport::{
    Transport, TransportError, TransportRequest, TransportResponse,
};
use realty_client::{ApiResponse, ClientHooks, Error, NotifyKind};

/// One canned transport outcome.
#[derive(Debug, Clone)]
pub enum Outcome {
    Respond { status: u16, body: String },
    Fail(String),
    Hang,
}

impl Outcome {
    pub fn ok(body: &str) -> Self {
        Outcome::Respond {
            status: 200,
            body: body.to_owned(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Outcome::Respond {
            status,
            body: body.to_owned(),
        }
    }
}

/// Scripted transport: pops one outcome per call (the final one repeats)
/// and records everything the client sent.
pub struct StubTransport {
    outcomes: Mutex<VecDeque<Outcome>>,
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<TransportRequest>>,
}

impl StubTransport {
    pub fn new(outcomes: Vec<Outcome>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn respond(status: u16, body: &str) -> Arc<Self> {
        Self::new(vec![Outcome::status(status, body)])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recorded(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_outcome(&self) -> Outcome {
        let mut queue = self.outcomes.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().expect("stub transport has no outcome")
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        match self.next_outcome() {
            Outcome::Respond { status, body } => Ok(TransportResponse {
                status,
                headers: HeaderMap::new(),
                body: Bytes::from(body),
            }),
            Outcome::Fail(message) => Err(TransportError::Other(message)),
            Outcome::Hang => std::future::pending().await,
        }
    }
}

/// Transport that parks each call until the test releases it, for probing
/// in-flight behavior (config snapshots).
pub struct GateTransport {
    pub entered: Notify,
    release: Notify,
    pub requests: Mutex<Vec<TransportRequest>>,
}

impl GateTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entered: Notify::new(),
            release: Notify::new(),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn release_one(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl Transport for GateTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(TransportResponse {
            status: 200,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"{}"),
        })
    }
}

/// Hooks implementation that records every invocation.
#[derive(Clone, Default)]
pub struct RecordingHooks {
    pub state: Arc<HookState>,
}

#[derive(Default)]
pub struct HookState {
    pub notifications: Mutex<Vec<(String, NotifyKind)>>,
    pub unauthorized: AtomicUsize,
    pub started: AtomicUsize,
    pub ended: AtomicUsize,
    pub errors: Mutex<Vec<String>>,
    pub successes: AtomicUsize,
}

impl RecordingHooks {
    pub fn notifications(&self) -> Vec<(String, NotifyKind)> {
        self.state.notifications.lock().unwrap().clone()
    }

    pub fn unauthorized_count(&self) -> usize {
        self.state.unauthorized.load(Ordering::SeqCst)
    }
}

impl ClientHooks for RecordingHooks {
    fn notify(&self, message: &str, kind: NotifyKind) {
        self.state
            .notifications
            .lock()
            .unwrap()
            .push((message.to_owned(), kind));
    }

    fn on_unauthorized(&self) {
        self.state.unauthorized.fetch_add(1, Ordering::SeqCst);
    }

    fn on_request_start(&self) {
        self.state.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_request_end(&self) {
        self.state.ended.fetch_add(1, Ordering::SeqCst);
    }

    fn on_success(&self, _response: &ApiResponse<serde_json::Value>) {
        self.state.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, error: &Error) {
        self.state.errors.lock().unwrap().push(error.to_string());
    }
}

/// Hooks whose `notify` panics, for observer-isolation tests.
#[derive(Clone, Copy, Default)]
pub struct PanickyHooks;

impl ClientHooks for PanickyHooks {
    fn notify(&self, _message: &str, _kind: NotifyKind) {
        panic!("toast system exploded");
    }
}
