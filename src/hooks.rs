//! Injected side-effect surface for the request pipeline.
//!
//! Applications plug in toast notifications, re-authentication redirects,
//! and lifecycle observers through one capability object instead of loose
//! function pointers. Every invocation is best-effort: a panicking hook is
//! caught and logged, and never masks or replaces the real result.

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde_json::Value;

use crate::client::response::ApiResponse;
use crate::Error;

/// Kind of user-facing notification requested by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Error,
    Warning,
    Info,
}

/// Application side effects invoked by the client.
///
/// All methods default to no-ops, so an implementation overrides only what
/// it cares about. Hooks observe the pipeline; they cannot alter it.
pub trait ClientHooks: Send + Sync {
    /// Surface a message to the user (toast or equivalent).
    fn notify(&self, _message: &str, _kind: NotifyKind) {}

    /// A response came back with status 401. Typically redirects to login.
    fn on_unauthorized(&self) {}

    /// A request is about to be dispatched.
    fn on_request_start(&self) {}

    /// The request settled, whatever the outcome.
    fn on_request_end(&self) {}

    /// The call succeeded at the HTTP level.
    fn on_success(&self, _response: &ApiResponse<Value>) {}

    /// The call failed, either at the HTTP level or in the transport.
    fn on_error(&self, _error: &Error) {}
}

/// Hooks implementation that does nothing. The default when an application
/// injects no side effects; failures are then silent and must be handled by
/// inspecting the returned response.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHooks;

impl ClientHooks for NoopHooks {}

/// Run a hook, swallowing panics so observer failures cannot abort the
/// request pipeline.
pub(crate) fn guard(name: &'static str, f: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(f)).is_err() {
        tracing::warn!(hook = name, "hook panicked; result unaffected");
    }
}
