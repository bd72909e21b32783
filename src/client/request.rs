//! Per-call request shapes. Created fresh per call, no lifecycle beyond it.

use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;

use crate::client::signals::CancelHandle;
use crate::transport::{FormData, TransportBody};
use crate::Result;

/// Request payload, serialized at construction so the send pipeline itself
/// cannot fail on serialization.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// Pre-serialized JSON bytes.
    Json(Bytes),
    /// Multipart form; the transport supplies the boundary and the pipeline
    /// strips any `Content-Type` header.
    Form(FormData),
}

impl RequestBody {
    /// JSON-serialize a payload.
    pub fn json<B: Serialize + ?Sized>(body: &B) -> Result<Self> {
        Ok(Self::Json(Bytes::from(serde_json::to_vec(body)?)))
    }

    /// Multipart form payload.
    pub fn form(form: FormData) -> Self {
        Self::Form(form)
    }

    pub(crate) fn is_multipart(&self) -> bool {
        matches!(self, Self::Form(_))
    }

    pub(crate) fn into_transport(self) -> TransportBody {
        match self {
            Self::Json(bytes) => TransportBody::Json(bytes),
            Self::Form(form) => TransportBody::Multipart(form),
        }
    }
}

/// Per-call options merged over the config defaults.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Request-specific headers, highest precedence on key collision.
    pub headers: Vec<(String, String)>,
    /// Query parameters; entries with a `None` value are skipped.
    pub params: Vec<(String, Option<String>)>,
    /// Also merge the configured query defaults into the URL.
    pub use_config_query_defaults: bool,
    /// Overrides the config timeout for this call only.
    pub timeout: Option<Duration>,
    /// Fire the error toast on failure. Default true.
    pub show_error_toast: bool,
    /// Fire the success toast on success. Default false.
    pub show_success_toast: bool,
    /// Notify regardless of the individual toast flags.
    pub force_notify: bool,
    pub error_message_override: Option<String>,
    pub success_message_override: Option<String>,
    /// Caller-side cancellation, combined first-to-fire-wins with the
    /// timeout.
    pub cancel: Option<CancelHandle>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            params: Vec::new(),
            use_config_query_defaults: false,
            timeout: None,
            show_error_toast: true,
            show_success_toast: false,
            force_notify: false,
            error_message_override: None,
            success_message_override: None,
            cancel: None,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a query parameter; the value is stringified.
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), Some(value.to_string())));
        self
    }

    /// Add a query parameter that is skipped when absent.
    pub fn param_opt(mut self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        self.params
            .push((name.into(), value.map(|v| v.to_string())));
        self
    }

    /// Merge the configured query defaults into this request's URL.
    pub fn use_query_defaults(mut self) -> Self {
        self.use_config_query_defaults = true;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Suppress the error toast for this call.
    pub fn silent(mut self) -> Self {
        self.show_error_toast = false;
        self
    }

    /// Fire the success toast when the response carries a message.
    pub fn success_toast(mut self) -> Self {
        self.show_success_toast = true;
        self
    }

    /// Notify on settlement regardless of the individual toast flags.
    pub fn force_notify(mut self) -> Self {
        self.force_notify = true;
        self
    }

    pub fn error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message_override = Some(message.into());
        self
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message_override = Some(message.into());
        self
    }

    pub fn cancel_handle(mut self, handle: CancelHandle) -> Self {
        self.cancel = Some(handle);
        self
    }
}
