//! Transport seam between the request pipeline and the wire.
//!
//! The client core assembles a [`TransportRequest`] and hands it to whatever
//! [`Transport`] the configuration carries. Production uses
//! [`ReqwestTransport`]; tests substitute scripted stubs. The trait is the
//! only place network I/O happens.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::Method;
use thiserror::Error;

pub mod http;

pub use http::ReqwestTransport;

/// A single outbound request, fully assembled by the client core.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<TransportBody>,
}

/// Wire body shapes the client produces.
#[derive(Debug, Clone)]
pub enum TransportBody {
    /// Pre-serialized JSON bytes; `Content-Type` is already set upstream.
    Json(Bytes),
    /// Multipart form; the transport sets its own boundary header.
    Multipart(FormData),
}

/// Multipart form payload, transport-agnostic.
#[derive(Debug, Clone, Default)]
pub struct FormData {
    pub parts: Vec<FormPart>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::Text(value.into()),
        });
        self
    }

    /// Append a binary field, typically a file upload.
    pub fn bytes(
        mut self,
        name: impl Into<String>,
        data: impl Into<Bytes>,
        filename: Option<String>,
        mime: Option<String>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::Bytes {
                data: data.into(),
                filename,
                mime,
            },
        });
        self
    }
}

#[derive(Debug, Clone)]
pub struct FormPart {
    pub name: String,
    pub value: FormValue,
}

#[derive(Debug, Clone)]
pub enum FormValue {
    Text(String),
    Bytes {
        data: Bytes,
        filename: Option<String>,
        mime: Option<String>,
    },
}

/// What the transport observed coming back.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Transport-level failure. The pipeline catches these internally and
/// converts them into synthetic [`ApiResponse`](crate::ApiResponse)s; they
/// are never re-thrown to callers.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("Request cancelled")]
    Cancelled,

    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Synthetic HTTP status reported when this failure is normalized into
    /// an `ApiResponse`: 408 for timeouts, 499 for caller cancellation,
    /// 500 otherwise.
    pub fn synthetic_status(&self) -> u16 {
        match self {
            TransportError::Timeout => 408,
            TransportError::Cancelled => 499,
            _ => 500,
        }
    }
}

/// Fetch-compatible seam. One request in, one response or failure out; no
/// retries, no queueing, no shared state beyond what the implementation
/// manages internally (e.g. a connection pool).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}
