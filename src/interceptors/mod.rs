//! Optional interceptor hooks for application-layer cross-cutting concerns.
//!
//! Interceptors are for logging, metrics, and audit trails around the
//! request pipeline. They run in registration order and are best-effort:
//! a panicking interceptor is logged and skipped, never allowed to abort
//! the request. Error interceptors run before the `on_error` hook.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use reqwest::Method;
use serde_json::Value;

use crate::client::response::ApiResponse;
use crate::Error;

/// Context describing the outbound call, stable across the interceptor
/// surface to avoid API churn.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Fully built target URL, query string included.
    pub url: String,
    /// The logical endpoint path the caller asked for.
    pub endpoint: String,
}

/// Interceptor trait for cross-cutting concerns.
#[async_trait]
pub trait Interceptor: Send + Sync {
    async fn on_request(&self, _ctx: &RequestContext) {}

    async fn on_response(&self, _ctx: &RequestContext, _response: &ApiResponse<Value>) {}

    async fn on_error(&self, _ctx: &RequestContext, _error: &Error) {}
}

pub(crate) async fn notify_request(interceptors: &[Arc<dyn Interceptor>], ctx: &RequestContext) {
    for interceptor in interceptors {
        if AssertUnwindSafe(interceptor.on_request(ctx))
            .catch_unwind()
            .await
            .is_err()
        {
            tracing::warn!(url = %ctx.url, "request interceptor panicked; ignoring");
        }
    }
}

pub(crate) async fn notify_response(
    interceptors: &[Arc<dyn Interceptor>],
    ctx: &RequestContext,
    response: &ApiResponse<Value>,
) {
    for interceptor in interceptors {
        if AssertUnwindSafe(interceptor.on_response(ctx, response))
            .catch_unwind()
            .await
            .is_err()
        {
            tracing::warn!(url = %ctx.url, "response interceptor panicked; ignoring");
        }
    }
}

pub(crate) async fn notify_error(
    interceptors: &[Arc<dyn Interceptor>],
    ctx: &RequestContext,
    error: &Error,
) {
    for interceptor in interceptors {
        if AssertUnwindSafe(interceptor.on_error(ctx, error))
            .catch_unwind()
            .await
            .is_err()
        {
            tracing::warn!(url = %ctx.url, "error interceptor panicked; ignoring");
        }
    }
}
