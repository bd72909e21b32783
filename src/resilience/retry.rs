//! Bounded-retry decorator.

use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::client::request::{RequestBody, RequestOptions};
use crate::client::response::ApiResponse;
use crate::HttpClient;

/// Retry schedule and eligibility.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Additional attempts after the first; 2 means at most 3 calls.
    pub max_retries: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Spread delays +/-10% so synchronized callers do not re-stampede.
    pub jitter: bool,
    pub retry_on_status: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            min_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            jitter: true,
            retry_on_status: vec![408, 429, 500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff capped at `max_delay`: min_delay * 2^attempt.
    fn backoff(&self, attempt: u32) -> Duration {
        let base = self.min_delay.as_millis() as u64;
        let cap = self.max_delay.as_millis() as u64;
        let mut delay = base.saturating_mul(1u64 << attempt.min(16)).min(cap);

        if self.jitter && delay > 0 {
            // Jitter is derived from UUID randomness; good enough for
            // de-synchronizing retries without another dependency.
            let spread = delay / 5;
            if spread > 0 {
                let offset = (Uuid::new_v4().as_u128() as u64) % spread;
                delay = delay - spread / 2 + offset;
            }
        }

        Duration::from_millis(delay)
    }

    fn should_retry(&self, attempt: u32, status: u16) -> bool {
        // 499 marks caller cancellation; honoring it beats completing the call.
        attempt < self.max_retries && status != 499 && self.retry_on_status.contains(&status)
    }
}

/// Decorator adding bounded retries around [`HttpClient`].
///
/// Non-idempotent verbs (POST, PATCH) get an `Idempotency-Key` header
/// generated once per logical call and replayed verbatim on every attempt,
/// so the backend can deduplicate a write that succeeded but whose response
/// was lost. GET/PUT/DELETE retry as-is.
#[derive(Clone)]
pub struct RetryingClient {
    inner: HttpClient,
    policy: RetryPolicy,
}

impl RetryingClient {
    pub fn new(inner: HttpClient, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The wrapped client, for calls that must not retry.
    pub fn inner(&self) -> &HttpClient {
        &self.inner
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResponse<T> {
        self.request(Method::GET, endpoint, None, options).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<RequestBody>,
        options: RequestOptions,
    ) -> ApiResponse<T> {
        self.request(Method::POST, endpoint, body, options).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<RequestBody>,
        options: RequestOptions,
    ) -> ApiResponse<T> {
        self.request(Method::PUT, endpoint, body, options).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<RequestBody>,
        options: RequestOptions,
    ) -> ApiResponse<T> {
        self.request(Method::PATCH, endpoint, body, options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResponse<T> {
        self.request(Method::DELETE, endpoint, None, options).await
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<RequestBody>,
        mut options: RequestOptions,
    ) -> ApiResponse<T> {
        if needs_idempotency_key(&method) && !has_header(&options, "idempotency-key") {
            options = options.header("Idempotency-Key", Uuid::new_v4().to_string());
        }

        let mut attempt = 0u32;
        loop {
            let response = self
                .inner
                .request(method.clone(), endpoint, body.clone(), options.clone())
                .await;

            if !response.is_error || !self.policy.should_retry(attempt, response.status) {
                return response;
            }

            let delay = self.policy.backoff(attempt);
            debug!(
                endpoint,
                status = response.status,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "retrying failed request"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

fn needs_idempotency_key(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PATCH
}

fn has_header(options: &RequestOptions, name: &str) -> bool {
    options
        .headers
        .iter()
        .any(|(n, _)| n.eq_ignore_ascii_case(name))
}
