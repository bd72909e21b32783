//! Client core: the request pipeline.
//!
//! One outbound request per call, normalized into
//! [`ApiResponse`], side effects run through the injected hooks. The client
//! itself is stateless between calls; the only per-request state machine is
//! `idle -> sending -> settled`, and a failed call is terminal (retry policy
//! lives in [`crate::resilience`]).

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, CONTENT_TYPE,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::client::request::{RequestBody, RequestOptions};
use crate::client::response::{self, ApiResponse};
use crate::client::signals::CancelHandle;
use crate::client::url;
use crate::config::{ClientConfig, ConfigPatch};
use crate::hooks::{guard, NotifyKind};
use crate::interceptors::{self, RequestContext};
use crate::transport::{Transport, TransportError, TransportRequest, TransportResponse};
use crate::Error;

/// Framework-agnostic REST client over an injected transport.
///
/// Construct once in a composition root and share freely: cloning is cheap
/// and all clones observe the same configuration. Calls never return an
/// `Err`; every outcome, including timeouts and network failures, arrives
/// as an [`ApiResponse`].
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<Inner>,
}

struct Inner {
    config: ArcSwap<ClientConfig>,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient").finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Construct from a full config. Fails fast when `base_url` is empty.
    pub fn new(config: ClientConfig) -> crate::Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(Error::configuration("base_url must be non-empty"));
        }
        Ok(Self {
            inner: Arc::new(Inner {
                config: ArcSwap::from_pointee(config),
            }),
        })
    }

    /// Start a builder rooted at `base_url`.
    pub fn builder(base_url: impl Into<String>) -> crate::client::builder::ClientBuilder {
        crate::client::builder::ClientBuilder::new(base_url)
    }

    /// Shallow, last-write-wins config merge.
    ///
    /// Calls already in flight keep the snapshot they captured at dispatch
    /// time; only calls dispatched after this returns observe the patch.
    pub fn update_config(&self, patch: ConfigPatch) {
        self.inner
            .config
            .rcu(|current| current.apply(patch.clone()));
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

    /// Generic entry point; the verb helpers are thin wrappers over this.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<RequestBody>,
        options: RequestOptions,
    ) -> ApiResponse<T> {
        response::typed(self.dispatch(method, endpoint, body, options).await)
    }

    async fn dispatch(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<RequestBody>,
        options: RequestOptions,
    ) -> ApiResponse<Value> {
        // One snapshot per call. Config updates racing with this call do
        // not affect it: token/locale/header capture happens right here.
        let cfg = self.inner.config.load_full();

        guard("on_request_start", || cfg.hooks.on_request_start());

        let defaults = if options.use_config_query_defaults {
            cfg.query_defaults.as_ref().and_then(|provider| provider())
        } else {
            None
        };
        let target = url::build(&cfg.base_url, endpoint, defaults.as_ref(), &options.params);

        // Bodies only ride along on non-GET verbs.
        let body = body.filter(|_| method != Method::GET);
        let headers = build_headers(&cfg, &options, body.as_ref());

        let ctx = RequestContext {
            method: method.clone(),
            url: target.clone(),
            endpoint: endpoint.to_owned(),
        };
        interceptors::notify_request(&cfg.interceptors, &ctx).await;

        let timeout = options.timeout.unwrap_or(cfg.default_timeout);
        debug!(
            method = %ctx.method,
            url = %ctx.url,
            timeout_ms = timeout.as_millis() as u64,
            "dispatching request"
        );

        let request = TransportRequest {
            method,
            url: target,
            headers,
            body: body.map(RequestBody::into_transport),
        };

        let outcome =
            send_with_deadline(cfg.transport.as_ref(), request, timeout, options.cancel.as_ref())
                .await;

        let response = match &outcome {
            Ok(raw) => response::normalize(raw.status, &raw.body),
            Err(error) => {
                ApiResponse::failure(error.synthetic_status(), failure_message(error))
            }
        };

        if response.is_error {
            let error = match outcome {
                Err(transport_error) => Error::Transport(transport_error),
                Ok(_) => Error::remote(
                    response.status,
                    response.message.clone().unwrap_or_else(|| {
                        format!("Request failed with status {}", response.status)
                    }),
                ),
            };

            interceptors::notify_error(&cfg.interceptors, &ctx, &error).await;
            guard("on_error", || cfg.hooks.on_error(&error));

            if response.status == 401 {
                guard("on_unauthorized", || cfg.hooks.on_unauthorized());
            }

            if options.show_error_toast || options.force_notify {
                let message = options
                    .error_message_override
                    .clone()
                    .or_else(|| response.message.clone())
                    .unwrap_or_else(|| "An unexpected error occurred".to_owned());
                guard("notify", || cfg.hooks.notify(&message, NotifyKind::Error));
            }
        } else {
            interceptors::notify_response(&cfg.interceptors, &ctx, &response).await;
            guard("on_success", || cfg.hooks.on_success(&response));

            if options.show_success_toast || options.force_notify {
                let message = options
                    .success_message_override
                    .clone()
                    .or_else(|| response.message.clone());
                if let Some(message) = message {
                    guard("notify", || cfg.hooks.notify(&message, NotifyKind::Success));
                }
            }
        }

        debug!(
            url = %ctx.url,
            status = response.status,
            is_error = response.is_error,
            "request settled"
        );
        guard("on_request_end", || cfg.hooks.on_request_end());
        response
    }
}

/// Race the transport call against the timeout and the caller's cancel
/// signal, first to fire wins. Dropping the losing branch aborts the
/// in-flight send and releases its timer, so nothing leaks under volume.
async fn send_with_deadline(
    transport: &dyn Transport,
    request: TransportRequest,
    timeout: Duration,
    cancel: Option<&CancelHandle>,
) -> Result<TransportResponse, TransportError> {
    let send = transport.send(request);
    match cancel {
        None => match tokio::time::timeout(timeout, send).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout),
        },
        Some(handle) => tokio::select! {
            biased;
            _ = handle.cancelled() => Err(TransportError::Cancelled),
            result = tokio::time::timeout(timeout, send) => match result {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout),
            },
        },
    }
}

fn failure_message(error: &TransportError) -> String {
    match error {
        TransportError::Timeout => "Request timeout".to_owned(),
        TransportError::Cancelled => "Request cancelled".to_owned(),
        TransportError::Other(message) => message.clone(),
        TransportError::Http(e) => e.to_string(),
    }
}

/// Header assembly, lowest to highest precedence: JSON defaults, config
/// headers, derived `Accept-Language` and `Authorization`, request headers.
fn build_headers(
    cfg: &ClientConfig,
    options: &RequestOptions,
    body: Option<&RequestBody>,
) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in &cfg.default_headers {
        insert_header(&mut headers, name, value);
    }

    if let Some(locale) = cfg.locale.as_ref().and_then(|provider| provider()) {
        if !locale.is_empty() {
            match HeaderValue::from_str(&locale) {
                Ok(value) => {
                    headers.insert(ACCEPT_LANGUAGE, value);
                }
                Err(_) => tracing::warn!("skipping invalid locale header value"),
            }
        }
    }

    if let Some(token) = cfg.token.as_ref().and_then(|provider| provider()) {
        if !token.is_empty() {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("skipping invalid bearer token value"),
            }
        }
    }

    for (name, value) in &options.headers {
        insert_header(&mut headers, name, value);
    }

    match body {
        // The transport sets its own multipart boundary.
        Some(b) if b.is_multipart() => {
            headers.remove(CONTENT_TYPE);
        }
        Some(_) => {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        None => {}
    }

    headers
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) {
    match (
        HeaderName::from_bytes(name.as_bytes()),
        HeaderValue::from_str(value),
    ) {
        (Ok(name), Ok(value)) => {
            headers.insert(name, value);
        }
        _ => tracing::warn!(header = name, "skipping invalid header"),
    }
}
