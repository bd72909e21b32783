//! Composition-root construction.
//!
//! One client per application, built here and passed to every consumer.
//! There is no process-wide default instance and no fallback URL baked into
//! source; everything an application customizes arrives through this
//! builder.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{
    ClientConfig, CredentialsMode, LocaleProvider, QueryDefaults, QueryDefaultsProvider,
    TokenProvider, DEFAULT_TIMEOUT,
};
use crate::hooks::{ClientHooks, NoopHooks};
use crate::interceptors::Interceptor;
use crate::transport::{ReqwestTransport, Transport};
use crate::{Error, HttpClient, Result};

/// Builder for [`HttpClient`].
///
/// Keep this surface small and predictable; configuration injection is the
/// only per-application customization point.
pub struct ClientBuilder {
    base_url: String,
    token: Option<TokenProvider>,
    locale: Option<LocaleProvider>,
    query_defaults: Option<QueryDefaultsProvider>,
    default_headers: HashMap<String, String>,
    default_timeout: Duration,
    credentials: Option<CredentialsMode>,
    hooks: Arc<dyn ClientHooks>,
    interceptors: Vec<Arc<dyn Interceptor>>,
    /// Substitute transport, primarily for testing with stubs.
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            locale: None,
            query_defaults: None,
            default_headers: HashMap::new(),
            default_timeout: DEFAULT_TIMEOUT,
            credentials: None,
            hooks: Arc::new(NoopHooks),
            interceptors: Vec::new(),
            transport: None,
        }
    }

    /// Bearer credential source; `None` from the closure means the request
    /// goes out unauthenticated.
    pub fn token_provider(
        mut self,
        provider: impl Fn() -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.token = Some(Arc::new(provider));
        self
    }

    /// Fixed bearer token resolved once at startup, e.g. from
    /// [`auth::require_token`](crate::auth::require_token).
    pub fn bearer_token(self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token_provider(move || Some(token.clone()))
    }

    /// Language tag source for the `Accept-Language` header.
    pub fn locale_provider(
        mut self,
        provider: impl Fn() -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.locale = Some(Arc::new(provider));
        self
    }

    /// Default query parameters for requests that opt in.
    pub fn query_defaults(
        mut self,
        provider: impl Fn() -> Option<QueryDefaults> + Send + Sync + 'static,
    ) -> Self {
        self.query_defaults = Some(Arc::new(provider));
        self
    }

    /// Static header merged into every request.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Fallback per-request timeout. Default 10 seconds.
    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Cookie behavior for the default transport.
    pub fn credentials(mut self, mode: CredentialsMode) -> Self {
        self.credentials = Some(mode);
        self
    }

    /// Inject the application's side-effect surface (toasts, redirects,
    /// lifecycle observers). Default is a no-op object.
    pub fn hooks(mut self, hooks: impl ClientHooks + 'static) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    /// Append an interceptor; they run in registration order.
    pub fn interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Substitute the transport (primarily for tests).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client. Fails fast when `base_url` is empty or the default
    /// transport cannot be constructed.
    pub fn build(self) -> Result<HttpClient> {
        if self.base_url.trim().is_empty() {
            return Err(Error::configuration("base_url must be non-empty"));
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.credentials)?),
        };

        HttpClient::new(ClientConfig {
            base_url: self.base_url,
            token: self.token,
            locale: self.locale,
            query_defaults: self.query_defaults,
            default_headers: self.default_headers,
            default_timeout: self.default_timeout,
            credentials: self.credentials,
            hooks: self.hooks,
            interceptors: self.interceptors,
            transport,
        })
    }
}
