//! Client configuration: constructed once in a composition root, long-lived
//! for the application lifetime, mutated only through
//! [`HttpClient::update_config`](crate::HttpClient::update_config).
//!
//! Cross-cutting concerns (auth token, locale header, notifications) are
//! injected here so the same client serves applications with different
//! auth/i18n/notification strategies.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::hooks::{ClientHooks, NoopHooks};
use crate::interceptors::Interceptor;
use crate::transport::Transport;

/// Fallback per-request timeout when neither the call nor the config
/// overrides it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Supplies the bearer credential per request. `None` means the request goes
/// out unauthenticated.
pub type TokenProvider = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Supplies the language tag applied as `Accept-Language`.
pub type LocaleProvider = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// Supplies default query parameters for requests that opt in via
/// [`RequestOptions::use_query_defaults`](crate::RequestOptions::use_query_defaults).
pub type QueryDefaultsProvider = Arc<dyn Fn() -> Option<QueryDefaults> + Send + Sync>;

/// Shape of the configured default query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryDefaults {
    /// A preformatted query string, without the leading `?`.
    Raw(String),
    /// Key/value pairs, percent-encoded by the client.
    Pairs(Vec<(String, String)>),
}

/// Cookie behavior forwarded to the transport, mirroring the credentials
/// modes of the browser fetch API the web applications configure.
///
/// The default reqwest transport enables its cookie store for
/// `SameOrigin` and `Include`; `Omit` sends no stored cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsMode {
    Omit,
    SameOrigin,
    Include,
}

/// Full client configuration.
///
/// Cheap to clone: providers, hooks, interceptors, and the transport are all
/// shared behind `Arc`.
#[derive(Clone)]
pub struct ClientConfig {
    /// Required. All endpoint paths are resolved against it.
    pub base_url: String,
    pub token: Option<TokenProvider>,
    pub locale: Option<LocaleProvider>,
    pub query_defaults: Option<QueryDefaultsProvider>,
    /// Static headers merged into every request.
    pub default_headers: HashMap<String, String>,
    pub default_timeout: Duration,
    /// Only forwarded to the transport when explicitly configured.
    pub credentials: Option<CredentialsMode>,
    pub hooks: Arc<dyn ClientHooks>,
    pub interceptors: Vec<Arc<dyn Interceptor>>,
    pub transport: Arc<dyn Transport>,
}

impl ClientConfig {
    /// Minimal config over an explicit transport. Prefer
    /// [`ClientBuilder`](crate::ClientBuilder) unless you are wiring a
    /// custom transport by hand.
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
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
            transport,
        }
    }

    /// Shallow merge, last-write-wins per key. Keys absent from the patch
    /// keep their current value.
    pub(crate) fn apply(&self, patch: ConfigPatch) -> ClientConfig {
        let mut next = self.clone();
        if let Some(base_url) = patch.base_url {
            if base_url.trim().is_empty() {
                tracing::warn!("ignoring empty base_url in config patch");
            } else {
                next.base_url = base_url;
            }
        }
        if let Some(token) = patch.token {
            next.token = Some(token);
        }
        if let Some(locale) = patch.locale {
            next.locale = Some(locale);
        }
        if let Some(query_defaults) = patch.query_defaults {
            next.query_defaults = Some(query_defaults);
        }
        if let Some(default_headers) = patch.default_headers {
            next.default_headers = default_headers;
        }
        if let Some(default_timeout) = patch.default_timeout {
            next.default_timeout = default_timeout;
        }
        if let Some(credentials) = patch.credentials {
            next.credentials = Some(credentials);
        }
        if let Some(hooks) = patch.hooks {
            next.hooks = hooks;
        }
        if let Some(interceptors) = patch.interceptors {
            next.interceptors = interceptors;
        }
        if let Some(transport) = patch.transport {
            next.transport = transport;
        }
        next
    }
}

/// Partial configuration for [`HttpClient::update_config`](crate::HttpClient::update_config).
///
/// Every field is optional; set fields replace the current value wholesale.
/// To clear a provider, set one that returns `None`.
#[derive(Clone, Default)]
pub struct ConfigPatch {
    pub base_url: Option<String>,
    pub token: Option<TokenProvider>,
    pub locale: Option<LocaleProvider>,
    pub query_defaults: Option<QueryDefaultsProvider>,
    pub default_headers: Option<HashMap<String, String>>,
    pub default_timeout: Option<Duration>,
    pub credentials: Option<CredentialsMode>,
    pub hooks: Option<Arc<dyn ClientHooks>>,
    pub interceptors: Option<Vec<Arc<dyn Interceptor>>>,
    pub transport: Option<Arc<dyn Transport>>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn token_provider(
        mut self,
        provider: impl Fn() -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.token = Some(Arc::new(provider));
        self
    }

    pub fn locale_provider(
        mut self,
        provider: impl Fn() -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        self.locale = Some(Arc::new(provider));
        self
    }

    pub fn query_defaults_provider(
        mut self,
        provider: impl Fn() -> Option<QueryDefaults> + Send + Sync + 'static,
    ) -> Self {
        self.query_defaults = Some(Arc::new(provider));
        self
    }

    pub fn default_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    pub fn credentials(mut self, mode: CredentialsMode) -> Self {
        self.credentials = Some(mode);
        self
    }

    pub fn hooks(mut self, hooks: impl ClientHooks + 'static) -> Self {
        self.hooks = Some(Arc::new(hooks));
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }
}
