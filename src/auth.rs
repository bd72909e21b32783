//! Startup-time token sourcing.
//!
//! Credentials never live in source. They are resolved once at process
//! start, from the OS keyring or the environment, and absence is a hard
//! construction failure rather than a client that limps along and fails on
//! its first authenticated call.

use std::sync::Arc;

use keyring::Entry;

use crate::config::TokenProvider;
use crate::{Error, Result};

/// Where a bearer token comes from.
#[derive(Debug, Clone)]
pub enum TokenSource {
    /// OS keyring entry.
    Keyring { service: String, account: String },
    /// Environment variable name.
    Env(String),
}

impl TokenSource {
    pub fn keyring(service: impl Into<String>, account: impl Into<String>) -> Self {
        TokenSource::Keyring {
            service: service.into(),
            account: account.into(),
        }
    }

    pub fn env(var: impl Into<String>) -> Self {
        TokenSource::Env(var.into())
    }

    /// Resolve the secret, treating an empty value as absent.
    pub fn resolve(&self) -> Option<String> {
        match self {
            TokenSource::Keyring { service, account } => Entry::new(service, account)
                .ok()?
                .get_password()
                .ok()
                .filter(|token| !token.is_empty()),
            TokenSource::Env(var) => std::env::var(var).ok().filter(|token| !token.is_empty()),
        }
    }
}

/// Resolve a token from the first source that has one and freeze it into a
/// provider. Fails hard when no source yields a token, so a misconfigured
/// process dies at startup instead of at first request.
pub fn require_token(sources: &[TokenSource]) -> Result<TokenProvider> {
    for source in sources {
        if let Some(token) = source.resolve() {
            return Ok(Arc::new(move || Some(token.clone())));
        }
    }
    Err(Error::configuration(
        "no bearer token available from any configured source",
    ))
}
