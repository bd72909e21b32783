//! # realty-client
//!
//! Unified REST client for the Realty marketplace backend. One configurable
//! request/response pipeline wraps the HTTP transport and injects the
//! cross-cutting concerns every application needs (bearer token, locale
//! header, timeout, success/error side effects) without hard-coding them,
//! so the same client serves the admin dashboard, the public web app, and
//! any headless tool with different auth/i18n/notification strategies.
//!
//! ## Core contract
//!
//! - **Never throws for ordinary failures**: every call returns
//!   [`ApiResponse`], with HTTP errors, parse failures, timeouts, and
//!   network failures all normalized into it. Callers branch on
//!   `is_error`, never `match` on a `Result`.
//! - **Config is injected, not global**: build one [`HttpClient`] in a
//!   composition root and pass it around. There is no module-level default
//!   instance, and no credential ever appears in source (see [`auth`]).
//! - **Snapshot semantics**: each call captures the configuration once at
//!   dispatch; [`HttpClient::update_config`] affects only later calls.
//! - **No retries in the core**: a failed call is terminal. Layer
//!   [`RetryingClient`](resilience::RetryingClient) on top when a surface
//!   wants bounded retries with idempotency-key discipline.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use realty_client::{HttpClient, RequestOptions};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Listing {
//!     id: i64,
//!     title: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> realty_client::Result<()> {
//!     let token = realty_client::auth::require_token(&[
//!         realty_client::auth::TokenSource::env("REALTY_API_TOKEN"),
//!     ])?;
//!
//!     let client = HttpClient::builder("https://api.realty.example/v1")
//!         .token_provider(move || token())
//!         .locale_provider(|| Some("ar".to_owned()))
//!         .build()?;
//!
//!     let resp = client
//!         .get::<Vec<Listing>>("/listings", RequestOptions::new().param("page", 1))
//!         .await;
//!     if resp.is_error {
//!         eprintln!("listing fetch failed: {:?}", resp.message);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | Request pipeline, builder, per-call options and responses |
//! | [`config`] | Injected configuration and atomic config patches |
//! | [`transport`] | Transport seam and the default reqwest implementation |
//! | [`hooks`] | Application side effects (toasts, 401 redirects, lifecycle) |
//! | [`interceptors`] | Logging/metrics/audit hooks around the pipeline |
//! | [`resilience`] | Opt-in retry decorator |
//! | [`auth`] | Startup-time token sourcing (keyring, environment) |

pub mod auth;
pub mod client;
pub mod config;
pub mod hooks;
pub mod interceptors;
pub mod resilience;
pub mod transport;

// Re-export main types for convenience
pub use client::{ApiResponse, CancelHandle, ClientBuilder, HttpClient, RequestBody, RequestOptions};
pub use config::{ClientConfig, ConfigPatch, CredentialsMode, QueryDefaults};
pub use hooks::{ClientHooks, NoopHooks, NotifyKind};
pub use resilience::{RetryPolicy, RetryingClient};

/// HTTP method type used across the call surface.
pub use reqwest::Method;

/// Result type alias for the library's fallible edges (construction, secret
/// resolution). Request calls themselves return [`ApiResponse`], never this.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::Error;
