//! Resilience decorators layered around the base client.
//!
//! The core client never retries: a failed call is terminal there, which
//! keeps the request pipeline single-responsibility and makes test
//! expectations exact ("the transport was called once"). Retry policy is an
//! explicit wrapper an application opts into at composition time.

pub mod retry;

pub use retry::{RetryPolicy, RetryingClient};
