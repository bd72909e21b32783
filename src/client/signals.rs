//! Caller-side cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Cloneable cancellation signal for in-flight calls.
///
/// Hand a clone to one or more calls via
/// [`RequestOptions::cancel_handle`](crate::RequestOptions::cancel_handle);
/// each call combines it with its own timeout, first to fire wins.
/// Cancelling resolves those calls with status 499 and touches nothing
/// else in flight.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every call holding a clone of this handle. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Resolve once `cancel` has been called.
    ///
    /// The enable-then-recheck dance closes the race between a waiter
    /// registering and `notify_waiters` firing.
    pub(crate) async fn cancelled(&self) {
        let notified = self.inner.notify.notified();
        tokio::pin!(notified);
        loop {
            if self.is_cancelled() {
                return;
            }
            notified.as_mut().enable();
            if self.is_cancelled() {
                return;
            }
            notified.as_mut().await;
            notified.set(self.inner.notify.notified());
        }
    }
}
