//! External stop signal for a running crawl

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    raised: AtomicBool,
    notify: Notify,
}

/// Cloneable flag that asks a crawl to stop
///
/// The coordinator checks it before admitting each URL and also wakes up on
/// it while waiting for in-flight fetches, which are then aborted.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    inner: Arc<Inner>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the crawl to stop. Raising twice is harmless.
    pub fn raise(&self) {
        self.inner.raised.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_raised(&self) -> bool {
        self.inner.raised.load(Ordering::SeqCst)
    }

    /// Completes once the signal has been raised
    pub async fn raised(&self) {
        loop {
            // Registered before the check so a concurrent raise is not missed
            let notified = self.inner.notify.notified();
            if self.is_raised() {
                return;
            }
            notified.await;
        }
    }
}
