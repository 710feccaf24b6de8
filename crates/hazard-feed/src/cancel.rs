//! Cooperative cancellation for fetches owned by a view.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "this view is gone" flag. Set once, never cleared.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// A guard that cancels this flag when dropped.
    pub fn guard(&self) -> CancelGuard {
        CancelGuard { flag: self.clone() }
    }
}

/// Cancels its flag on drop; tie it to the owning view's lifetime.
#[derive(Debug)]
pub struct CancelGuard {
    flag: CancelFlag,
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.flag.cancel();
    }
}
