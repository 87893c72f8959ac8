//! Asynchronous stop requests from the host.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag the host raises to interrupt a running machine.
///
/// Clones share the same flag, so a clone can live in a signal handler
/// while the run loop polls another. The run loop consumes a request with
/// [`StopSignal::take`], so each raise stops at most one run.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    flag: Arc<AtomicBool>,
}

impl StopSignal {
    /// Creates a lowered signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests a stop. Safe to call from any thread.
    pub fn raise(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Returns whether a stop is pending without consuming it.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Consumes a pending stop request.
    pub fn take(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }
}
