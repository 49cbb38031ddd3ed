//! View-scoped loading
//!
//! A [`ViewScope`] is owned by whatever displays fetched data. Closing it
//! does not abort in-flight requests; it only makes sure a result that
//! arrives afterwards is dropped instead of applied.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Liveness flag shared between a view and its pending loads
#[derive(Debug, Clone)]
pub struct ViewScope {
    open: Arc<AtomicBool>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    /// Create an open scope
    pub fn new() -> Self {
        Self {
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Mark the view as gone
    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }

    /// Whether results should still be applied
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Await `load` and hand back its output only if the scope is still open
    pub async fn run<F>(&self, load: F) -> Option<F::Output>
    where
        F: Future,
    {
        let output = load.await;
        if self.is_open() {
            Some(output)
        } else {
            debug!("View closed before load finished, discarding result");
            None
        }
    }
}
