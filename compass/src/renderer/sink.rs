//! Redraw request abstraction.
//!
//! The renderer does not know how the host schedules frames. It only calls
//! [`RedrawSink::request_redraw`]; the host decides when to run its draw
//! callback, which then asks the renderer for the current transform.

use std::sync::atomic::{AtomicU64, Ordering};

/// Receives redraw requests from the renderer.
pub trait RedrawSink: Send + Sync {
    /// Ask the host to redraw the compass surface.
    fn request_redraw(&self);
}

/// Sink that counts requests.
///
/// Hosts that poll (a replay tool, tests) compare the count with the
/// value they saw last frame to know whether anything changed.
#[derive(Debug, Default)]
pub struct CountingRedrawSink {
    requests: AtomicU64,
}

impl CountingRedrawSink {
    /// Create a sink with a zero count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total redraw requests received.
    pub fn count(&self) -> u64 {
        self.requests.load(Ordering::Acquire)
    }
}

impl RedrawSink for CountingRedrawSink {
    fn request_redraw(&self) {
        self.requests.fetch_add(1, Ordering::AcqRel);
    }
}
