//! Terminal UI for the compass.
//!
//! # Module Structure
//!
//! - `dial` - rotating compass dial widget
//! - `dashboard` - terminal setup, layout and key handling

pub mod dashboard;
pub mod dial;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use compass::renderer::RedrawSink;

pub use dashboard::{Dashboard, DashboardEvent};

/// Redraw requests from the engine, consumed by the UI loop.
#[derive(Debug, Default)]
pub struct FrameRequests {
    pending: AtomicBool,
    total: AtomicU64,
}

impl FrameRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a redraw was requested since the last call.
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Redraw requests received so far.
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Acquire)
    }
}

impl RedrawSink for FrameRequests {
    fn request_redraw(&self) {
        self.total.fetch_add(1, Ordering::AcqRel);
        self.pending.store(true, Ordering::Release);
    }
}
