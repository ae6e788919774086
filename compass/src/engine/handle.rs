//! Host-side view of a running engine.

use tokio::sync::{mpsc::UnboundedSender, watch};

use super::event::EngineEvent;
use crate::display::DisplayState;
use crate::lifecycle::{Generation, LifecycleState, ResourceSnapshot};
use crate::orientation::FilteredHeading;
use crate::renderer::{RenderTransform, SurfaceBounds};

/// Everything a host needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineSnapshot {
    pub display: DisplayState,
    /// Heading to draw. `None` before the first accepted sample and while
    /// the current activation has no orientation sensor.
    pub heading: Option<FilteredHeading>,
    pub lifecycle: LifecycleState,
    pub generation: Generation,
    pub resources: ResourceSnapshot,
    pub redraw_requests: u64,
    pub accepted: u64,
    pub dropped: u64,
}

impl EngineSnapshot {
    /// Rotation for the dial on a surface of `bounds`.
    pub fn transform(&self, bounds: SurfaceBounds) -> RenderTransform {
        let degrees = self.heading.map(|h| h.degrees()).unwrap_or(0.0);
        RenderTransform::for_heading(degrees, bounds)
    }
}

/// Cloneable handle for driving an engine from another thread.
#[derive(Clone)]
pub struct EngineHandle {
    tx: UnboundedSender<EngineEvent>,
    snapshots: watch::Receiver<EngineSnapshot>,
}

impl EngineHandle {
    pub(crate) fn new(
        tx: UnboundedSender<EngineEvent>,
        snapshots: watch::Receiver<EngineSnapshot>,
    ) -> Self {
        Self { tx, snapshots }
    }

    /// Queue an event. Returns false if the engine has stopped.
    pub fn send(&self, event: EngineEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn foreground(&self) -> bool {
        self.send(EngineEvent::Foreground)
    }

    pub fn background(&self) -> bool {
        self.send(EngineEvent::Background)
    }

    pub fn shutdown(&self) -> bool {
        self.send(EngineEvent::Shutdown)
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> EngineSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified whenever a new snapshot is published.
    pub fn watch(&self) -> watch::Receiver<EngineSnapshot> {
        self.snapshots.clone()
    }
}
