//! The event loop tying sensors, lifecycle, filter and renderer together.
//!
//! # Threading
//!
//! ```text
//!  sensor thread ──┐
//!  position thread ┼──► mpsc (unbounded) ──► event thread ──► renderer ──► RedrawSink
//!  host (f/b/q) ───┘                              │
//!                                                 └──► watch<EngineSnapshot> ──► host UI
//! ```
//!
//! Device callbacks run on whatever thread the platform chooses. They never
//! touch engine state; they enqueue an [`EngineEvent`] tagged with the
//! lifecycle generation they were registered under. The engine consumes the
//! queue on a single thread, so the filter, renderer and coordinator need no
//! locking. Events whose generation is stale (delivered after the
//! subscription that produced them was released) are discarded.
//!
//! # Example
//!
//! ```ignore
//! let engine = CompassEngine::new(services, Arc::new(NoGeocoder), sink, CoordinatorConfig::default());
//! let handle = engine.handle();
//! let thread = engine.spawn()?;
//!
//! handle.foreground();
//! // ... samples flow, snapshots arrive on handle.watch()
//! handle.background();
//! handle.shutdown();
//! let engine = thread.join().expect("engine thread panicked");
//! ```

mod compass_engine;
mod event;
mod handle;

pub use compass_engine::CompassEngine;
pub use event::{ChannelCallbacks, EngineEvent};
pub use handle::{EngineHandle, EngineSnapshot};
