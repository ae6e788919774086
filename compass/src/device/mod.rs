//! Platform device services consumed by the engine.
//!
//! The engine never talks to hardware directly. It depends on three narrow
//! traits, one per resource the lifecycle binds:
//!
//! - [`SensorService`] - orientation sensor subscription
//! - [`PositionService`] - position fixes and satellite status
//! - [`WakeLock`] - keeps the display awake while the compass is in front
//!
//! Callbacks are plain closures. Implementations may invoke them from any
//! thread; the engine's callbacks only enqueue an event for the event thread.
//!
//! The [`manual`] implementations deliver data only when told to, which is
//! what replay tools and tests need.

pub mod manual;
mod types;

pub use types::{
    DeviceError, OrientationCallback, PositionCallback, PositionEvent, PositionRequest,
    PositionService, PositionSubscription, SensorKind, SensorRate, SensorService,
    SensorSubscription, WakeLock, DEFAULT_MIN_DISTANCE_M, DEFAULT_MIN_INTERVAL_MS,
};
