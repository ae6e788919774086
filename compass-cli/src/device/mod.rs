//! Device services for running the compass without hardware.

mod simulated;

pub use simulated::{
    SimulatedPositionService, SimulatedSensorService, SimulatedWakeLock, DEFAULT_SWEEP_RATE,
};
