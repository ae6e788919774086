//! Device service traits and their value types.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::location::{GnssStatus, LocationFix};
use crate::orientation::RawOrientationSample;

/// Default minimum time between position fixes, in milliseconds.
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 10_000;

/// Default minimum displacement between position fixes, in metres.
pub const DEFAULT_MIN_DISTANCE_M: f32 = 10.0;

/// Callback receiving orientation samples.
pub type OrientationCallback = Arc<dyn Fn(RawOrientationSample) + Send + Sync>;

/// Callback receiving position events.
pub type PositionCallback = Arc<dyn Fn(PositionEvent) + Send + Sync>;

// ─────────────────────────────────────────────────────────────────────────────
// Sensors
// ─────────────────────────────────────────────────────────────────────────────

/// Kind of sensor to subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Fused azimuth/pitch/roll orientation sensor.
    Orientation,
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorKind::Orientation => write!(f, "orientation"),
        }
    }
}

/// Requested sample delivery rate.
///
/// A hint: platforms may deliver faster or slower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SensorRate {
    /// Rate suitable for screen orientation changes (~5 Hz).
    #[default]
    Normal,
    /// Rate suitable for user interface updates (~15 Hz).
    Ui,
    /// Rate suitable for games (~50 Hz).
    Game,
    /// As fast as the hardware allows.
    Fastest,
}

impl SensorRate {
    /// Config/CLI name of the rate.
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorRate::Normal => "normal",
            SensorRate::Ui => "ui",
            SensorRate::Game => "game",
            SensorRate::Fastest => "fastest",
        }
    }

    /// Nominal interval between samples at this rate.
    pub fn nominal_interval(&self) -> Duration {
        match self {
            SensorRate::Normal => Duration::from_millis(200),
            SensorRate::Ui => Duration::from_millis(66),
            SensorRate::Game => Duration::from_millis(20),
            SensorRate::Fastest => Duration::ZERO,
        }
    }
}

impl fmt::Display for SensorRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SensorRate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(SensorRate::Normal),
            "ui" => Ok(SensorRate::Ui),
            "game" => Ok(SensorRate::Game),
            "fastest" => Ok(SensorRate::Fastest),
            other => Err(format!(
                "unknown sensor rate '{}' (expected normal, ui, game or fastest)",
                other
            )),
        }
    }
}

/// Opaque token for an active sensor subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SensorSubscription(u64);

impl SensorSubscription {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Positioning
// ─────────────────────────────────────────────────────────────────────────────

/// Filter applied by the positioning service before delivering a fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionRequest {
    /// Minimum time between fixes.
    pub min_interval: Duration,
    /// Minimum displacement between fixes, in metres.
    pub min_distance_m: f32,
}

impl Default for PositionRequest {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(DEFAULT_MIN_INTERVAL_MS),
            min_distance_m: DEFAULT_MIN_DISTANCE_M,
        }
    }
}

/// Something the positioning service reports.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionEvent {
    /// A new position fix.
    Fix(LocationFix),
    /// Updated satellite status.
    Status(GnssStatus),
}

/// Opaque token for an active position subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionSubscription(u64);

impl PositionSubscription {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors and traits
// ─────────────────────────────────────────────────────────────────────────────

/// Errors reported by device services.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeviceError {
    /// The device has no sensor of this kind.
    #[error("No {0} sensor on this device")]
    SensorUnavailable(SensorKind),

    /// Positioning is switched off or not permitted.
    #[error("Positioning disabled: {0}")]
    PositioningDisabled(String),

    /// The keep-awake lock cannot be taken.
    #[error("Wake lock unavailable: {0}")]
    WakeLockUnavailable(String),

    /// A handle that this service never issued (or already released).
    #[error("Unknown subscription: {0}")]
    UnknownSubscription(u64),

    /// Any other platform failure.
    #[error("Platform error: {0}")]
    Platform(String),
}

/// Orientation sensor subscriptions.
pub trait SensorService: Send + Sync {
    /// Start delivering samples of `kind` to `callback` at roughly `rate`.
    fn subscribe(
        &self,
        kind: SensorKind,
        rate: SensorRate,
        callback: OrientationCallback,
    ) -> Result<SensorSubscription, DeviceError>;

    /// Stop a subscription. No callback may run for it after this returns.
    fn unsubscribe(&self, handle: SensorSubscription) -> Result<(), DeviceError>;
}

/// Position update subscriptions.
pub trait PositionService: Send + Sync {
    /// Start delivering fixes (subject to `request`) and status to `callback`.
    fn subscribe(
        &self,
        request: PositionRequest,
        callback: PositionCallback,
    ) -> Result<PositionSubscription, DeviceError>;

    /// Stop a subscription.
    fn unsubscribe(&self, handle: PositionSubscription) -> Result<(), DeviceError>;

    /// Most recent fix known to the service, if any.
    fn last_known(&self) -> Option<LocationFix>;

    /// Provider name shown in the location readout.
    fn provider_name(&self) -> &str;
}

/// Keep-awake lock. Acquire and release must balance 1:1.
pub trait WakeLock: Send + Sync {
    fn acquire(&self) -> Result<(), DeviceError>;
    fn release(&self) -> Result<(), DeviceError>;
    fn is_held(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_rate_round_trip_names() {
        for rate in [
            SensorRate::Normal,
            SensorRate::Ui,
            SensorRate::Game,
            SensorRate::Fastest,
        ] {
            assert_eq!(rate.as_str().parse::<SensorRate>(), Ok(rate));
        }
        assert_eq!(" GAME ".parse::<SensorRate>(), Ok(SensorRate::Game));
        assert!("turbo".parse::<SensorRate>().is_err());
    }

    #[test]
    fn test_sensor_rate_intervals_are_ordered() {
        assert!(SensorRate::Normal.nominal_interval() > SensorRate::Ui.nominal_interval());
        assert!(SensorRate::Ui.nominal_interval() > SensorRate::Game.nominal_interval());
        assert_eq!(SensorRate::Fastest.nominal_interval(), Duration::ZERO);
    }

    #[test]
    fn test_default_position_request() {
        let request = PositionRequest::default();
        assert_eq!(request.min_interval, Duration::from_millis(10_000));
        assert_eq!(request.min_distance_m, 10.0);
    }

    #[test]
    fn test_device_error_display() {
        assert_eq!(
            DeviceError::SensorUnavailable(SensorKind::Orientation).to_string(),
            "No orientation sensor on this device"
        );
    }
}
