//! Location fix and satellite status types.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// A position reported by the positioning service.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Altitude in metres, when the provider reports one.
    pub altitude: Option<f64>,
    /// When the fix was taken.
    pub time: DateTime<Utc>,
    /// Name of the provider that produced the fix (e.g. "gps").
    pub provider: String,
}

impl LocationFix {
    /// Create a fix without altitude.
    pub fn new(latitude: f64, longitude: f64, time: DateTime<Utc>, provider: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            altitude: None,
            time,
            provider: provider.into(),
        }
    }

    /// Attach an altitude in metres.
    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }
}

/// Satellite status reported alongside fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GnssStatus {
    /// Time from starting the receiver to its first fix, once known.
    pub time_to_first_fix: Option<Duration>,
    /// Satellites currently visible.
    pub satellites_in_view: u32,
    /// Satellites used in the last fix.
    pub satellites_used: u32,
}
