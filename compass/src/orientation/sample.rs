//! Orientation sample types.

use std::fmt;

/// A single reading from the orientation sensor.
///
/// All angles are in degrees. Azimuth is in `[0, 360)` with 0 = north,
/// pitch and roll are in `[-180, 180)`. Samples carry no timestamp; their
/// order of arrival is the only ordering that matters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawOrientationSample {
    /// Compass heading in degrees.
    pub azimuth: f32,
    /// Rotation around the device's lateral axis in degrees.
    pub pitch: f32,
    /// Rotation around the device's longitudinal axis in degrees.
    pub roll: f32,
}

impl RawOrientationSample {
    /// Create a sample from all three angles.
    pub fn new(azimuth: f32, pitch: f32, roll: f32) -> Self {
        Self {
            azimuth,
            pitch,
            roll,
        }
    }

    /// Create a sample lying flat (pitch and roll of zero).
    pub fn from_azimuth(azimuth: f32) -> Self {
        Self::new(azimuth, 0.0, 0.0)
    }

    /// Whether the azimuth is usable by the filter.
    pub fn is_valid(&self) -> bool {
        self.azimuth.is_finite()
    }
}

/// The most recently accepted azimuth, in degrees.
///
/// Only [`OrientationFilter`](super::OrientationFilter) creates these.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FilteredHeading(f32);

impl FilteredHeading {
    pub(crate) fn new(degrees: f32) -> Self {
        Self(degrees)
    }

    /// Heading in degrees.
    pub fn degrees(&self) -> f32 {
        self.0
    }
}

impl fmt::Display for FilteredHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}
