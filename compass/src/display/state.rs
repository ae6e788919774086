use crate::location::{satellites_text, GnssStatus, LocationReadout};
use crate::orientation::RawOrientationSample;

/// Sensor readout before the first accepted sample.
pub const NO_SENSOR_DATA: &str = "No sensor data yet...";

/// Sensor readout when the orientation sensor could not be acquired.
pub const SENSOR_UNAVAILABLE: &str = "Orientation sensor unavailable";

/// Location readout when position updates could not be acquired.
pub const POSITIONING_UNAVAILABLE: &str = "Positioning unavailable";

/// Label above a stale fix shown while positioning is unavailable.
pub const LAST_KNOWN_LABEL: &str = "Last known location:";

/// Readouts for the text panels.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    sensor_available: bool,
    positioning_available: bool,
    last_sample: Option<RawOrientationSample>,
    location: LocationReadout,
    satellites: Option<GnssStatus>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            sensor_available: true,
            positioning_available: true,
            last_sample: None,
            location: LocationReadout::unknown(),
            satellites: None,
        }
    }
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the sample that produced the latest accepted heading.
    pub fn record_sample(&mut self, sample: RawOrientationSample) {
        self.last_sample = Some(sample);
    }

    pub fn set_location(&mut self, readout: LocationReadout) {
        self.location = readout;
    }

    pub fn set_satellites(&mut self, status: GnssStatus) {
        self.satellites = Some(status);
    }

    /// Mark which device resources the last activation obtained.
    pub fn set_availability(&mut self, sensor: bool, positioning: bool) {
        self.sensor_available = sensor;
        self.positioning_available = positioning;
    }

    /// Whether the last activation obtained the orientation sensor.
    pub fn sensor_available(&self) -> bool {
        self.sensor_available
    }

    /// Whether the last activation obtained position updates.
    pub fn positioning_available(&self) -> bool {
        self.positioning_available
    }

    pub fn last_sample(&self) -> Option<RawOrientationSample> {
        self.last_sample
    }

    pub fn location(&self) -> &LocationReadout {
        &self.location
    }

    /// Azimuth, pitch and roll as whole degrees, one per line.
    ///
    /// Shows [`SENSOR_UNAVAILABLE`] whenever the current activation has no
    /// sensor, whatever an earlier activation recorded.
    pub fn sensor_text(&self) -> String {
        if !self.sensor_available {
            return SENSOR_UNAVAILABLE.to_string();
        }
        match self.last_sample {
            Some(sample) => format!(
                "Azimuth: {}\nPitch: {}\nRoll: {}",
                sample.azimuth as i32, sample.pitch as i32, sample.roll as i32
            ),
            None => NO_SENSOR_DATA.to_string(),
        }
    }

    /// Location panel text. Without positioning, a known fix is only shown
    /// under a "last known" label.
    pub fn location_text(&self) -> String {
        if self.positioning_available {
            return self.location.text.clone();
        }
        if self.location.is_known() {
            format!(
                "{}\n{}\n{}",
                POSITIONING_UNAVAILABLE, LAST_KNOWN_LABEL, self.location.text
            )
        } else {
            POSITIONING_UNAVAILABLE.to_string()
        }
    }

    /// Empty until the first status update.
    pub fn satellites_text(&self) -> String {
        self.satellites
            .as_ref()
            .map(satellites_text)
            .unwrap_or_default()
    }
}
