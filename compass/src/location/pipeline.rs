//! Location fix → display text.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::fix::{GnssStatus, LocationFix};
use super::geocoder::{Address, ReverseGeocoder};
use super::relative_time::relative_time_span;

/// Readout shown when no fix has ever been received.
pub const LOCATION_UNKNOWN: &str = "Location is not known";

/// Text describing the current position.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationReadout {
    /// Multi-line text for the location panel.
    pub text: String,
    /// Geocoded address, when the lookup succeeded.
    pub address: Option<Address>,
    /// Fix the readout was built from.
    pub fix: Option<LocationFix>,
}

impl LocationReadout {
    /// Readout for "no fix yet".
    pub fn unknown() -> Self {
        Self {
            text: LOCATION_UNKNOWN.to_string(),
            address: None,
            fix: None,
        }
    }

    /// Whether a fix backs this readout.
    pub fn is_known(&self) -> bool {
        self.fix.is_some()
    }
}

impl Default for LocationReadout {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Builds location readouts, geocoding each fix once.
pub struct LocationPipeline {
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl LocationPipeline {
    /// Create a pipeline using `geocoder` for address lookups.
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self { geocoder }
    }

    /// Build the readout for a fix (or its absence) as of `now`.
    ///
    /// Geocoding failures are swallowed: the readout then only carries
    /// coordinates, altitude and fix age.
    pub fn update(&self, fix: Option<&LocationFix>, now: DateTime<Utc>) -> LocationReadout {
        let Some(fix) = fix else {
            return LocationReadout::unknown();
        };

        let address = self.geocode(fix);
        let mut lines = Vec::new();

        if let Some(ref address) = address {
            lines.extend(address_lines(address));
        }

        let mut coordinates = format!("Lat: {:.2} Long: {:.2}", fix.latitude, fix.longitude);
        if let Some(altitude) = fix.altitude {
            coordinates.push_str(&format!(" Alt: {:.2}", altitude));
        }
        lines.push(coordinates);

        lines.push(format!(
            "{} via {}",
            relative_time_span(fix.time, now),
            fix.provider
        ));

        LocationReadout {
            text: lines.join("\n"),
            address,
            fix: Some(fix.clone()),
        }
    }

    fn geocode(&self, fix: &LocationFix) -> Option<Address> {
        if !self.geocoder.is_present() {
            return None;
        }

        match self.geocoder.lookup(fix.latitude, fix.longitude) {
            Ok(addresses) => {
                let first = addresses.into_iter().next();
                if first.is_none() {
                    debug!(
                        latitude = fix.latitude,
                        longitude = fix.longitude,
                        "No address for location"
                    );
                }
                first
            }
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed, showing coordinates only");
                None
            }
        }
    }
}

/// Address block: two address lines, then "locality, admin area".
fn address_lines(address: &Address) -> Vec<String> {
    let mut lines: Vec<String> = address.lines.iter().take(2).cloned().collect();

    let region = match (&address.locality, &address.admin_area) {
        (Some(locality), Some(admin)) => Some(format!("{}, {}", locality, admin)),
        (Some(locality), None) => Some(locality.clone()),
        (None, Some(admin)) => Some(admin.clone()),
        (None, None) => None,
    };
    lines.extend(region);
    lines
}

/// Satellites panel text for a status update.
pub fn satellites_text(status: &GnssStatus) -> String {
    let first_fix = match status.time_to_first_fix {
        Some(ttff) => format!("{}ms", ttff.as_millis()),
        None => "no fix yet".to_string(),
    };
    format!(
        "Satellites time-to-first-fix: {} ({}/{} used)",
        first_fix, status.satellites_used, status.satellites_in_view
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{GeocodeError, NoGeocoder};
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedGeocoder {
        result: Result<Vec<Address>, GeocodeError>,
        calls: AtomicUsize,
    }

    impl FixedGeocoder {
        fn new(result: Result<Vec<Address>, GeocodeError>) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl ReverseGeocoder for FixedGeocoder {
        fn lookup(&self, _lat: f64, _lon: f64) -> Result<Vec<Address>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn hamburg() -> Address {
        Address {
            lines: vec!["12 Jungfernstieg".to_string(), "20354 Neustadt".to_string()],
            locality: Some("Hamburg".to_string()),
            admin_area: Some("Hamburg".to_string()),
        }
    }

    fn fix_minutes_ago(minutes: i64, now: DateTime<Utc>) -> LocationFix {
        LocationFix::new(53.5534, 9.9926, now - Duration::minutes(minutes), "gps")
    }

    #[test]
    fn test_no_fix_is_unknown() {
        let pipeline = LocationPipeline::new(Arc::new(NoGeocoder));
        let readout = pipeline.update(None, Utc::now());
        assert_eq!(readout.text, LOCATION_UNKNOWN);
        assert!(!readout.is_known());
    }

    #[test]
    fn test_coordinates_only_without_geocoder() {
        let now = Utc::now();
        let pipeline = LocationPipeline::new(Arc::new(NoGeocoder));
        let readout = pipeline.update(Some(&fix_minutes_ago(5, now)), now);

        assert_eq!(readout.text, "Lat: 53.55 Long: 9.99\n5 minutes ago via gps");
        assert!(readout.address.is_none());
        assert!(readout.is_known());
    }

    #[test]
    fn test_altitude_appended() {
        let now = Utc::now();
        let pipeline = LocationPipeline::new(Arc::new(NoGeocoder));
        let fix = fix_minutes_ago(0, now).with_altitude(7.256);
        let readout = pipeline.update(Some(&fix), now);

        assert!(readout.text.starts_with("Lat: 53.55 Long: 9.99 Alt: 7.26\n"));
    }

    #[test]
    fn test_geocoded_address_precedes_coordinates() {
        let now = Utc::now();
        let geocoder = FixedGeocoder::new(Ok(vec![hamburg()]));
        let pipeline = LocationPipeline::new(geocoder.clone());
        let readout = pipeline.update(Some(&fix_minutes_ago(0, now)), now);

        assert_eq!(
            readout.text,
            "12 Jungfernstieg\n20354 Neustadt\nHamburg, Hamburg\nLat: 53.55 Long: 9.99\njust now via gps"
        );
        assert_eq!(readout.address, Some(hamburg()));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_lookup_failure_is_swallowed() {
        let now = Utc::now();
        let geocoder = FixedGeocoder::new(Err(GeocodeError::Lookup("timeout".to_string())));
        let pipeline = LocationPipeline::new(geocoder.clone());
        let readout = pipeline.update(Some(&fix_minutes_ago(0, now)), now);

        assert_eq!(readout.text, "Lat: 53.55 Long: 9.99\njust now via gps");
        assert!(readout.address.is_none());
        // Never retried
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_lookup_result() {
        let now = Utc::now();
        let pipeline = LocationPipeline::new(FixedGeocoder::new(Ok(Vec::new())));
        let readout = pipeline.update(Some(&fix_minutes_ago(0, now)), now);
        assert!(readout.address.is_none());
        assert!(readout.text.starts_with("Lat:"));
    }

    #[test]
    fn test_satellites_text() {
        let status = GnssStatus {
            time_to_first_fix: Some(std::time::Duration::from_millis(4200)),
            satellites_in_view: 11,
            satellites_used: 7,
        };
        assert_eq!(
            satellites_text(&status),
            "Satellites time-to-first-fix: 4200ms (7/11 used)"
        );
        assert_eq!(
            satellites_text(&GnssStatus::default()),
            "Satellites time-to-first-fix: no fix yet (0/0 used)"
        );
    }
}
