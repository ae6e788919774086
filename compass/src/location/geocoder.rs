//! Reverse geocoding abstraction.

use thiserror::Error;

/// A human-readable place description.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    /// Free-form address lines, most specific first.
    pub lines: Vec<String>,
    /// City, town or village.
    pub locality: Option<String>,
    /// State, province or region.
    pub admin_area: Option<String>,
}

impl Address {
    /// Address line at `index`, if present.
    pub fn address_line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }
}

/// Errors from a reverse-geocoding lookup.
///
/// None of these are fatal to the display; callers fall back to showing
/// coordinates only.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeocodeError {
    /// No geocoding service is available on this host.
    #[error("Geocoder not present")]
    NotPresent,

    /// The lookup itself failed (network, HTTP status).
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// The service answered with something we could not parse.
    #[error("Malformed geocoder response: {0}")]
    Malformed(String),
}

/// Maps coordinates to addresses.
///
/// Implementations perform a single synchronous lookup and must bound their
/// own run time (e.g. with a request timeout): they are called from the
/// engine's event thread.
pub trait ReverseGeocoder: Send + Sync {
    /// Whether a lookup can be attempted at all.
    fn is_present(&self) -> bool {
        true
    }

    /// Look up addresses for a coordinate, best match first.
    fn lookup(&self, latitude: f64, longitude: f64) -> Result<Vec<Address>, GeocodeError>;
}

/// Stand-in used when no geocoding service is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoGeocoder;

impl ReverseGeocoder for NoGeocoder {
    fn is_present(&self) -> bool {
        false
    }

    fn lookup(&self, _latitude: f64, _longitude: f64) -> Result<Vec<Address>, GeocodeError> {
        Err(GeocodeError::NotPresent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_geocoder() {
        let geocoder = NoGeocoder;
        assert!(!geocoder.is_present());
        assert_eq!(geocoder.lookup(0.0, 0.0), Err(GeocodeError::NotPresent));
    }

    #[test]
    fn test_address_line() {
        let address = Address {
            lines: vec!["1 Main St".to_string()],
            ..Default::default()
        };
        assert_eq!(address.address_line(0), Some("1 Main St"));
        assert_eq!(address.address_line(1), None);
    }

    #[test]
    fn test_error_display() {
        let err = GeocodeError::Lookup("HTTP 503".to_string());
        assert_eq!(err.to_string(), "Lookup failed: HTTP 503");
    }
}
