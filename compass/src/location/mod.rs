//! Positional context for the compass display.
//!
//! The position subscription delivers fixes far less often than the
//! orientation sensor (at most every 10 s, and only after 10 m of movement).
//! Each fix is turned into a human-readable [`LocationReadout`]: an optional
//! reverse-geocoded address, the raw coordinates, and how long ago the fix
//! was taken.
//!
//! Reverse geocoding is best effort. A missing geocoder or a failed lookup
//! is logged and the readout falls back to coordinates only; lookups are
//! never retried.
//!
//! # Example
//!
//! ```ignore
//! use compass::location::{LocationPipeline, NoGeocoder};
//! use std::sync::Arc;
//!
//! let pipeline = LocationPipeline::new(Arc::new(NoGeocoder));
//! let readout = pipeline.update(Some(&fix), chrono::Utc::now());
//! println!("{}", readout.text);
//! ```

mod fix;
mod geocoder;
mod http;
mod nominatim;
mod pipeline;
mod relative_time;

pub use fix::{GnssStatus, LocationFix};
pub use geocoder::{Address, GeocodeError, NoGeocoder, ReverseGeocoder};
pub use http::{HttpClient, ReqwestClient};
pub use nominatim::{NominatimGeocoder, DEFAULT_NOMINATIM_URL};
pub use pipeline::{satellites_text, LocationPipeline, LocationReadout, LOCATION_UNKNOWN};
pub use relative_time::relative_time_span;

#[cfg(test)]
pub use http::tests::MockHttpClient;
