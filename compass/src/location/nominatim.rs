//! Nominatim reverse geocoder.
//!
//! Issues one `GET {base}?format=jsonv2&lat=..&lon=..` per lookup and maps
//! the `address` object of the answer onto an [`Address`]. Nominatim answers
//! coordinates it cannot place (open sea, poles) with `{"error": ...}`,
//! which is reported as an empty result rather than a failure.

use std::time::Duration;

use serde::Deserialize;

use super::geocoder::{Address, GeocodeError, ReverseGeocoder};
use super::http::{HttpClient, ReqwestClient};

/// Public OpenStreetMap Nominatim reverse endpoint.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/reverse";

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    address: Option<AddressDetails>,
}

#[derive(Debug, Default, Deserialize)]
struct AddressDetails {
    house_number: Option<String>,
    road: Option<String>,
    suburb: Option<String>,
    postcode: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    hamlet: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

impl AddressDetails {
    fn into_address(self) -> Address {
        let mut lines = Vec::new();

        let street = match (self.road, self.house_number) {
            (Some(road), Some(number)) => Some(format!("{} {}", number, road)),
            (Some(road), None) => Some(road),
            (None, _) => None,
        };
        lines.extend(street);

        let district = match (self.postcode, self.suburb) {
            (Some(postcode), Some(suburb)) => Some(format!("{} {}", postcode, suburb)),
            (Some(postcode), None) => Some(postcode),
            (None, suburb) => suburb,
        };
        lines.extend(district);
        lines.extend(self.country);

        Address {
            lines,
            locality: self.city.or(self.town).or(self.village).or(self.hamlet),
            admin_area: self.state,
        }
    }
}

/// Reverse geocoder backed by a Nominatim-compatible HTTP API.
pub struct NominatimGeocoder<C: HttpClient = ReqwestClient> {
    base_url: String,
    client: C,
}

impl NominatimGeocoder<ReqwestClient> {
    /// Create a geocoder for `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, GeocodeError> {
        Ok(Self::with_client(base_url, ReqwestClient::with_timeout(timeout)?))
    }
}

impl<C: HttpClient> NominatimGeocoder<C> {
    /// Create a geocoder using a specific HTTP client.
    pub fn with_client(base_url: impl Into<String>, client: C) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn request_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}?format=jsonv2&lat={:.6}&lon={:.6}&zoom=18&addressdetails=1",
            self.base_url, latitude, longitude
        )
    }
}

impl<C: HttpClient> ReverseGeocoder for NominatimGeocoder<C> {
    fn lookup(&self, latitude: f64, longitude: f64) -> Result<Vec<Address>, GeocodeError> {
        let body = self.client.get(&self.request_url(latitude, longitude))?;
        parse_response(&body)
    }
}

fn parse_response(body: &[u8]) -> Result<Vec<Address>, GeocodeError> {
    let response: ReverseResponse =
        serde_json::from_slice(body).map_err(|e| GeocodeError::Malformed(e.to_string()))?;

    if let Some(error) = response.error {
        tracing::debug!(error = %error, "Nominatim could not place coordinates");
        return Ok(Vec::new());
    }

    Ok(response
        .address
        .map(|details| vec![details.into_address()])
        .unwrap_or_default())
}
