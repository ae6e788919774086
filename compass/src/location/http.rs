//! HTTP client abstraction for testability

use std::time::Duration;

use super::geocoder::GeocodeError;

/// Trait for HTTP client operations.
///
/// Lets the geocoder be tested without network access by injecting a mock.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> Result<Vec<u8>, GeocodeError>;
}

/// Real HTTP client implementation using reqwest.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with the given request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, GeocodeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("compass/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeocodeError::Lookup(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, GeocodeError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| GeocodeError::Lookup(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(GeocodeError::Lookup(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| GeocodeError::Lookup(format!("Failed to read response: {}", e)))
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock HTTP client returning a canned response and recording URLs.
    pub struct MockHttpClient {
        pub response: Result<Vec<u8>, GeocodeError>,
        pub requested: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn new(response: Result<Vec<u8>, GeocodeError>) -> Self {
            Self {
                response,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, GeocodeError> {
            self.requested.lock().unwrap().push(url.to_string());
            self.response.clone()
        }
    }

    #[test]
    fn test_mock_client_records_urls() {
        let mock = MockHttpClient::new(Ok(vec![1, 2, 3]));
        assert_eq!(mock.get("http://example.com/a").unwrap(), vec![1, 2, 3]);
        assert_eq!(mock.requested.lock().unwrap().as_slice(), ["http://example.com/a"]);
    }

    #[test]
    fn test_mock_client_error() {
        let mock = MockHttpClient::new(Err(GeocodeError::Lookup("down".to_string())));
        assert!(mock.get("http://example.com").is_err());
    }
}
