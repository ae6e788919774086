//! Shared command bootstrap: config loading, logging, geocoder selection.

use std::sync::Arc;

use compass::config::ConfigFile;
use compass::location::{NoGeocoder, NominatimGeocoder, ReverseGeocoder};
use compass::logging::{init_logging, LoggingGuard};
use tracing::{info, warn};

use crate::error::CliError;

/// Loaded configuration plus the logging guard for one command run.
pub struct CliRunner {
    config: ConfigFile,
    logging: Option<LoggingGuard>,
}

impl CliRunner {
    /// Load the config file and start logging.
    ///
    /// `console` adds a stderr log layer; leave it off while a TUI owns the
    /// terminal. A log file that cannot be opened only disables file logging.
    pub fn new(console: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load()?;

        let logging = match init_logging(&config.logging, console) {
            Ok(guard) => Some(guard),
            Err(e) => {
                eprintln!("Warning: {}", CliError::from(e));
                None
            }
        };

        Ok(Self {
            config,
            logging,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn log_startup(&self, command: &str) {
        info!(
            version = compass::VERSION,
            command,
            log_file = ?self.logging.as_ref().map(|g| g.path().display().to_string()),
            "compass starting"
        );
    }

    /// Reverse geocoder selected by the `[geocoder]` settings.
    ///
    /// Falls back to no geocoding if the HTTP client cannot be built.
    pub fn geocoder(&self) -> Arc<dyn ReverseGeocoder> {
        let settings = &self.config.geocoder;
        if !settings.enabled {
            info!("Reverse geocoding disabled");
            return Arc::new(NoGeocoder);
        }

        match NominatimGeocoder::new(settings.url.clone(), self.config.geocoder_timeout()) {
            Ok(geocoder) => {
                info!(url = %settings.url, "Reverse geocoding via Nominatim");
                Arc::new(geocoder)
            }
            Err(e) => {
                warn!(error = %e, "Reverse geocoder unavailable, showing coordinates only");
                Arc::new(NoGeocoder)
            }
        }
    }
}
