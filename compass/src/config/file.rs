//! Typed settings and INI persistence.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use tracing::debug;

use super::error::ConfigError;
use super::keys::ConfigKey;
use crate::device::{
    PositionRequest, SensorRate, DEFAULT_MIN_DISTANCE_M, DEFAULT_MIN_INTERVAL_MS,
};
use crate::lifecycle::CoordinatorConfig;
use crate::location::DEFAULT_NOMINATIM_URL;

/// Directory holding the config file and default log file.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".compass")
}

/// Path of the config file.
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// Default log file location.
pub fn default_log_file() -> PathBuf {
    config_directory().join("compass.log")
}

/// `[location]`
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSettings {
    pub min_interval_ms: u64,
    pub min_distance_m: f32,
    /// Provider name reported with fixes.
    pub provider: String,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            min_distance_m: DEFAULT_MIN_DISTANCE_M,
            provider: "gps".to_string(),
        }
    }
}

/// `[sensor]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorSettings {
    pub rate: SensorRate,
}

/// `[geocoder]`
#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderSettings {
    pub enabled: bool,
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_NOMINATIM_URL.to_string(),
            timeout_secs: 5,
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub file: PathBuf,
    pub debug: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            debug: false,
        }
    }
}

/// All user settings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub location: LocationSettings,
    pub sensor: SensorSettings,
    pub geocoder: GeocoderSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from [`config_file_path`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`. A missing file yields the defaults; keys absent
    /// from the file keep their default values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(config);
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|section| section.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }

        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Save to [`config_file_path`].
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Write every setting to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }

        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini.write_to_file(path).map_err(write_error)
    }

    /// Filter applied to position updates.
    pub fn position_request(&self) -> PositionRequest {
        PositionRequest {
            min_interval: Duration::from_millis(self.location.min_interval_ms),
            min_distance_m: self.location.min_distance_m,
        }
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            position_request: self.position_request(),
            sensor_rate: self.sensor.rate,
        }
    }

    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_secs(self.geocoder.timeout_secs)
    }
}
