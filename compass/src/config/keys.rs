//! `section.key` addressing for individual settings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::error::ConfigError;
use super::file::ConfigFile;
use crate::device::SensorRate;

/// A single configurable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    LocationMinIntervalMs,
    LocationMinDistanceM,
    LocationProvider,
    SensorRate,
    GeocoderEnabled,
    GeocoderUrl,
    GeocoderTimeoutSecs,
    LoggingFile,
    LoggingDebug,
}

const ALL_KEYS: [ConfigKey; 9] = [
    ConfigKey::LocationMinIntervalMs,
    ConfigKey::LocationMinDistanceM,
    ConfigKey::LocationProvider,
    ConfigKey::SensorRate,
    ConfigKey::GeocoderEnabled,
    ConfigKey::GeocoderUrl,
    ConfigKey::GeocoderTimeoutSecs,
    ConfigKey::LoggingFile,
    ConfigKey::LoggingDebug,
];

impl ConfigKey {
    /// Every key, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    /// Full `section.key` name.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::LocationMinIntervalMs => "location.min_interval_ms",
            ConfigKey::LocationMinDistanceM => "location.min_distance_m",
            ConfigKey::LocationProvider => "location.provider",
            ConfigKey::SensorRate => "sensor.rate",
            ConfigKey::GeocoderEnabled => "geocoder.enabled",
            ConfigKey::GeocoderUrl => "geocoder.url",
            ConfigKey::GeocoderTimeoutSecs => "geocoder.timeout_secs",
            ConfigKey::LoggingFile => "logging.file",
            ConfigKey::LoggingDebug => "logging.debug",
        }
    }

    /// INI section the key lives in.
    pub fn section(&self) -> &'static str {
        self.split().0
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        self.split().1
    }

    fn split(&self) -> (&'static str, &'static str) {
        let name = self.name();
        name.split_once('.').unwrap_or(("", name))
    }

    /// Current value rendered as it is written to the file.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::LocationMinIntervalMs => config.location.min_interval_ms.to_string(),
            ConfigKey::LocationMinDistanceM => config.location.min_distance_m.to_string(),
            ConfigKey::LocationProvider => config.location.provider.clone(),
            ConfigKey::SensorRate => config.sensor.rate.to_string(),
            ConfigKey::GeocoderEnabled => config.geocoder.enabled.to_string(),
            ConfigKey::GeocoderUrl => config.geocoder.url.clone(),
            ConfigKey::GeocoderTimeoutSecs => config.geocoder.timeout_secs.to_string(),
            ConfigKey::LoggingFile => config.logging.file.display().to_string(),
            ConfigKey::LoggingDebug => config.logging.debug.to_string(),
        }
    }

    /// Parse and store `value`. The config is unchanged on error.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: self.name().to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match self {
            ConfigKey::LocationMinIntervalMs => {
                config.location.min_interval_ms = value
                    .parse()
                    .map_err(|_| invalid("expected milliseconds as a whole number"))?;
            }
            ConfigKey::LocationMinDistanceM => {
                let metres: f32 = value
                    .parse()
                    .map_err(|_| invalid("expected a distance in metres"))?;
                if !metres.is_finite() || metres < 0.0 {
                    return Err(invalid("distance must be zero or positive"));
                }
                config.location.min_distance_m = metres;
            }
            ConfigKey::LocationProvider => {
                if value.is_empty() {
                    return Err(invalid("provider name cannot be empty"));
                }
                config.location.provider = value.to_string();
            }
            ConfigKey::SensorRate => {
                config.sensor.rate = SensorRate::from_str(value).map_err(|e| invalid(e.as_str()))?;
            }
            ConfigKey::GeocoderEnabled => {
                config.geocoder.enabled =
                    parse_bool(value).ok_or_else(|| invalid("expected true or false"))?;
            }
            ConfigKey::GeocoderUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(invalid("expected an http:// or https:// URL"));
                }
                config.geocoder.url = value.to_string();
            }
            ConfigKey::GeocoderTimeoutSecs => {
                let secs: u64 = value
                    .parse()
                    .map_err(|_| invalid("expected seconds as a whole number"))?;
                if secs == 0 {
                    return Err(invalid("timeout must be at least 1 second"));
                }
                config.geocoder.timeout_secs = secs;
            }
            ConfigKey::LoggingFile => {
                if value.is_empty() {
                    return Err(invalid("log file path cannot be empty"));
                }
                config.logging.file = expand_tilde(value);
            }
            ConfigKey::LoggingDebug => {
                config.logging.debug =
                    parse_bool(value).ok_or_else(|| invalid("expected true or false"))?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn expand_tilde(value: &str) -> PathBuf {
    match (value.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_names() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
        assert_eq!(
            "Sensor.Rate".parse::<ConfigKey>().unwrap(),
            ConfigKey::SensorRate
        );
        assert!(matches!(
            "sensor.speed".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_section_and_key_name() {
        assert_eq!(ConfigKey::GeocoderTimeoutSecs.section(), "geocoder");
        assert_eq!(ConfigKey::GeocoderTimeoutSecs.key_name(), "timeout_secs");
    }

    #[test]
    fn test_all_keys_grouped_by_section() {
        let sections: Vec<&str> = ConfigKey::all().iter().map(|k| k.section()).collect();
        let mut deduped = sections.clone();
        deduped.dedup();
        assert_eq!(deduped, vec!["location", "sensor", "geocoder", "logging"]);
    }

    #[test]
    fn test_set_and_get() {
        let mut config = ConfigFile::default();

        ConfigKey::SensorRate.set(&mut config, "FASTEST").unwrap();
        assert_eq!(ConfigKey::SensorRate.get(&config), "fastest");

        ConfigKey::GeocoderEnabled.set(&mut config, "no").unwrap();
        assert!(!config.geocoder.enabled);

        ConfigKey::LocationMinDistanceM.set(&mut config, "2.5").unwrap();
        assert_eq!(ConfigKey::LocationMinDistanceM.get(&config), "2.5");
    }

    #[test]
    fn test_invalid_values_leave_config_unchanged() {
        let mut config = ConfigFile::default();
        let before = config.clone();

        assert!(ConfigKey::LocationMinDistanceM.set(&mut config, "-1").is_err());
        assert!(ConfigKey::GeocoderTimeoutSecs.set(&mut config, "0").is_err());
        assert!(ConfigKey::GeocoderUrl.set(&mut config, "ftp://x").is_err());
        assert!(ConfigKey::SensorRate.set(&mut config, "warp").is_err());
        assert!(ConfigKey::LoggingDebug.set(&mut config, "maybe").is_err());

        assert_eq!(config, before);
    }

    #[test]
    fn test_log_file_tilde_expansion() {
        let mut config = ConfigFile::default();
        ConfigKey::LoggingFile
            .set(&mut config, "~/logs/compass.log")
            .unwrap();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.logging.file, home.join("logs/compass.log"));
        }
    }
}
