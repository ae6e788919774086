//! User configuration stored in `~/.compass/config.ini`.
//!
//! The file is optional. Every setting has a default, and a missing file
//! loads as [`ConfigFile::default`]. Settings are addressed as
//! `section.key` through [`ConfigKey`], which the CLI's `config` command
//! uses for get/set/list.
//!
//! ```text
//! [location]
//! min_interval_ms = 10000
//! min_distance_m = 10
//! provider = gps
//!
//! [sensor]
//! rate = normal
//!
//! [geocoder]
//! enabled = true
//! url = https://nominatim.openstreetmap.org/reverse
//! timeout_secs = 5
//!
//! [logging]
//! file = ~/.compass/compass.log
//! debug = false
//! ```

mod error;
mod file;
mod keys;

pub use error::ConfigError;
pub use file::{
    config_directory, config_file_path, default_log_file, ConfigFile, GeocoderSettings,
    LocationSettings, LoggingSettings, SensorSettings,
};
pub use keys::ConfigKey;
