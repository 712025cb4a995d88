//! User configuration
//!
//! Settings live in `~/.s2composite/config.ini`:
//!
//! ```ini
//! [earthengine]
//! project = my-gcp-project
//! access_token =
//! base_url = https://earthengine.googleapis.com
//! collection = COPERNICUS/S2_SR
//! drive_export = true
//!
//! [composite]
//! crs = EPSG:4326
//! scale = 30
//! low_percentile = 2
//! high_percentile = 98
//!
//! [download]
//! timeout = 300
//! work_dir =
//! keep_intermediates = false
//! ```
//!
//! Command-line flags override the file, and `S2COMPOSITE_ACCESS_TOKEN`
//! overrides `access_token`.

mod file;
mod keys;

pub use file::{
    config_dir, config_file_path, CompositeSettings, ConfigError, ConfigFile,
    DownloadSettings, EarthEngineSettings, ACCESS_TOKEN_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME,
    DEFAULT_TIMEOUT_SECS,
};
pub use keys::ConfigKey;
