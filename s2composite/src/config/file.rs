//! INI configuration file.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use super::keys::ConfigKey;
use crate::earthengine::{
    OutputGrid, DEFAULT_BASE_URL, DEFAULT_COLLECTION, DEFAULT_CRS, DEFAULT_SCALE,
};
use crate::raster::{StretchMode, DEFAULT_HIGH_PERCENTILE, DEFAULT_LOW_PERCENTILE};

/// Directory under the home directory holding the configuration.
pub const CONFIG_DIR_NAME: &str = ".s2composite";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Environment variable overriding `earthengine.access_token`.
pub const ACCESS_TOKEN_ENV: &str = "S2COMPOSITE_ACCESS_TOKEN";

/// Default HTTP timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Errors raised while reading, writing or editing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// `~/.s2composite`, or `./.s2composite` when no home directory is known.
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// `~/.s2composite/config.ini`.
pub fn config_file_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// `[earthengine]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct EarthEngineSettings {
    pub project: Option<String>,
    pub access_token: Option<String>,
    pub base_url: String,
    pub collection: String,
    pub drive_export: bool,
}

impl Default for EarthEngineSettings {
    fn default() -> Self {
        Self {
            project: None,
            access_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            drive_export: true,
        }
    }
}

/// `[composite]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeSettings {
    pub crs: String,
    /// Pixel size in meters.
    pub scale: f64,
    pub low_percentile: f64,
    pub high_percentile: f64,
}

impl Default for CompositeSettings {
    fn default() -> Self {
        Self {
            crs: DEFAULT_CRS.to_string(),
            scale: DEFAULT_SCALE,
            low_percentile: DEFAULT_LOW_PERCENTILE,
            high_percentile: DEFAULT_HIGH_PERCENTILE,
        }
    }
}

/// `[download]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSettings {
    /// HTTP timeout in seconds, 0 for none.
    pub timeout: u64,
    /// Where intermediates go; the current directory when unset.
    pub work_dir: Option<PathBuf>,
    pub keep_intermediates: bool,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
            work_dir: None,
            keep_intermediates: false,
        }
    }
}

/// Parsed `config.ini`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub earthengine: EarthEngineSettings,
    pub composite: CompositeSettings,
    pub download: DownloadSettings,
}

impl ConfigFile {
    /// Load from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_file_path();
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(source) => ConfigError::Io {
                path: path.to_path_buf(),
                source,
            },
            ini::Error::Parse(err) => ConfigError::Parse {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
        })?;

        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }

        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Save to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to an explicit path, creating parent directories if needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        self.to_ini()
            .write_to_file(path)
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini
    }

    /// Access token from the environment, falling back to the file.
    pub fn access_token(&self) -> Option<String> {
        self.access_token_with(std::env::var(ACCESS_TOKEN_ENV).ok())
    }

    fn access_token_with(&self, env: Option<String>) -> Option<String> {
        env.filter(|token| !token.trim().is_empty())
            .or_else(|| self.earthengine.access_token.clone())
    }

    /// Download grid from `[composite]`.
    pub fn output_grid(&self) -> OutputGrid {
        OutputGrid {
            crs: self.composite.crs.clone(),
            scale: self.composite.scale,
        }
    }

    /// Percentile stretch from `[composite]`.
    pub fn stretch_mode(&self) -> StretchMode {
        StretchMode::Percentile {
            low: self.composite.low_percentile,
            high: self.composite.high_percentile,
        }
    }
}
