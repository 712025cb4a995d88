//! Addressable configuration keys (`section.key`).

use std::path::PathBuf;
use std::str::FromStr;

use super::file::{ConfigError, ConfigFile};

/// Every setting of `config.ini`, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    EarthEngineProject,
    EarthEngineAccessToken,
    EarthEngineBaseUrl,
    EarthEngineCollection,
    EarthEngineDriveExport,
    CompositeCrs,
    CompositeScale,
    CompositeLowPercentile,
    CompositeHighPercentile,
    DownloadTimeout,
    DownloadWorkDir,
    DownloadKeepIntermediates,
}

const ALL_KEYS: [ConfigKey; 12] = [
    ConfigKey::EarthEngineProject,
    ConfigKey::EarthEngineAccessToken,
    ConfigKey::EarthEngineBaseUrl,
    ConfigKey::EarthEngineCollection,
    ConfigKey::EarthEngineDriveExport,
    ConfigKey::CompositeCrs,
    ConfigKey::CompositeScale,
    ConfigKey::CompositeLowPercentile,
    ConfigKey::CompositeHighPercentile,
    ConfigKey::DownloadTimeout,
    ConfigKey::DownloadWorkDir,
    ConfigKey::DownloadKeepIntermediates,
];

impl ConfigKey {
    /// All keys, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    /// INI section.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::EarthEngineProject
            | ConfigKey::EarthEngineAccessToken
            | ConfigKey::EarthEngineBaseUrl
            | ConfigKey::EarthEngineCollection
            | ConfigKey::EarthEngineDriveExport => "earthengine",
            ConfigKey::CompositeCrs
            | ConfigKey::CompositeScale
            | ConfigKey::CompositeLowPercentile
            | ConfigKey::CompositeHighPercentile => "composite",
            ConfigKey::DownloadTimeout
            | ConfigKey::DownloadWorkDir
            | ConfigKey::DownloadKeepIntermediates => "download",
        }
    }

    /// Key within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::EarthEngineProject => "project",
            ConfigKey::EarthEngineAccessToken => "access_token",
            ConfigKey::EarthEngineBaseUrl => "base_url",
            ConfigKey::EarthEngineCollection => "collection",
            ConfigKey::EarthEngineDriveExport => "drive_export",
            ConfigKey::CompositeCrs => "crs",
            ConfigKey::CompositeScale => "scale",
            ConfigKey::CompositeLowPercentile => "low_percentile",
            ConfigKey::CompositeHighPercentile => "high_percentile",
            ConfigKey::DownloadTimeout => "timeout",
            ConfigKey::DownloadWorkDir => "work_dir",
            ConfigKey::DownloadKeepIntermediates => "keep_intermediates",
        }
    }

    /// Full dotted name, e.g. `earthengine.project`.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as text; unset values are empty.
    pub fn get(&self, config: &ConfigFile) -> String {
        let ee = &config.earthengine;
        let composite = &config.composite;
        let download = &config.download;

        match self {
            ConfigKey::EarthEngineProject => ee.project.clone().unwrap_or_default(),
            ConfigKey::EarthEngineAccessToken => ee.access_token.clone().unwrap_or_default(),
            ConfigKey::EarthEngineBaseUrl => ee.base_url.clone(),
            ConfigKey::EarthEngineCollection => ee.collection.clone(),
            ConfigKey::EarthEngineDriveExport => ee.drive_export.to_string(),
            ConfigKey::CompositeCrs => composite.crs.clone(),
            ConfigKey::CompositeScale => composite.scale.to_string(),
            ConfigKey::CompositeLowPercentile => composite.low_percentile.to_string(),
            ConfigKey::CompositeHighPercentile => composite.high_percentile.to_string(),
            ConfigKey::DownloadTimeout => download.timeout.to_string(),
            ConfigKey::DownloadWorkDir => download
                .work_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            ConfigKey::DownloadKeepIntermediates => download.keep_intermediates.to_string(),
        }
    }

    /// Parse and store `value`.
    ///
    /// An empty value clears optional settings; required settings reject it.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();

        match self {
            ConfigKey::EarthEngineProject => config.earthengine.project = optional(value),
            ConfigKey::EarthEngineAccessToken => {
                config.earthengine.access_token = optional(value)
            }
            ConfigKey::EarthEngineBaseUrl => {
                config.earthengine.base_url = self.required(value)?.to_string()
            }
            ConfigKey::EarthEngineCollection => {
                config.earthengine.collection = self.required(value)?.to_string()
            }
            ConfigKey::EarthEngineDriveExport => {
                config.earthengine.drive_export = self.parse_bool(value)?
            }
            ConfigKey::CompositeCrs => config.composite.crs = self.required(value)?.to_string(),
            ConfigKey::CompositeScale => {
                let scale = self.parse_f64(value)?;
                if scale <= 0.0 {
                    return Err(self.invalid(value, "must be greater than zero"));
                }
                config.composite.scale = scale;
            }
            ConfigKey::CompositeLowPercentile => {
                config.composite.low_percentile = self.parse_percentile(value)?
            }
            ConfigKey::CompositeHighPercentile => {
                config.composite.high_percentile = self.parse_percentile(value)?
            }
            ConfigKey::DownloadTimeout => {
                config.download.timeout = value
                    .parse()
                    .map_err(|_| self.invalid(value, "expected seconds as a whole number"))?
            }
            ConfigKey::DownloadWorkDir => {
                config.download.work_dir = optional(value).map(PathBuf::from)
            }
            ConfigKey::DownloadKeepIntermediates => {
                config.download.keep_intermediates = self.parse_bool(value)?
            }
        }
        Ok(())
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    fn required<'v>(&self, value: &'v str) -> Result<&'v str, ConfigError> {
        if value.is_empty() {
            Err(self.invalid(value, "must not be empty"))
        } else {
            Ok(value)
        }
    }

    fn parse_bool(&self, value: &str) -> Result<bool, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(self.invalid(value, "expected true or false")),
        }
    }

    fn parse_f64(&self, value: &str) -> Result<f64, ConfigError> {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.invalid(value, "expected a number"))
    }

    fn parse_percentile(&self, value: &str) -> Result<f64, ConfigError> {
        let p = self.parse_f64(value)?;
        if !(0.0..=100.0).contains(&p) {
            return Err(self.invalid(value, "must be between 0 and 100"));
        }
        Ok(p)
    }
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_keys() {
        assert_eq!(
            "earthengine.project".parse::<ConfigKey>().unwrap(),
            ConfigKey::EarthEngineProject
        );
        assert_eq!(
            "Download.Keep_Intermediates".parse::<ConfigKey>().unwrap(),
            ConfigKey::DownloadKeepIntermediates
        );
    }

    #[test]
    fn test_parse_unknown_key() {
        let result = "earthengine.region".parse::<ConfigKey>();
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<String> = ConfigKey::all().iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ConfigKey::all().len());
    }

    #[test]
    fn test_set_and_get() {
        let mut config = ConfigFile::default();

        ConfigKey::EarthEngineProject
            .set(&mut config, "my-gcp-project")
            .unwrap();
        ConfigKey::EarthEngineDriveExport
            .set(&mut config, "no")
            .unwrap();
        ConfigKey::CompositeScale.set(&mut config, "10").unwrap();
        ConfigKey::DownloadTimeout.set(&mut config, "0").unwrap();

        assert_eq!(ConfigKey::EarthEngineProject.get(&config), "my-gcp-project");
        assert!(!config.earthengine.drive_export);
        assert_eq!(config.composite.scale, 10.0);
        assert_eq!(ConfigKey::DownloadTimeout.get(&config), "0");
    }

    #[test]
    fn test_empty_clears_optional() {
        let mut config = ConfigFile::default();
        ConfigKey::DownloadWorkDir.set(&mut config, "/data").unwrap();
        assert_eq!(config.download.work_dir, Some(PathBuf::from("/data")));

        ConfigKey::DownloadWorkDir.set(&mut config, "").unwrap();
        assert_eq!(config.download.work_dir, None);
        assert_eq!(ConfigKey::DownloadWorkDir.get(&config), "");
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::CompositeScale.set(&mut config, "-30").is_err());
        assert!(ConfigKey::CompositeScale.set(&mut config, "NaN").is_err());
        assert!(ConfigKey::CompositeLowPercentile
            .set(&mut config, "101")
            .is_err());
        assert!(ConfigKey::DownloadTimeout.set(&mut config, "soon").is_err());
        assert!(ConfigKey::EarthEngineDriveExport
            .set(&mut config, "maybe")
            .is_err());
        assert!(ConfigKey::EarthEngineCollection.set(&mut config, " ").is_err());
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_invalid_value_message() {
        let mut config = ConfigFile::default();
        let err = ConfigKey::DownloadTimeout
            .set(&mut config, "soon")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value 'soon' for download.timeout: expected seconds as a whole number"
        );
    }
}
