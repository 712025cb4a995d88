//! Settings resolution shared across CLI commands.

use std::path::PathBuf;

use chrono::NaiveDate;
use s2composite::config::ConfigFile;
use s2composite::raster::StretchMode;

use crate::error::CliError;

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", s, e))
}

/// Resolve the Cloud project: CLI, then config.
pub fn resolve_project(
    cli_project: Option<String>,
    config: &ConfigFile,
) -> Result<String, CliError> {
    cli_project
        .or_else(|| config.earthengine.project.clone())
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| {
            CliError::Config(
                "An Earth Engine Cloud project is required. \
                 Set project in config.ini or use --project"
                    .to_string(),
            )
        })
}

/// Resolve the stretch: `--vmin`/`--vmax` select fixed bounds, otherwise
/// the configured percentiles apply.
pub fn resolve_stretch(
    vmin: Option<f64>,
    vmax: Option<f64>,
    config: &ConfigFile,
) -> Result<StretchMode, CliError> {
    match (vmin, vmax) {
        (Some(vmin), Some(vmax)) => Ok(StretchMode::Fixed { vmin, vmax }),
        (None, None) => Ok(config.stretch_mode()),
        _ => Err(CliError::Config(
            "--vmin and --vmax must be given together".to_string(),
        )),
    }
}

/// Collapse a `--flag`/`--no-flag` pair into an override.
///
/// `None` means neither was given and the config value applies.
pub fn resolve_flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Resolve the working directory: CLI, then config, then the current directory.
pub fn resolve_work_dir(cli_dir: Option<PathBuf>, config: &ConfigFile) -> PathBuf {
    cli_dir
        .or_else(|| config.download.work_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."))
}
