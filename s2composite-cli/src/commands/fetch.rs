//! Fetch command - build one RGB composite.

use std::path::PathBuf;

use chrono::NaiveDate;
use s2composite::config::{ConfigFile, ACCESS_TOKEN_ENV};
use s2composite::earthengine::{EarthEngineClient, ReqwestClient, SceneQuery};
use s2composite::pipeline::{fetch_composite, FetchRequest};
use s2composite::raster::StretchMode;
use tracing::warn;

use super::common::{resolve_project, resolve_stretch, resolve_work_dir};
use crate::error::CliError;

/// Arguments for the fetch command.
pub struct FetchArgs {
    pub lon: f64,
    pub lat: f64,
    pub size: f64,
    pub output: PathBuf,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub project: Option<String>,
    pub work_dir: Option<PathBuf>,
    /// `None` keeps the config value.
    pub drive_export: Option<bool>,
    /// `None` keeps the config value.
    pub keep_intermediates: Option<bool>,
    pub timeout: Option<u64>,
}

/// Run the fetch command.
pub fn run(args: FetchArgs) -> Result<(), CliError> {
    let config = ConfigFile::load()?;

    let project = resolve_project(args.project.clone(), &config)?;
    let stretch = resolve_stretch(args.vmin, args.vmax, &config)?;
    let request = build_request(&args, &config, stretch);
    let timeout_secs = args.timeout.unwrap_or(config.download.timeout);

    let token = config.access_token().unwrap_or_else(|| {
        warn!(
            "No access token configured; set {} or earthengine.access_token",
            ACCESS_TOKEN_ENV
        );
        String::new()
    });

    let http = ReqwestClient::with_timeout(timeout_secs)?.with_access_token(token);
    let client = EarthEngineClient::new(http, project)?
        .with_base_url(config.earthengine.base_url.as_str());

    println!("s2composite v{}", s2composite::VERSION);
    println!("================");
    println!();
    println!("Center:     {}, {}", request.lon, request.lat);
    println!("Box size:   {}°", request.size);
    println!("Dates:      {} to {}", request.query.start, request.query.end);
    println!("Collection: {}", request.query.collection);
    println!("Output:     {}", request.output.display());
    println!();

    let report = fetch_composite(&client, &request)?;

    println!("Scene:      {}", report.scene.id);
    if let Some(cloud) = report.scene.sort_value {
        println!("Cloud:      {:.2}%", cloud);
    }
    println!(
        "Stretch:    {:.1} to {:.1}",
        report.range.low, report.range.high
    );
    println!(
        "Wrote {} ({}×{})",
        report.output.display(),
        report.width,
        report.height
    );
    for task in &report.exports {
        println!("Drive export {}: {}", task.description, task.operation);
    }

    Ok(())
}

/// Combine CLI arguments and config into a pipeline request.
fn build_request(args: &FetchArgs, config: &ConfigFile, stretch: StretchMode) -> FetchRequest {
    let query = SceneQuery::new(args.start, args.end)
        .with_collection(config.earthengine.collection.clone());

    FetchRequest::new(args.lon, args.lat, args.size, args.output.clone())
        .with_query(query)
        .with_grid(config.output_grid())
        .with_stretch(stretch)
        .with_work_dir(resolve_work_dir(args.work_dir.clone(), config))
        .with_drive_export(args.drive_export.unwrap_or(config.earthengine.drive_export))
        .with_keep_intermediates(
            args.keep_intermediates.unwrap_or(config.download.keep_intermediates),
        )
}
