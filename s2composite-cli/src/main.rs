//! s2composite CLI - Sentinel-2 RGB composites from the command line.

mod commands;
mod error;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use commands::common::{parse_date, resolve_flag};
use commands::config::ConfigCommands;
use commands::fetch::FetchArgs;

#[derive(Debug, Parser)]
#[command(name = "s2composite")]
#[command(version, about = "Least-cloudy Sentinel-2 RGB composites from Google Earth Engine")]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download the least-cloudy scene over a box and write an RGB GeoTIFF
    Fetch {
        /// Center longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Center latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Box edge length in degrees
        #[arg(long)]
        size: f64,

        /// Output GeoTIFF path
        #[arg(short, long)]
        output: PathBuf,

        /// First day of the date window (YYYY-MM-DD)
        #[arg(long, default_value = "2020-04-01", value_parser = parse_date)]
        start: NaiveDate,

        /// End of the date window (YYYY-MM-DD)
        #[arg(long, default_value = "2020-04-30", value_parser = parse_date)]
        end: NaiveDate,

        /// Fixed lower reflectance bound (requires --vmax)
        #[arg(long, requires = "vmax", allow_negative_numbers = true)]
        vmin: Option<f64>,

        /// Fixed upper reflectance bound (requires --vmin)
        #[arg(long, requires = "vmin", allow_negative_numbers = true)]
        vmax: Option<f64>,

        /// Earth Engine Cloud project (overrides config)
        #[arg(long)]
        project: Option<String>,

        /// Directory for per-band intermediates (overrides config)
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Submit the Drive export jobs (overrides config)
        #[arg(long, overrides_with = "no_drive_export")]
        drive_export: bool,

        /// Skip the Drive export jobs (overrides config)
        #[arg(long, overrides_with = "drive_export")]
        no_drive_export: bool,

        /// Leave per-band files on disk after success (overrides config)
        #[arg(long, overrides_with = "no_keep_intermediates")]
        keep_intermediates: bool,

        /// Delete per-band files after success (overrides config)
        #[arg(long, overrides_with = "keep_intermediates")]
        no_keep_intermediates: bool,

        /// HTTP timeout in seconds, 0 for none (overrides config)
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Create or refresh the configuration file
    Init,

    /// View or change configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = s2composite::logging::init_logging(cli.verbose) {
        eprintln!("{}", e);
    }

    let result = match cli.command {
        Commands::Fetch {
            lon,
            lat,
            size,
            output,
            start,
            end,
            vmin,
            vmax,
            project,
            work_dir,
            drive_export,
            no_drive_export,
            keep_intermediates,
            no_keep_intermediates,
            timeout,
        } => commands::fetch::run(FetchArgs {
            lon,
            lat,
            size,
            output,
            start,
            end,
            vmin,
            vmax,
            project,
            work_dir,
            drive_export: resolve_flag(drive_export, no_drive_export),
            keep_intermediates: resolve_flag(keep_intermediates, no_keep_intermediates),
            timeout,
        }),
        Commands::Init => commands::init::run(),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
