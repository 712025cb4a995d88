//! Pipeline request, report and error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::aoi::CoordError;
use crate::download::DownloadError;
use crate::earthengine::{EarthEngineError, ExportTask, OutputGrid, SceneInfo, SceneQuery};
use crate::raster::{RasterError, StretchMode, StretchRange};

/// Errors that can stop a composite run.
///
/// Intermediate files are left on disk for every variant.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid region: {0}")]
    Region(#[from] CoordError),

    #[error("Earth Engine error: {0}")]
    EarthEngine(#[from] EarthEngineError),

    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    #[error("Raster error: {0}")]
    Raster(#[from] RasterError),

    /// The working directory could not be created.
    #[error("Failed to prepare working directory {path}: {source}")]
    WorkDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An intermediate file could not be removed after the composite was written.
    #[error("Failed to remove {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything needed for one composite run.
///
/// # Example
///
/// ```
/// use s2composite::pipeline::FetchRequest;
///
/// let request = FetchRequest::new(-122.4, 37.8, 0.1, "sf.tif")
///     .with_work_dir("/tmp/s2")
///     .with_drive_export(false);
/// assert!(!request.drive_export);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    /// Center longitude in degrees.
    pub lon: f64,
    /// Center latitude in degrees.
    pub lat: f64,
    /// Box edge length in degrees.
    pub size: f64,
    /// Destination of the composite.
    pub output: PathBuf,
    /// Collection, date window and sort order.
    pub query: SceneQuery,
    /// Projection and resolution of the downloads.
    pub grid: OutputGrid,
    /// Contrast stretch.
    pub stretch: StretchMode,
    /// Directory holding the per-band intermediates.
    pub work_dir: PathBuf,
    /// Also submit a Drive export for every band.
    pub drive_export: bool,
    /// Leave the intermediates on disk after a successful run.
    pub keep_intermediates: bool,
}

impl FetchRequest {
    /// Request with default query, grid and stretch, working in the current
    /// directory, with Drive exports enabled.
    pub fn new(lon: f64, lat: f64, size: f64, output: impl Into<PathBuf>) -> Self {
        Self {
            lon,
            lat,
            size,
            output: output.into(),
            query: SceneQuery::default(),
            grid: OutputGrid::default(),
            stretch: StretchMode::default(),
            work_dir: PathBuf::from("."),
            drive_export: true,
            keep_intermediates: false,
        }
    }

    pub fn with_query(mut self, query: SceneQuery) -> Self {
        self.query = query;
        self
    }

    pub fn with_grid(mut self, grid: OutputGrid) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_stretch(mut self, stretch: StretchMode) -> Self {
        self.stretch = stretch;
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn with_drive_export(mut self, enabled: bool) -> Self {
        self.drive_export = enabled;
        self
    }

    pub fn with_keep_intermediates(mut self, keep: bool) -> Self {
        self.keep_intermediates = keep;
        self
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    /// Scene the composite was built from.
    pub scene: SceneInfo,
    /// Path of the written composite.
    pub output: PathBuf,
    /// Composite width in pixels.
    pub width: u32,
    /// Composite height in pixels.
    pub height: u32,
    /// Clip range the bands were stretched with.
    pub range: StretchRange,
    /// Drive exports submitted, in acquisition order.
    pub exports: Vec<ExportTask>,
    /// Intermediate files deleted after the write.
    pub removed: Vec<PathBuf>,
}
