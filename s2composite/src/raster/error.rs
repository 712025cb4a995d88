//! Error types for raster operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading, stretching or writing rasters.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Failed to open or create a raster file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TIFF decoder or encoder rejected the data.
    #[error("TIFF error on {path}: {source}")]
    Tiff {
        path: PathBuf,
        #[source]
        source: tiff::TiffError,
    },

    /// The raster has more than one sample per pixel or an unknown sample type.
    #[error("Unsupported pixel layout in {path}: {reason}")]
    UnsupportedLayout { path: PathBuf, reason: String },

    /// Bands that are stacked together do not share a grid.
    #[error("Band {band} is {found_width}×{found_height}, expected {width}×{height}")]
    DimensionMismatch {
        band: String,
        width: u32,
        height: u32,
        found_width: u32,
        found_height: u32,
    },

    /// Pixel buffer does not fit the declared dimensions.
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// The stretch parameters are unusable.
    #[error("Invalid stretch: {0}")]
    InvalidStretch(String),

    /// No finite pixel was available to compute statistics.
    #[error("No finite pixels to compute statistics from")]
    NoValidPixels,
}

impl RasterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RasterError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn tiff(path: impl Into<PathBuf>, source: tiff::TiffError) -> Self {
        RasterError::Tiff {
            path: path.into(),
            source,
        }
    }
}
