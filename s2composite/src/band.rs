//! Sentinel-2 visible bands used by the RGB composite.

use std::fmt;
use std::path::{Path, PathBuf};

/// A visible Sentinel-2 band.
///
/// See <https://developers.google.com/earth-engine/datasets/catalog/COPERNICUS_S2_SR#bands>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// Blue, 490 nm.
    B2,
    /// Green, 560 nm.
    B3,
    /// Red, 665 nm.
    B4,
}

impl Band {
    /// Download order: red, green, blue.
    pub const ACQUISITION_ORDER: [Band; 3] = [Band::B4, Band::B3, Band::B2];

    /// Order the rasters are opened and stacked in: blue, green, red.
    pub const STACK_ORDER: [Band; 3] = [Band::B2, Band::B3, Band::B4];

    /// Band name as used by Earth Engine.
    pub fn name(&self) -> &'static str {
        match self {
            Band::B2 => "B2",
            Band::B3 => "B3",
            Band::B4 => "B4",
        }
    }

    /// Intermediate archive path inside `dir`.
    pub fn archive_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.zip", self.name()))
    }

    /// Intermediate single-band raster path inside `dir`.
    pub fn raster_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.tif", self.name()))
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
