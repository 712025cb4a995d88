//! Raster handling for the composite.
//!
//! Bands are read from single-sample GeoTIFFs into [`BandRaster`]s, stretched
//! together with a [`StretchMode`] and written as an 8-bit RGB GeoTIFF that
//! carries the blue band's [`GeoProfile`].
//!
//! # Example
//!
//! ```ignore
//! use s2composite::raster::{BandRaster, RgbComposite, StretchMode};
//!
//! let blue = BandRaster::open(Path::new("B2.tif"))?;
//! let green = BandRaster::open(Path::new("B3.tif"))?;
//! let red = BandRaster::open(Path::new("B4.tif"))?;
//!
//! let composite = RgbComposite::build(&blue, &green, &red, &StretchMode::default())?;
//! composite.write(Path::new("output.tif"))?;
//! ```

mod composite;
mod error;
mod profile;
mod reader;
mod stretch;

pub use composite::RgbComposite;
pub use error::RasterError;
pub use profile::GeoProfile;
pub use reader::BandRaster;
pub use stretch::{
    percentile_of_sorted, StretchMode, StretchRange, DEFAULT_HIGH_PERCENTILE,
    DEFAULT_LOW_PERCENTILE,
};
