//! s2composite - Sentinel-2 RGB composites from Google Earth Engine
//!
//! This library picks the least-cloudy Sentinel-2 Surface Reflectance scene
//! over a small square region, downloads its red, green and blue bands as
//! GeoTIFFs and writes a contrast-stretched 8-bit RGB GeoTIFF that keeps the
//! source georeferencing.
//!
//! The [`pipeline::fetch_composite`] function runs the whole procedure; the
//! other modules expose each step on its own.

pub mod aoi;
pub mod band;
pub mod config;
pub mod download;
pub mod earthengine;
pub mod logging;
pub mod pipeline;
pub mod raster;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
