//! Region of interest construction
//!
//! Builds the square polygon used both to filter the image collection and to
//! clip the downloaded bands.

mod types;

pub use types::{Aoi, CoordError, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Builds a square region of interest around a center point.
///
/// # Arguments
///
/// * `lon` - Central longitude in degrees (-180.0 to 180.0)
/// * `lat` - Central latitude in degrees (-90.0 to 90.0)
/// * `size` - Length of the box edge in degrees
///
/// # Returns
///
/// A closed five-vertex polygon, or an error if any input is out of range.
pub fn square(lon: f64, lat: f64, size: f64) -> Result<Aoi, CoordError> {
    if !lon.is_finite() || !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    if !lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !size.is_finite() || size <= 0.0 {
        return Err(CoordError::InvalidSize(size));
    }

    Ok(Aoi::from_parts(lon, lat, size))
}
