//! Region of interest types.

use std::fmt;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;
/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Errors raised while building a region of interest.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Longitude outside [-180, 180] or not finite.
    InvalidLongitude(f64),
    /// Latitude outside [-90, 90] or not finite.
    InvalidLatitude(f64),
    /// Box edge size must be finite and strictly positive.
    InvalidSize(f64),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLongitude(lon) => write!(f, "Invalid longitude: {}", lon),
            CoordError::InvalidLatitude(lat) => write!(f, "Invalid latitude: {}", lat),
            CoordError::InvalidSize(size) => write!(f, "Invalid box size: {}", size),
        }
    }
}

impl std::error::Error for CoordError {}

/// A rectangular region of interest centered on a point.
///
/// The polygon ring is stored as `[lon, lat]` pairs, closed (the first vertex
/// is repeated at the end) and wound counter-clockwise starting from the
/// south-west corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Aoi {
    center_lon: f64,
    center_lat: f64,
    size: f64,
    ring: [[f64; 2]; 5],
}

impl Aoi {
    pub(super) fn from_parts(center_lon: f64, center_lat: f64, size: f64) -> Self {
        let half = size / 2.0;
        let (west, east) = (center_lon - half, center_lon + half);
        let (south, north) = (center_lat - half, center_lat + half);

        Self {
            center_lon,
            center_lat,
            size,
            ring: [
                [west, south],
                [east, south],
                [east, north],
                [west, north],
                [west, south],
            ],
        }
    }

    /// Center longitude in degrees.
    pub fn center_lon(&self) -> f64 {
        self.center_lon
    }

    /// Center latitude in degrees.
    pub fn center_lat(&self) -> f64 {
        self.center_lat
    }

    /// Edge size of the box in degrees.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// The closed polygon ring.
    pub fn ring(&self) -> &[[f64; 2]; 5] {
        &self.ring
    }

    /// Bounds as `(west, south, east, north)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.ring[0][0], self.ring[0][1], self.ring[2][0], self.ring[2][1])
    }

    /// Polygon coordinates in GeoJSON nesting (`[[[lon, lat], ...]]`).
    pub fn to_coordinates(&self) -> Vec<Vec<Vec<f64>>> {
        vec![self.ring.iter().map(|p| p.to_vec()).collect()]
    }
}

impl fmt::Display for Aoi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (west, south, east, north) = self.bounds();
        write!(
            f,
            "[{:.5}, {:.5}, {:.5}, {:.5}]",
            west, south, east, north
        )
    }
}
