//! Earth Engine request and response types.

use chrono::NaiveDate;
use thiserror::Error;

/// Default image collection: Sentinel-2 Level-2A surface reflectance.
pub const DEFAULT_COLLECTION: &str = "COPERNICUS/S2_SR";

/// Default property used to rank scenes (lowest first).
pub const DEFAULT_SORT_PROPERTY: &str = "CLOUDY_PIXEL_PERCENTAGE";

/// Default projection for downloads and exports.
pub const DEFAULT_CRS: &str = "EPSG:4326";

/// Default ground resolution in meters.
pub const DEFAULT_SCALE: f64 = 30.0;

/// Default Earth Engine REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://earthengine.googleapis.com";

/// Errors returned by the Earth Engine client.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EarthEngineError {
    /// Transport-level failure (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The API answered with a non-success status.
    #[error("Earth Engine API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// No scene in the collection matched the region and date window.
    #[error("No scene in {collection} intersects the region between {start} and {end}")]
    NoScene {
        collection: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Filter describing which scene to pick from the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneQuery {
    /// Image collection id.
    pub collection: String,
    /// Start of the date window (inclusive).
    pub start: NaiveDate,
    /// End of the date window (exclusive, as Earth Engine treats date ranges).
    pub end: NaiveDate,
    /// Scene property sorted ascending; the first scene wins.
    pub sort_property: String,
}

impl Default for SceneQuery {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            start: NaiveDate::from_ymd_opt(2020, 4, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2020, 4, 30).unwrap_or_default(),
            sort_property: DEFAULT_SORT_PROPERTY.to_string(),
        }
    }
}

impl SceneQuery {
    /// Create a query over the default collection for the given window.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            ..Default::default()
        }
    }

    /// Use a different image collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Rank scenes by a different property.
    pub fn with_sort_property(mut self, property: impl Into<String>) -> Self {
        self.sort_property = property.into();
        self
    }

    /// Check that the window is not empty.
    pub fn validate(&self) -> Result<(), EarthEngineError> {
        if self.end <= self.start {
            return Err(EarthEngineError::InvalidConfig(format!(
                "date window is empty: {} is not before {}",
                self.start, self.end
            )));
        }
        if self.collection.trim().is_empty() {
            return Err(EarthEngineError::InvalidConfig(
                "collection id is empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Projection and resolution applied to downloads and exports.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputGrid {
    /// CRS code, e.g. `EPSG:4326`.
    pub crs: String,
    /// Pixel size in meters.
    pub scale: f64,
}

impl Default for OutputGrid {
    fn default() -> Self {
        Self {
            crs: DEFAULT_CRS.to_string(),
            scale: DEFAULT_SCALE,
        }
    }
}

/// Identity of the scene chosen by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneInfo {
    /// Number of scenes that matched the filter.
    pub matching: u64,
    /// `system:index` of the selected scene.
    pub id: String,
    /// Value of the sort property on the selected scene, if numeric.
    pub sort_value: Option<f64>,
}

/// Handle of a submitted export operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTask {
    /// Long-running operation name returned by the API.
    pub operation: String,
    /// Task description (the band name).
    pub description: String,
}
