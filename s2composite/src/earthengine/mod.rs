//! Google Earth Engine access
//!
//! This module talks to the Earth Engine REST API: it selects the
//! least-cloudy scene over a region, registers per-band GeoTIFF downloads
//! and submits Drive exports.
//!
//! ```ignore
//! use s2composite::earthengine::{EarthEngineClient, ReqwestClient, SceneQuery};
//!
//! let http = ReqwestClient::with_timeout(300)?.with_access_token(token);
//! let client = EarthEngineClient::new(http, "my-project")?;
//! let scene = client.find_scene(&SceneQuery::default(), &aoi)?;
//! ```

mod client;
pub mod expression;
mod http;
mod types;

pub use client::EarthEngineClient;
pub use http::{HttpClient, ReqwestClient};
pub use types::{
    EarthEngineError, ExportTask, OutputGrid, SceneInfo, SceneQuery, DEFAULT_BASE_URL,
    DEFAULT_COLLECTION, DEFAULT_CRS, DEFAULT_SCALE, DEFAULT_SORT_PROPERTY,
};

#[cfg(test)]
pub use http::tests::{MockHttpClient, MockRequest};
