//! Earth Engine REST client.
//!
//! # API Endpoints
//!
//! - `POST v1/projects/{project}/value:compute` evaluates an expression
//! - `POST v1/projects/{project}/thumbnails` registers a pixel download
//! - `GET  v1/{name}:getPixels` fetches the registered download
//! - `POST v1/projects/{project}/image:export` starts a batch export

use serde_json::{json, Value};
use tracing::{debug, info};

use super::expression::{self, Expression, ValueNode};
use super::http::HttpClient;
use super::types::{
    EarthEngineError, ExportTask, OutputGrid, SceneInfo, SceneQuery, DEFAULT_BASE_URL,
};
use crate::aoi::Aoi;
use crate::band::Band;

/// File format requested for per-band downloads.
const DOWNLOAD_FORMAT: &str = "ZIPPED_GEO_TIFF";

/// File format requested for Drive exports.
const EXPORT_FORMAT: &str = "GEO_TIFF";

/// Client for the subset of the Earth Engine REST API used by the pipeline.
///
/// # Example
///
/// ```no_run
/// use s2composite::earthengine::{EarthEngineClient, ReqwestClient};
///
/// let http = ReqwestClient::with_timeout(300).unwrap().with_access_token("ya29...");
/// let client = EarthEngineClient::new(http, "my-project").unwrap();
/// ```
pub struct EarthEngineClient<C: HttpClient> {
    http: C,
    project: String,
    base_url: String,
}

impl<C: HttpClient> EarthEngineClient<C> {
    /// Creates a client bound to a Cloud project.
    pub fn new(http: C, project: impl Into<String>) -> Result<Self, EarthEngineError> {
        let project = project.into();
        if project.trim().is_empty() {
            return Err(EarthEngineError::InvalidConfig(
                "an Earth Engine Cloud project is required".to_string(),
            ));
        }

        Ok(Self {
            http,
            project,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// The underlying HTTP client, shared with the archive downloader.
    pub fn http(&self) -> &C {
        &self.http
    }

    /// The Cloud project requests are billed to.
    pub fn project(&self) -> &str {
        &self.project
    }

    fn project_url(&self, method: &str) -> String {
        format!("{}/v1/projects/{}/{}", self.base_url, self.project, method)
    }

    fn post(&self, method: &str, body: &Value) -> Result<Value, EarthEngineError> {
        let url = self.project_url(method);
        let bytes = self.http.post_json(&url, body)?;

        serde_json::from_slice(&bytes).map_err(|e| EarthEngineError::MalformedResponse {
            endpoint: method.to_string(),
            reason: e.to_string(),
        })
    }

    /// Evaluates an expression and returns its JSON result.
    pub fn compute_value(&self, node: ValueNode) -> Result<Value, EarthEngineError> {
        let body = json!({ "expression": Expression::new(node).to_json() });
        let response = self.post("value:compute", &body)?;

        Ok(response.get("result").cloned().unwrap_or(Value::Null))
    }

    /// Finds the first scene of the sorted, filtered collection.
    ///
    /// Fails with [`EarthEngineError::NoScene`] when nothing matches.
    pub fn find_scene(&self, query: &SceneQuery, aoi: &Aoi) -> Result<SceneInfo, EarthEngineError> {
        query.validate()?;

        let collection = expression::sorted_collection(query, aoi);
        let matching = self
            .compute_value(expression::collection_size(collection.clone()))?
            .as_u64()
            .ok_or_else(|| malformed("value:compute", "collection size is not a count"))?;

        if matching == 0 {
            return Err(EarthEngineError::NoScene {
                collection: query.collection.clone(),
                start: query.start,
                end: query.end,
            });
        }

        let first = expression::first(collection);
        let id = self
            .compute_value(expression::property(first.clone(), "system:index"))?
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| malformed("value:compute", "scene has no system:index"))?;

        let sort_value = self
            .compute_value(expression::property(first, &query.sort_property))?
            .as_f64();

        info!(
            scene = %id,
            matching,
            sort_property = %query.sort_property,
            sort_value = ?sort_value,
            "Selected scene"
        );

        Ok(SceneInfo {
            matching,
            id,
            sort_value,
        })
    }

    /// Registers a single-band zipped GeoTIFF download and returns its URL.
    pub fn download_url(
        &self,
        image: &ValueNode,
        band: Band,
        grid: &OutputGrid,
        aoi: &Aoi,
    ) -> Result<String, EarthEngineError> {
        let node = expression::band(image.clone(), band.name(), grid, aoi);
        let body = json!({
            "expression": Expression::new(node).to_json(),
            "fileFormat": DOWNLOAD_FORMAT,
            "bandIds": [band.name()],
        });

        let response = self.post("thumbnails", &body)?;
        let name = response
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("thumbnails", "missing download name"))?;

        let url = format!("{}/v1/{}:getPixels", self.base_url, name);
        debug!(band = %band, url = %url, "Download URL ready");
        Ok(url)
    }

    /// Submits a Drive export of one band.
    ///
    /// The returned task is not polled.
    pub fn start_drive_export(
        &self,
        image: &ValueNode,
        band: Band,
        grid: &OutputGrid,
        aoi: &Aoi,
    ) -> Result<ExportTask, EarthEngineError> {
        let node = expression::band(image.clone(), band.name(), grid, aoi);
        let body = json!({
            "expression": Expression::new(node).to_json(),
            "description": band.name(),
            "fileExportOptions": {
                "fileFormat": EXPORT_FORMAT,
                "driveDestination": { "filenamePrefix": band.name() },
            },
            "grid": { "crsCode": grid.crs },
        });

        let response = self.post("image:export", &body)?;
        let operation = response
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("image:export", "missing operation name"))?
            .to_string();

        info!(band = %band, operation = %operation, "Drive export submitted");
        Ok(ExportTask {
            operation,
            description: band.name().to_string(),
        })
    }
}

fn malformed(endpoint: &str, reason: &str) -> EarthEngineError {
    EarthEngineError::MalformedResponse {
        endpoint: endpoint.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aoi;
    use crate::earthengine::MockHttpClient;

    fn test_aoi() -> Aoi {
        aoi::square(-122.4, 37.8, 0.1).unwrap()
    }

    #[test]
    fn test_requires_project() {
        let result = EarthEngineClient::new(MockHttpClient::new(), " ");
        assert!(matches!(result, Err(EarthEngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = EarthEngineClient::new(MockHttpClient::new(), "proj")
            .unwrap()
            .with_base_url("http://localhost:8080/");
        assert_eq!(
            client.project_url("thumbnails"),
            "http://localhost:8080/v1/projects/proj/thumbnails"
        );
    }

    #[test]
    fn test_compute_value_posts_expression() {
        let mock = MockHttpClient::new().with_json("value:compute", json!({"result": 7}));
        let client = EarthEngineClient::new(mock, "proj").unwrap();

        let value = client.compute_value(expression::constant(7)).unwrap();
        assert_eq!(value, json!(7));

        let requests = client.http().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(
            requests[0].url,
            "https://earthengine.googleapis.com/v1/projects/proj/value:compute"
        );
        assert_eq!(
            requests[0].body.as_ref().unwrap()["expression"]["result"],
            json!("0")
        );
    }

    #[test]
    fn test_compute_value_malformed_body() {
        let mock = MockHttpClient::new().with_response("value:compute", b"<html>".to_vec());
        let client = EarthEngineClient::new(mock, "proj").unwrap();

        let result = client.compute_value(expression::constant(1));
        assert!(matches!(
            result,
            Err(EarthEngineError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_find_scene_empty_collection() {
        let mock = MockHttpClient::new().with_json("value:compute", json!({"result": 0}));
        let client = EarthEngineClient::new(mock, "proj").unwrap();

        let result = client.find_scene(&SceneQuery::default(), &test_aoi());
        match result {
            Err(EarthEngineError::NoScene { collection, .. }) => {
                assert_eq!(collection, "COPERNICUS/S2_SR")
            }
            other => panic!("Expected NoScene, got {:?}", other),
        }
        // Only the size was computed
        assert_eq!(client.http().requests().len(), 1);
    }

    #[test]
    fn test_find_scene_selects_first() {
        let mock = MockHttpClient::new()
            .with_json_when("value:compute", "Collection.size", json!({"result": 3}))
            .with_json_when(
                "value:compute",
                "system:index",
                json!({"result": "20200415T183919_20200415T184435_T10SEG"}),
            )
            .with_json("value:compute", json!({"result": 0.42}));
        let client = EarthEngineClient::new(mock, "proj").unwrap();

        let scene = client.find_scene(&SceneQuery::default(), &test_aoi()).unwrap();
        assert_eq!(scene.matching, 3);
        assert_eq!(scene.id, "20200415T183919_20200415T184435_T10SEG");
        assert_eq!(scene.sort_value, Some(0.42));
        assert_eq!(client.http().requests().len(), 3);
    }

    #[test]
    fn test_find_scene_invalid_window_makes_no_request() {
        let day = chrono::NaiveDate::from_ymd_opt(2020, 4, 1).unwrap();
        let client = EarthEngineClient::new(MockHttpClient::new(), "proj").unwrap();

        let result = client.find_scene(&SceneQuery::new(day, day), &test_aoi());
        assert!(matches!(result, Err(EarthEngineError::InvalidConfig(_))));
        assert!(client.http().requests().is_empty());
    }

    #[test]
    fn test_find_scene_api_error_propagates() {
        let mock = MockHttpClient::new().with_error(
            "value:compute",
            EarthEngineError::Api {
                status: 401,
                message: "Request had invalid authentication credentials.".to_string(),
            },
        );
        let client = EarthEngineClient::new(mock, "proj").unwrap();

        let result = client.find_scene(&SceneQuery::default(), &test_aoi());
        assert!(matches!(
            result,
            Err(EarthEngineError::Api { status: 401, .. })
        ));
    }

    #[test]
    fn test_download_url_construction() {
        let mock = MockHttpClient::new().with_json(
            "thumbnails",
            json!({"name": "projects/proj/thumbnails/abc123"}),
        );
        let client = EarthEngineClient::new(mock, "proj").unwrap();

        let url = client
            .download_url(
                &expression::constant("img"),
                Band::B4,
                &OutputGrid::default(),
                &test_aoi(),
            )
            .unwrap();
        assert_eq!(
            url,
            "https://earthengine.googleapis.com/v1/projects/proj/thumbnails/abc123:getPixels"
        );

        let body = client.http().requests()[0].body.clone().unwrap();
        assert_eq!(body["fileFormat"], json!("ZIPPED_GEO_TIFF"));
        assert_eq!(body["bandIds"], json!(["B4"]));
    }

    #[test]
    fn test_download_url_missing_name() {
        let mock = MockHttpClient::new().with_json("thumbnails", json!({}));
        let client = EarthEngineClient::new(mock, "proj").unwrap();

        let result = client.download_url(
            &expression::constant("img"),
            Band::B2,
            &OutputGrid::default(),
            &test_aoi(),
        );
        assert!(matches!(
            result,
            Err(EarthEngineError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_start_drive_export() {
        let mock = MockHttpClient::new().with_json(
            "image:export",
            json!({"name": "projects/proj/operations/OP1", "done": false}),
        );
        let client = EarthEngineClient::new(mock, "proj").unwrap();

        let task = client
            .start_drive_export(
                &expression::constant("img"),
                Band::B3,
                &OutputGrid::default(),
                &test_aoi(),
            )
            .unwrap();
        assert_eq!(task.operation, "projects/proj/operations/OP1");
        assert_eq!(task.description, "B3");

        let body = client.http().requests()[0].body.clone().unwrap();
        assert_eq!(body["description"], json!("B3"));
        assert_eq!(body["fileExportOptions"]["fileFormat"], json!("GEO_TIFF"));
        assert_eq!(
            body["fileExportOptions"]["driveDestination"]["filenamePrefix"],
            json!("B3")
        );
        assert_eq!(body["grid"]["crsCode"], json!("EPSG:4326"));
    }
}
