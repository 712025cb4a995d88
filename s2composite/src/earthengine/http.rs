//! HTTP client abstraction for testability

use std::io::Write;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use super::types::EarthEngineError;

/// Trait for HTTP client operations.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait HttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the whole body.
    fn get(&self, url: &str) -> Result<Vec<u8>, EarthEngineError>;

    /// POSTs a JSON body and returns the raw response body.
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Vec<u8>, EarthEngineError>;

    /// Streams the body of a GET request into `writer`.
    ///
    /// Returns the number of bytes written.
    fn download(&self, url: &str, writer: &mut dyn Write) -> Result<u64, EarthEngineError> {
        let body = self.get(url)?;
        writer
            .write_all(&body)
            .map_err(|e| EarthEngineError::Http(format!("Failed to write body: {}", e)))?;
        Ok(body.len() as u64)
    }
}

/// Real HTTP client implementation using reqwest.
///
/// Every request carries the OAuth2 bearer token when one is configured.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
    access_token: Option<String>,
}

impl ReqwestClient {
    /// Creates a new client with a request timeout and no credentials.
    ///
    /// A timeout of zero seconds disables the timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, EarthEngineError> {
        let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("s2composite/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                EarthEngineError::Http(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            access_token: None,
        })
    }

    /// Attach an OAuth2 access token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.access_token = if token.trim().is_empty() {
            None
        } else {
            Some(token)
        };
        self
    }

    fn authorize(
        &self,
        request: reqwest::blocking::RequestBuilder,
    ) -> reqwest::blocking::RequestBuilder {
        match &self.access_token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    fn send(
        &self,
        request: reqwest::blocking::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::blocking::Response, EarthEngineError> {
        let response = self
            .authorize(request)
            .send()
            .map_err(|e| EarthEngineError::Http(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().map(|b| b.to_vec()).unwrap_or_default();
            return Err(EarthEngineError::Api {
                status: status.as_u16(),
                message: api_error_message(&body).unwrap_or_else(|| format!("{} from {}", status, url)),
            });
        }

        Ok(response)
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, EarthEngineError> {
        let response = self.send(self.client.get(url), url)?;

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| EarthEngineError::Http(format!("Failed to read response: {}", e)))
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<Vec<u8>, EarthEngineError> {
        let payload = serde_json::to_vec(body)
            .map_err(|e| EarthEngineError::Http(format!("Failed to encode request: {}", e)))?;
        debug!(url, bytes = payload.len(), "POST");

        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        let response = self.send(request, url)?;

        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| EarthEngineError::Http(format!("Failed to read response: {}", e)))
    }

    fn download(&self, url: &str, writer: &mut dyn Write) -> Result<u64, EarthEngineError> {
        let mut response = self.send(self.client.get(url), url)?;

        response
            .copy_to(writer)
            .map_err(|e| EarthEngineError::Http(format!("Failed to stream response: {}", e)))
    }
}

/// Extracts `error.message` from a Google API error body.
fn api_error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}
