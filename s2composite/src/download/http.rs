//! Streamed archive download.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use super::error::{DownloadError, DownloadResult};
use crate::earthengine::HttpClient;

/// Buffer size for writing downloads to disk (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Stream `url` into `dest`, replacing any existing file.
///
/// Returns the number of bytes written.
pub fn download_to_file<C: HttpClient + ?Sized>(
    http: &C,
    url: &str,
    dest: &Path,
) -> DownloadResult<u64> {
    let file = File::create(dest).map_err(|e| DownloadError::WriteFailed {
        path: dest.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::with_capacity(BUFFER_SIZE, file);

    let bytes = http
        .download(url, &mut writer)
        .map_err(|e| DownloadError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    writer.flush().map_err(|e| DownloadError::WriteFailed {
        path: dest.to_path_buf(),
        source: e,
    })?;

    debug!(url, path = %dest.display(), bytes, "Download complete");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::earthengine::{EarthEngineError, MockHttpClient};
    use tempfile::TempDir;

    #[test]
    fn test_download_writes_file() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("B4.zip");
        let mock = MockHttpClient::new().with_response("getPixels", vec![9u8; 1000]);

        let bytes = download_to_file(&mock, "https://ee/v1/x:getPixels", &dest).unwrap();
        assert_eq!(bytes, 1000);
        assert_eq!(std::fs::read(&dest).unwrap(), vec![9u8; 1000]);
    }

    #[test]
    fn test_download_replaces_existing_file() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("B4.zip");
        std::fs::write(&dest, vec![0u8; 5000]).unwrap();
        let mock = MockHttpClient::new().with_response("getPixels", vec![1u8, 2, 3]);

        download_to_file(&mock, "https://ee/v1/x:getPixels", &dest).unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), vec![1u8, 2, 3]);
    }

    #[test]
    fn test_download_http_error() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("B4.zip");
        let mock = MockHttpClient::new().with_error(
            "getPixels",
            EarthEngineError::Http("connection reset".to_string()),
        );

        let result = download_to_file(&mock, "https://ee/v1/x:getPixels", &dest);
        match result {
            Err(DownloadError::DownloadFailed { url, reason }) => {
                assert_eq!(url, "https://ee/v1/x:getPixels");
                assert!(reason.contains("connection reset"));
            }
            other => panic!("Expected DownloadFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_download_missing_directory() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("missing").join("B4.zip");
        let mock = MockHttpClient::new().with_response("getPixels", vec![1u8]);

        let result = download_to_file(&mock, "https://ee/v1/x:getPixels", &dest);
        assert!(matches!(result, Err(DownloadError::WriteFailed { .. })));
    }
}
