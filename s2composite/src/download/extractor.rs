//! Zip extraction for band archives.
//!
//! Earth Engine wraps each single-band GeoTIFF in a zip archive whose entry
//! name embeds the download id. The extractor pulls that raster out under a
//! fixed filename.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};
use zip::ZipArchive;

use super::error::{DownloadError, DownloadResult};

/// Extracts the raster entry of a band archive.
#[derive(Debug, Default)]
pub struct ZipExtractor;

impl ZipExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }

    fn open(&self, archive: &Path) -> DownloadResult<ZipArchive<BufReader<File>>> {
        let file = File::open(archive).map_err(|e| DownloadError::ReadFailed {
            path: archive.to_path_buf(),
            source: e,
        })?;

        ZipArchive::new(BufReader::new(file)).map_err(|e| DownloadError::InvalidArchive {
            path: archive.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Extract the raster entry of `archive` to `dest`.
    ///
    /// The entry is chosen as the first `.tif`/`.tiff` file, or the sole
    /// entry of a single-file archive. Returns the number of bytes written.
    pub fn extract_single(&self, archive: &Path, dest: &Path) -> DownloadResult<u64> {
        let mut zip = self.open(archive)?;

        let names: Vec<String> = zip.file_names().map(|s| s.to_string()).collect();
        let entry = select_entry(&names).ok_or_else(|| DownloadError::EmptyArchive {
            path: archive.to_path_buf(),
        })?;

        if names.len() > 1 {
            warn!(
                archive = %archive.display(),
                entries = names.len(),
                chosen = %entry,
                "Archive holds more than one entry"
            );
        }

        let mut reader = zip
            .by_name(&entry)
            .map_err(|e| DownloadError::ExtractionFailed {
                path: archive.to_path_buf(),
                reason: e.to_string(),
            })?;

        let file = File::create(dest).map_err(|e| DownloadError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);

        let bytes = io::copy(&mut reader, &mut writer).map_err(|e| {
            DownloadError::ExtractionFailed {
                path: archive.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        writer.flush().map_err(|e| DownloadError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

        debug!(entry = %entry, dest = %dest.display(), bytes, "Extracted raster");
        Ok(bytes)
    }
}

/// Pick the raster entry from archive entry names.
fn select_entry(names: &[String]) -> Option<String> {
    let is_tiff = |name: &str| {
        let lower = name.to_ascii_lowercase();
        lower.ends_with(".tif") || lower.ends_with(".tiff")
    };

    names
        .iter()
        .find(|name| is_tiff(name))
        .or_else(|| match names {
            [sole] if !sole.ends_with('/') => Some(sole),
            _ => None,
        })
        .cloned()
}
