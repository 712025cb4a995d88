//! Error types for band downloads.

use std::io;
use std::path::PathBuf;

/// Result type for download operations.
pub type DownloadResult<T> = Result<T, DownloadError>;

/// Errors that can occur while fetching and unpacking a band archive.
#[derive(Debug)]
pub enum DownloadError {
    /// The HTTP transfer failed.
    DownloadFailed { url: String, reason: String },

    /// Failed to read a file.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file.
    WriteFailed { path: PathBuf, source: io::Error },

    /// The file is not a readable zip archive.
    InvalidArchive { path: PathBuf, reason: String },

    /// The archive holds no raster entry.
    EmptyArchive { path: PathBuf },

    /// Reading an entry out of the archive failed.
    ExtractionFailed { path: PathBuf, reason: String },
}

impl std::fmt::Display for DownloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DownloadFailed { url, reason } => {
                write!(f, "failed to download {}: {}", url, reason)
            }
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            Self::InvalidArchive { path, reason } => {
                write!(f, "invalid archive {}: {}", path.display(), reason)
            }
            Self::EmptyArchive { path } => {
                write!(f, "archive {} contains no raster", path.display())
            }
            Self::ExtractionFailed { path, reason } => {
                write!(f, "failed to extract {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for DownloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFailed { source, .. } => Some(source),
            Self::WriteFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
