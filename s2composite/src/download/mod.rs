//! Band archive download and extraction.
//!
//! This module handles:
//! - Streaming a band archive from its signed URL to disk
//! - Extracting the single raster entry under a fixed per-band name

mod error;
mod extractor;
mod http;

pub use error::{DownloadError, DownloadResult};
pub use extractor::ZipExtractor;
pub use http::download_to_file;
