//! Composite pipeline
//!
//! Ties the modules together into one linear run: region → scene search →
//! per-band download → stretch and write → cleanup. Nothing is retried and
//! nothing runs concurrently.

mod fetch;
mod types;

pub use fetch::fetch_composite;
pub use types::{FetchReport, FetchRequest, PipelineError};
