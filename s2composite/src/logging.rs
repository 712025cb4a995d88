//! Log output setup.
//!
//! The library only emits `tracing` events; binaries call [`init_logging`]
//! once to print them to stderr.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install a formatted stderr subscriber.
///
/// `RUST_LOG` takes precedence over `verbose`. Returns an error when a
/// global subscriber is already installed.
pub fn init_logging(verbose: bool) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {}", e))
}
