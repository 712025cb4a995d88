//! CLI error type.

use std::fmt;
use std::process;

use s2composite::config::ConfigError;
use s2composite::earthengine::EarthEngineError;
use s2composite::pipeline::PipelineError;

/// Errors surfaced to the user by a command.
#[derive(Debug)]
pub enum CliError {
    /// Missing or invalid settings.
    Config(String),
    /// Building the Earth Engine client failed.
    Client(EarthEngineError),
    /// The composite run failed.
    Pipeline(PipelineError),
}

impl CliError {
    /// Print the error and exit with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        process::exit(1);
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Client(e) => write!(f, "{}", e),
            CliError::Pipeline(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(_) => None,
            CliError::Client(e) => Some(e),
            CliError::Pipeline(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<EarthEngineError> for CliError {
    fn from(e: EarthEngineError) -> Self {
        CliError::Client(e)
    }
}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        CliError::Pipeline(e)
    }
}
