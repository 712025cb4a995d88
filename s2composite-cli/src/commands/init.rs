//! Init command - write the configuration file.

use s2composite::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Run the init command.
///
/// Existing settings are kept; missing keys are filled with defaults.
pub fn run() -> Result<(), CliError> {
    let path = config_file_path();
    let existed = path.exists();

    let config = ConfigFile::load()?;
    config.save()?;

    if existed {
        println!("Updated configuration file: {}", path.display());
    } else {
        println!("Created configuration file: {}", path.display());
    }
    println!();
    if config.earthengine.project.is_none() {
        println!("Set your Earth Engine Cloud project before fetching:");
        println!("  s2composite config set earthengine.project <project-id>");
        println!();
    }
    println!("CLI arguments override config file values when specified.");
    Ok(())
}
