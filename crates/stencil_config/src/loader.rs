//! Configuration file loading and validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::types::EngineConfig;

/// Name of the configuration file within a project directory.
pub const CONFIG_FILE: &str = "stencil.toml";

/// Loads and validates a `stencil.toml` configuration from a project directory.
///
/// Reads `<project_dir>/stencil.toml`, parses it, and validates field values.
pub fn load_config(project_dir: &Path) -> Result<EngineConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<EngineConfig, ConfigError> {
    let config: EngineConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configuration values are consistent.
///
/// The deeper check that the ledger file does not sit *inside* the cache
/// directory runs at engine startup against real paths; this catches the
/// directly-misconfigured cases before any directory is created.
fn validate_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.templates_extension.is_empty() {
        return Err(ConfigError::ValidationError(
            "templates_extension must not be empty".to_string(),
        ));
    }
    if config.templates_extension.contains('.') {
        return Err(ConfigError::ValidationError(
            "templates_extension must not contain a dot".to_string(),
        ));
    }
    if config.cache_map_dir == config.cache_dir {
        return Err(ConfigError::ValidationError(
            "cache_map_dir must differ from cache_dir".to_string(),
        ));
    }
    Ok(())
}
