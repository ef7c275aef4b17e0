//! Shared project resolution for CLI commands.
//!
//! Commands operate on a project directory: `--config <dir>` or the current
//! directory. A `stencil.toml` there is loaded and validated; when absent,
//! the built-in defaults apply. Relative paths in the configuration resolve
//! against the project directory, not the process working directory.

use std::path::{Path, PathBuf};

use stencil_config::{load_config, loader::CONFIG_FILE, EngineConfig};
use stencil_engine::Engine;

use crate::GlobalArgs;

/// Resolves the project directory from global flags.
pub fn project_dir(global: &GlobalArgs) -> PathBuf {
    global
        .config
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Loads the project's engine configuration.
///
/// A missing `stencil.toml` yields the defaults; a present but invalid one
/// is an error.
pub fn load_project_config(
    global: &GlobalArgs,
) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let dir = project_dir(global);
    let config = if dir.join(CONFIG_FILE).is_file() {
        load_config(&dir)?
    } else {
        if global.verbose {
            eprintln!("no {CONFIG_FILE} in {}, using defaults", dir.display());
        }
        EngineConfig::default()
    };
    Ok(anchor_paths(config, &dir))
}

/// Opens the engine for the resolved project configuration.
///
/// This runs the startup invalidation check.
pub fn open_engine(global: &GlobalArgs) -> Result<Engine, Box<dyn std::error::Error>> {
    let config = load_project_config(global)?;
    Ok(Engine::new(config)?)
}

/// Rebases relative configured paths onto the project directory.
fn anchor_paths(mut config: EngineConfig, base: &Path) -> EngineConfig {
    for path in [
        &mut config.templates_dir,
        &mut config.cache_dir,
        &mut config.cache_map_dir,
    ] {
        if path.is_relative() {
            *path = base.join(path.as_path());
        }
    }
    config
}
