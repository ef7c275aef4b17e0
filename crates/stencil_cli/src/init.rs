//! Implementation of the `stencil init` command.
//!
//! Scaffolds a project: a commented `stencil.toml`, the template store
//! directory, and a sample template. Refuses to overwrite an existing
//! configuration.

use std::path::Path;

use stencil_config::loader::CONFIG_FILE;

use crate::GlobalArgs;

const CONFIG_TEMPLATE: &str = "\
# Stencil engine configuration. Every field is optional.

# Root directory of the template store.
#templates_dir = \"templates\"

# Root directory of the persistent artifact cache.
#cache_dir = \"cache\"

# Directory holding the invalidation ledger (map.json).
# Must differ from cache_dir.
#cache_map_dir = \".\"

# Template source extension, without the leading dot.
#templates_extension = \"hbs\"
";

const SAMPLE_TEMPLATE: &str = "Hello {{name}}!\n";

/// Runs the `stencil init` command.
pub fn run(dir: Option<String>, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let target = dir.unwrap_or_else(|| ".".to_string());
    let target = Path::new(&target);

    let config_path = target.join(CONFIG_FILE);
    if config_path.exists() {
        return Err(format!("{} already exists", config_path.display()).into());
    }

    std::fs::create_dir_all(target)?;
    std::fs::write(&config_path, CONFIG_TEMPLATE)?;

    let templates_dir = target.join("templates");
    std::fs::create_dir_all(&templates_dir)?;
    std::fs::write(templates_dir.join("hello.hbs"), SAMPLE_TEMPLATE)?;

    if !global.quiet {
        eprintln!("   Created {}", config_path.display());
        eprintln!("   Created {}", templates_dir.join("hello.hbs").display());
    }

    Ok(0)
}
