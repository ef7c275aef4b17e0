//! Configuration types deserialized from `stencil.toml`.

use std::path::PathBuf;

use serde::Deserialize;

/// Engine configuration parsed from `stencil.toml`.
///
/// Every field is optional in the file; absent fields take the documented
/// default. All relative paths are resolved against the process working
/// directory by the engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Root directory of the template store.
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,

    /// Root directory of the persistent artifact cache.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Directory holding the invalidation ledger file (`map.json`).
    ///
    /// Must not be the same directory as `cache_dir`: the ledger has to
    /// survive the wholesale drop of the cache tier.
    #[serde(default = "default_cache_map_dir")]
    pub cache_map_dir: PathBuf,

    /// File extension of template sources, without the leading dot.
    #[serde(default = "default_templates_extension")]
    pub templates_extension: String,
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_cache_map_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_templates_extension() -> String {
    "hbs".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            cache_dir: default_cache_dir(),
            cache_map_dir: default_cache_map_dir(),
            templates_extension: default_templates_extension(),
        }
    }
}
