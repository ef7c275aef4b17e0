//! Error types for cache and ledger operations.

use std::path::PathBuf;

use stencil_compiler::CompileError;
use stencil_store::StoreError;

/// Errors that can occur while resolving a renderer through the cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An I/O error occurred while reading or writing artifact files.
    #[error("cache I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An artifact header could not be encoded.
    #[error("artifact serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// The template source could not be resolved.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The compiler rejected the template source.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Compilation succeeded but produced no loadable renderer.
    #[error("no usable renderer for template '{name}' after compilation")]
    RendererUnavailable {
        /// The template being resolved.
        name: String,
    },
}

/// Errors that can occur during the invalidation ledger check.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The ledger file path sits inside the persistent cache directory.
    ///
    /// The ledger must survive the wholesale drop of the cache tier, so this
    /// configuration is rejected before any filesystem mutation.
    #[error("ledger file {ledger_path} must not be inside cache directory {cache_dir}")]
    LedgerInsideCacheDir {
        /// The configured ledger file path.
        ledger_path: PathBuf,
        /// The configured cache directory.
        cache_dir: PathBuf,
    },

    /// An I/O error occurred while persisting the ledger or dropping the cache.
    #[error("ledger I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The fresh modification map could not be serialized.
    #[error("ledger serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// Template discovery failed while building the fresh modification map.
    #[error(transparent)]
    Store(#[from] StoreError),
}
