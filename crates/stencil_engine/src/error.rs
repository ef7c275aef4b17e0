//! The unified error type of the render pipeline.

use std::path::PathBuf;

use stencil_cache::{CacheError, LedgerError};
use stencil_common::NameError;
use stencil_compiler::CompileError;
use stencil_store::StoreError;

/// Errors surfaced by [`Engine`](crate::Engine) entry points.
///
/// Each variant wraps the typed failure of the subsystem it came from;
/// nothing is silently swallowed except the documented no-op statuses of the
/// partial registry.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A template or folder name failed validation.
    #[error(transparent)]
    Name(#[from] NameError),

    /// A template source or folder could not be resolved.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The compiler rejected a template source.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The cache failed to resolve a renderer.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// The invalidation check failed or was misconfigured.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A configured directory could not be created at startup.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An export payload could not be serialized.
    #[error("export serialization error: {reason}")]
    Export {
        /// Description of the serialization failure.
        reason: String,
    },
}
