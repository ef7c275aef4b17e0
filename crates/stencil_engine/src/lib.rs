//! The stencil render pipeline.
//!
//! [`Engine`] owns the template store, partial registry, two-tier cache,
//! compiler, and render-data journal as one explicit state object. Startup
//! creates the configured directories and runs the invalidation check once;
//! after that, render calls flow through the cache, compiling on miss.

#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod export;
pub mod journal;
pub mod registry;

pub use engine::{Engine, ENGINE_VERSION};
pub use error::EngineError;
pub use journal::{RenderJournal, INDEX_KEY};
pub use registry::{AddOutcome, PartialRegistry};
