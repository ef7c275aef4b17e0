//! Two-tier compiled-template cache and its invalidation ledger.
//!
//! This crate is the cache core of the stencil engine: an in-process memory
//! tier over a persistent artifact tier, populated by compiling template
//! sources on miss, and an invalidation ledger that compares recorded source
//! modification times against the live filesystem at startup, dropping the
//! whole persistent tier when any source has changed. Persistent-tier reads
//! are fail-safe: a corrupt artifact is a cache miss, never an error.

#![warn(missing_docs)]

pub mod artifact;
pub mod cache;
pub mod error;
pub mod ledger;

pub use artifact::ArtifactStore;
pub use cache::TemplateCache;
pub use error::{CacheError, LedgerError};
pub use ledger::{CheckOutcome, InvalidationLedger, ModificationMap};
