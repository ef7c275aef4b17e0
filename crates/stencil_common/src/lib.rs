//! Shared foundational types for the stencil template engine.
//!
//! This crate provides the validated template name type used as the key of
//! every cache tier, and content hashing for artifact integrity checks.

#![warn(missing_docs)]

pub mod hash;
pub mod name;

pub use hash::ContentHash;
pub use name::{NameError, TemplateName};
