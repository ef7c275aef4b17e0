//! The template compiler contract and the built-in token compiler.
//!
//! The cache core treats compilation as a collaborator behind the
//! [`Compiler`] trait: a pure function from source text plus a named partial
//! map to a serializable artifact, and from an artifact back to an invocable
//! [`Renderer`]. Artifacts are plain data (a compiled op program) that is
//! deserialized and interpreted, never executed as code.
//!
//! [`TokenCompiler`] implements the trait for a Handlebars-subset syntax:
//! `{{path}}` (HTML-escaped), `{{{path}}}` (raw), `{{> name}}` (partials,
//! expanded inline at compile time), and `{{! comment}}`.

#![warn(missing_docs)]

pub mod error;
pub mod parser;
pub mod program;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use error::CompileError;
pub use program::Program;

/// Named partial sources supplied to every compilation, ordered by name.
pub type PartialMap = BTreeMap<String, String>;

/// An executable compiled template.
pub trait Renderer: Send + Sync {
    /// Renders the template against the given data record.
    ///
    /// Missing or null values interpolate as the empty string; rendering
    /// itself cannot fail.
    fn render(&self, data: &serde_json::Value) -> String;
}

/// A template compiler collaborator.
///
/// `compile` produces a serialized artifact suitable for persisting to disk;
/// `load` rehydrates an artifact into an invocable renderer. The two halves
/// are separated so a cache can store artifacts without understanding them.
pub trait Compiler: Send + Sync {
    /// Compiles source text with the given partials into a serialized artifact.
    fn compile(&self, source: &str, partials: &PartialMap) -> Result<Vec<u8>, CompileError>;

    /// Rehydrates a serialized artifact into a renderer.
    fn load(&self, artifact: &[u8]) -> Result<Arc<dyn Renderer>, CompileError>;
}

/// The built-in compiler for the Handlebars-subset template syntax.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenCompiler;

impl TokenCompiler {
    /// Creates a new token compiler.
    pub fn new() -> Self {
        Self
    }
}

impl Compiler for TokenCompiler {
    fn compile(&self, source: &str, partials: &PartialMap) -> Result<Vec<u8>, CompileError> {
        let program = parser::parse(source, partials)?;
        bincode::serde::encode_to_vec(&program, bincode::config::standard()).map_err(|e| {
            CompileError::Codec {
                reason: e.to_string(),
            }
        })
    }

    fn load(&self, artifact: &[u8]) -> Result<Arc<dyn Renderer>, CompileError> {
        let (program, _): (Program, usize) =
            bincode::serde::decode_from_slice(artifact, bincode::config::standard()).map_err(
                |e| CompileError::Codec {
                    reason: e.to_string(),
                },
            )?;
        Ok(Arc::new(program))
    }
}
