//! Error types for template compilation.

/// Errors produced while compiling a template or loading an artifact.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The template source contains a malformed tag.
    #[error("template syntax error at byte {offset}: {message}")]
    Syntax {
        /// Description of the malformed construct.
        message: String,
        /// Byte offset of the offending tag in the source.
        offset: usize,
    },

    /// A `{{> name}}` inclusion referenced a partial that is not registered.
    #[error("unknown partial '{name}'")]
    UnknownPartial {
        /// The referenced partial name.
        name: String,
    },

    /// Partial inclusions form a cycle.
    #[error("partial inclusion cycle through '{name}'")]
    PartialCycle {
        /// The partial that closed the cycle.
        name: String,
    },

    /// An artifact could not be encoded or decoded.
    #[error("artifact codec error: {reason}")]
    Codec {
        /// Description of the codec failure.
        reason: String,
    },
}
