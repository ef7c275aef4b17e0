//! Error types for template store operations.

use std::path::PathBuf;

use stencil_common::NameError;

/// Errors that can occur when resolving or discovering template sources.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No source file exists at the deterministic path for a template name.
    #[error("template '{name}' not found at {path}")]
    NotFound {
        /// The requested template name.
        name: String,
        /// The path that was probed.
        path: PathBuf,
    },

    /// A requested store subfolder does not exist.
    #[error("template folder '{folder}' not found at {path}")]
    FolderNotFound {
        /// The requested folder name.
        folder: String,
        /// The path that was probed.
        path: PathBuf,
    },

    /// An I/O error occurred while reading the store.
    #[error("template store I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A supplied name or folder failed validation.
    #[error(transparent)]
    Name(#[from] NameError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = StoreError::NotFound {
            name: "widgets/button".to_string(),
            path: PathBuf::from("/srv/templates/widgets/button.hbs"),
        };
        let msg = err.to_string();
        assert!(msg.contains("widgets/button"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn folder_not_found_display() {
        let err = StoreError::FolderNotFound {
            folder: "partials".to_string(),
            path: PathBuf::from("/srv/templates/partials"),
        };
        assert!(err.to_string().contains("folder 'partials'"));
    }

    #[test]
    fn name_error_passes_through() {
        let err: StoreError = NameError::Empty.into();
        assert_eq!(err.to_string(), "template name is empty");
    }
}
