//! Validated template names.
//!
//! A template name is the logical identifier used across every tier of the
//! engine: it selects the source file in the template store, the artifact
//! file in the persistent cache, and the entries of the invalidation ledger,
//! partial registry, and render-data journal.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A validated, `/`-separated template identifier.
///
/// Each name maps deterministically to exactly one file under a store or
/// cache root: `<root>/<name>.<ext>`. Validation rejects names that would
/// escape the root or map ambiguously (empty names, absolute paths, `.`/`..`
/// segments, backslashes).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateName(String);

impl TemplateName {
    /// Parses and validates a template name.
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name.contains('\\') {
            return Err(NameError::invalid(&name, "backslash separators are not allowed"));
        }
        if name.starts_with('/') || name.ends_with('/') {
            return Err(NameError::invalid(&name, "leading or trailing '/'"));
        }
        for segment in name.split('/') {
            match segment {
                "" => return Err(NameError::invalid(&name, "empty path segment")),
                "." | ".." => {
                    return Err(NameError::invalid(&name, "relative path segments"));
                }
                _ => {}
            }
        }
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `/`-separated segments of the name.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Maps the name to its root-relative file path: `<name>.<extension>`.
    ///
    /// Segments become directory components, so `widgets/button` with
    /// extension `hbs` yields `widgets/button.hbs`.
    pub fn relative_path(&self, extension: &str) -> PathBuf {
        let mut path = PathBuf::new();
        let mut segments = self.segments().peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                path.push(format!("{segment}.{extension}"));
            } else {
                path.push(segment);
            }
        }
        path
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TemplateName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TemplateName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TemplateName> for String {
    fn from(name: TemplateName) -> Self {
        name.0
    }
}

/// Errors produced when validating a template name.
#[derive(Debug, thiserror::Error)]
pub enum NameError {
    /// The name was empty.
    #[error("template name is empty")]
    Empty,

    /// The name contained a disallowed component.
    #[error("invalid template name '{name}': {reason}")]
    Invalid {
        /// The offending name.
        name: String,
        /// What made it invalid.
        reason: &'static str,
    },
}

impl NameError {
    fn invalid(name: &str, reason: &'static str) -> Self {
        Self::Invalid {
            name: name.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name() {
        let n = TemplateName::new("index").unwrap();
        assert_eq!(n.as_str(), "index");
    }

    #[test]
    fn nested_name() {
        let n = TemplateName::new("widgets/buttons/primary").unwrap();
        assert_eq!(n.segments().count(), 3);
    }

    #[test]
    fn empty_name_rejected() {
        assert!(matches!(TemplateName::new(""), Err(NameError::Empty)));
    }

    #[test]
    fn parent_segment_rejected() {
        assert!(TemplateName::new("../etc/passwd").is_err());
        assert!(TemplateName::new("a/../b").is_err());
    }

    #[test]
    fn absolute_rejected() {
        assert!(TemplateName::new("/index").is_err());
    }

    #[test]
    fn trailing_slash_rejected() {
        assert!(TemplateName::new("widgets/").is_err());
    }

    #[test]
    fn double_slash_rejected() {
        assert!(TemplateName::new("widgets//button").is_err());
    }

    #[test]
    fn backslash_rejected() {
        assert!(TemplateName::new("widgets\\button").is_err());
    }

    #[test]
    fn relative_path_single_segment() {
        let n = TemplateName::new("index").unwrap();
        assert_eq!(n.relative_path("hbs"), PathBuf::from("index.hbs"));
    }

    #[test]
    fn relative_path_nested() {
        let n = TemplateName::new("widgets/button").unwrap();
        assert_eq!(n.relative_path("tpl"), PathBuf::from("widgets/button.tpl"));
    }

    #[test]
    fn display_roundtrip() {
        let n = TemplateName::new("a/b").unwrap();
        assert_eq!(format!("{n}"), "a/b");
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = TemplateName::new("alpha").unwrap();
        let b = TemplateName::new("beta").unwrap();
        assert!(a < b);
    }

    #[test]
    fn serde_as_plain_string() {
        let n = TemplateName::new("widgets/button").unwrap();
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, "\"widgets/button\"");
        let back: TemplateName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
    }

    #[test]
    fn serde_rejects_invalid() {
        let result: Result<TemplateName, _> = serde_json::from_str("\"../up\"");
        assert!(result.is_err());
    }
}
