//! Name-keyed binary artifact storage for compiled templates.
//!
//! Each template's compiled artifact is stored at `<cache_dir>/<name>.tpl`,
//! with directories mirroring the name's path segments. Every file carries a
//! header with magic bytes, a format version, and a payload checksum; any
//! validation failure on read is a cache miss, not an error. Artifact files
//! are never edited in place — they are only created whole or removed by the
//! ledger's wholesale drop.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stencil_common::{ContentHash, TemplateName};

use crate::error::CacheError;

/// Magic bytes identifying a stencil cache artifact.
const ARTIFACT_MAGIC: [u8; 4] = *b"STPL";

/// Current artifact format version. Increment on breaking changes to
/// the header or payload format.
const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// File extension of persisted artifacts.
pub const ARTIFACT_EXT: &str = "tpl";

/// Header prepended to every persisted artifact for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactHeader {
    /// Magic bytes: must be `b"STPL"`.
    pub magic: [u8; 4],

    /// Artifact format version.
    pub format_version: u32,

    /// Engine version that produced this artifact (informational).
    pub engine_version: String,

    /// Content hash of the payload (detects corruption and partial writes).
    pub checksum: ContentHash,
}

/// Persistent tier of the template cache.
///
/// Stores one artifact file per template name under the cache directory.
pub struct ArtifactStore {
    cache_dir: PathBuf,
    engine_version: String,
}

impl ArtifactStore {
    /// Creates an artifact store rooted at the given cache directory.
    pub fn new(cache_dir: impl Into<PathBuf>, engine_version: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            engine_version: engine_version.into(),
        }
    }

    /// Returns the cache root directory.
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the artifact file path for a template name.
    pub fn artifact_path(&self, name: &TemplateName) -> PathBuf {
        self.cache_dir.join(name.relative_path(ARTIFACT_EXT))
    }

    /// Writes an artifact file for a template, creating missing directories.
    ///
    /// The payload is framed as: 4-byte little-endian header length, bincode
    /// header, raw payload. Writing the same payload twice is harmless, so
    /// racing writers need no coordination.
    pub fn write(&self, name: &TemplateName, payload: &[u8]) -> Result<(), CacheError> {
        let path = self.artifact_path(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CacheError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let header = ArtifactHeader {
            magic: ARTIFACT_MAGIC,
            format_version: ARTIFACT_FORMAT_VERSION,
            engine_version: self.engine_version.clone(),
            checksum: ContentHash::from_bytes(payload),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })?;

        let header_len = header_bytes.len() as u32;
        let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
        output.extend_from_slice(&header_len.to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(payload);

        std::fs::write(&path, &output).map_err(|e| CacheError::Io { path, source: e })
    }

    /// Reads and validates the artifact for a template.
    ///
    /// Returns `None` if the file is missing, truncated, has wrong magic or
    /// format version, or fails the checksum. All of these are cache misses.
    pub fn read(&self, name: &TemplateName) -> Option<Vec<u8>> {
        let path = self.artifact_path(name);
        let raw = std::fs::read(&path).ok()?;

        if raw.len() < 4 {
            return None;
        }
        let header_len = u32::from_le_bytes(raw[..4].try_into().ok()?) as usize;
        if raw.len() < 4 + header_len {
            return None;
        }

        let header: ArtifactHeader =
            bincode::serde::decode_from_slice(&raw[4..4 + header_len], bincode::config::standard())
                .ok()?
                .0;

        if header.magic != ARTIFACT_MAGIC || header.format_version != ARTIFACT_FORMAT_VERSION {
            return None;
        }

        let payload = &raw[4 + header_len..];
        if ContentHash::from_bytes(payload) != header.checksum {
            return None;
        }

        Some(payload.to_vec())
    }
}
