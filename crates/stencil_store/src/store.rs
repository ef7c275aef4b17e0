//! Template source resolution and discovery.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use stencil_common::TemplateName;

use crate::error::StoreError;

/// Read-only accessor over a directory tree of template sources.
///
/// A template named `widgets/button` with extension `hbs` lives at
/// `<root>/widgets/button.hbs`. The store holds no state beyond the root
/// path and extension; it can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
    extension: String,
}

impl TemplateStore {
    /// Creates a store rooted at `root` for sources with the given extension.
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// Returns the store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the configured source extension, without the leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Returns the deterministic source path for a template name.
    pub fn source_path(&self, name: &TemplateName) -> PathBuf {
        self.root.join(name.relative_path(&self.extension))
    }

    /// Reads the source text of a template.
    ///
    /// Fails with [`StoreError::NotFound`] when no regular file exists at the
    /// template's deterministic path.
    pub fn resolve(&self, name: &TemplateName) -> Result<String, StoreError> {
        let path = self.source_path(name);
        if !path.is_file() {
            return Err(StoreError::NotFound {
                name: name.to_string(),
                path,
            });
        }
        std::fs::read_to_string(&path).map_err(|e| StoreError::Io { path, source: e })
    }

    /// Returns the modification time of a template source, in seconds since
    /// the Unix epoch.
    pub fn mtime(&self, name: &TemplateName) -> Result<u64, StoreError> {
        let path = self.source_path(name);
        let io = |e| StoreError::Io {
            path: path.clone(),
            source: e,
        };
        let modified = std::fs::metadata(&path).map_err(io)?.modified().map_err(io)?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0))
    }

    /// Discovers every template in the store by full recursive traversal.
    ///
    /// Yields root-relative names with `/` separators, the configured
    /// extension stripped. Files with other extensions are still listed
    /// (their extension stays part of the name); files whose derived name
    /// fails validation are skipped, since no name can ever resolve to them.
    /// The result is sorted for deterministic output, but callers must rely
    /// on it only for completeness of discovery, not for order.
    pub fn list_all(&self) -> Result<Vec<TemplateName>, StoreError> {
        let mut names = Vec::new();
        walk_dir(&self.root, &self.root, &self.extension, &mut names)?;
        names.sort();
        Ok(names)
    }

    /// Discovers every template under a single store subfolder.
    ///
    /// Names remain root-relative (`<folder>/...`). Fails with
    /// [`StoreError::FolderNotFound`] when the folder does not exist.
    pub fn list_folder(&self, folder: &str) -> Result<Vec<TemplateName>, StoreError> {
        // Validating through TemplateName rejects empty and escaping folders.
        let folder = TemplateName::new(folder)?;
        let mut dir = self.root.clone();
        for segment in folder.segments() {
            dir.push(segment);
        }
        if !dir.is_dir() {
            return Err(StoreError::FolderNotFound {
                folder: folder.to_string(),
                path: dir,
            });
        }
        let mut names = Vec::new();
        walk_dir(&dir, &self.root, &self.extension, &mut names)?;
        names.sort();
        Ok(names)
    }
}

/// Recursively walks `dir`, collecting template names relative to `root`.
fn walk_dir(
    dir: &Path,
    root: &Path,
    extension: &str,
    names: &mut Vec<TemplateName>,
) -> Result<(), StoreError> {
    let entries = std::fs::read_dir(dir).map_err(|e| StoreError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, root, extension, names)?;
        } else if path.is_file() {
            if let Some(name) = derive_name(&path, root, extension) {
                names.push(name);
            }
        }
    }
    Ok(())
}

/// Derives the logical name for a source file: root-relative path with `/`
/// separators and the configured extension stripped when present.
fn derive_name(path: &Path, root: &Path, extension: &str) -> Option<TemplateName> {
    let rel = path.strip_prefix(root).ok()?;
    let mut name = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    let suffix = format!(".{extension}");
    if let Some(stripped) = name.strip_suffix(&suffix) {
        name = stripped.to_string();
    }
    TemplateName::new(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_store() -> (TempDir, TemplateStore) {
        let dir = TempDir::new().unwrap();
        let store = TemplateStore::new(dir.path(), "hbs");
        (dir, store)
    }

    fn write(dir: &TempDir, rel: &str, content: &str) {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn resolve_reads_source() {
        let (dir, store) = make_store();
        write(&dir, "index.hbs", "Hello {{name}}!");
        let name = TemplateName::new("index").unwrap();
        assert_eq!(store.resolve(&name).unwrap(), "Hello {{name}}!");
    }

    #[test]
    fn resolve_nested_name() {
        let (dir, store) = make_store();
        write(&dir, "widgets/button.hbs", "<button>{{label}}</button>");
        let name = TemplateName::new("widgets/button").unwrap();
        assert_eq!(store.resolve(&name).unwrap(), "<button>{{label}}</button>");
    }

    #[test]
    fn resolve_missing_is_not_found() {
        let (_dir, store) = make_store();
        let name = TemplateName::new("ghost").unwrap();
        let err = store.resolve(&name).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn source_path_is_deterministic() {
        let (dir, store) = make_store();
        let name = TemplateName::new("a/b").unwrap();
        assert_eq!(store.source_path(&name), dir.path().join("a").join("b.hbs"));
    }

    #[test]
    fn list_all_recurses_and_strips_extension() {
        let (dir, store) = make_store();
        write(&dir, "index.hbs", "x");
        write(&dir, "widgets/button.hbs", "x");
        write(&dir, "widgets/deep/icon.hbs", "x");

        let names = store.list_all().unwrap();
        let strs: Vec<_> = names.iter().map(|n| n.as_str()).collect();
        assert_eq!(strs, vec!["index", "widgets/button", "widgets/deep/icon"]);
    }

    #[test]
    fn list_all_keeps_foreign_extensions() {
        let (dir, store) = make_store();
        write(&dir, "index.hbs", "x");
        write(&dir, "notes.txt", "x");

        let names = store.list_all().unwrap();
        let strs: Vec<_> = names.iter().map(|n| n.as_str()).collect();
        assert_eq!(strs, vec!["index", "notes.txt"]);
    }

    #[test]
    fn list_all_sorted() {
        let (dir, store) = make_store();
        write(&dir, "zebra.hbs", "x");
        write(&dir, "alpha.hbs", "x");
        let names = store.list_all().unwrap();
        assert_eq!(names[0].as_str(), "alpha");
        assert_eq!(names[1].as_str(), "zebra");
    }

    #[test]
    fn list_folder_restricts_to_subtree() {
        let (dir, store) = make_store();
        write(&dir, "index.hbs", "x");
        write(&dir, "partials/header.hbs", "x");
        write(&dir, "partials/nav/menu.hbs", "x");

        let names = store.list_folder("partials").unwrap();
        let strs: Vec<_> = names.iter().map(|n| n.as_str()).collect();
        assert_eq!(strs, vec!["partials/header", "partials/nav/menu"]);
    }

    #[test]
    fn list_folder_missing_is_folder_not_found() {
        let (_dir, store) = make_store();
        let err = store.list_folder("nope").unwrap_err();
        assert!(matches!(err, StoreError::FolderNotFound { .. }));
    }

    #[test]
    fn list_folder_empty_name_rejected() {
        let (_dir, store) = make_store();
        let err = store.list_folder("").unwrap_err();
        assert!(matches!(err, StoreError::Name(_)));
    }

    #[test]
    fn mtime_reports_seconds() {
        let (dir, store) = make_store();
        write(&dir, "index.hbs", "x");
        let name = TemplateName::new("index").unwrap();
        let mtime = store.mtime(&name).unwrap();
        assert!(mtime > 0);
    }

    #[test]
    fn mtime_missing_is_io_error() {
        let (_dir, store) = make_store();
        let name = TemplateName::new("ghost").unwrap();
        assert!(store.mtime(&name).is_err());
    }
}
