//! The invalidation ledger: startup staleness detection for the persistent
//! cache tier.
//!
//! The ledger file (`map.json`) records, per template name, the source
//! modification time observed at the end of the previous check. On every
//! check the map is rebuilt from the live filesystem and compared: if any
//! template recorded earlier than it now appears on disk, the entire
//! persistent tier is deleted. Invalidation is all-or-nothing; there is no
//! per-template drop.
//!
//! Staleness policy: only an increased timestamp of a template present in
//! both maps invalidates. Newly added templates need no invalidation (they
//! compile on first use) and deleted templates merely leave artifact files
//! that no name resolves to anymore.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use stencil_common::TemplateName;
use stencil_store::TemplateStore;

use crate::error::LedgerError;

/// Name of the ledger file within the configured map directory.
pub const LEDGER_FILE: &str = "map.json";

/// Recorded source state: template name to modification time in seconds
/// since the Unix epoch. Persisted pretty-printed as a JSON object.
pub type ModificationMap = BTreeMap<TemplateName, u64>;

/// Result of one invalidation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Whether the persistent tier was found stale and dropped.
    pub stale: bool,
    /// Number of templates recorded in the freshly persisted map.
    pub tracked: usize,
}

/// Decides whether the persistent cache tier must be discarded wholesale.
pub struct InvalidationLedger {
    ledger_path: PathBuf,
    cache_dir: PathBuf,
}

impl InvalidationLedger {
    /// Creates a ledger storing its file in `cache_map_dir`, guarding the
    /// persistent tier at `cache_dir`.
    ///
    /// Fails with [`LedgerError::LedgerInsideCacheDir`] when the ledger file
    /// would sit inside the cache directory: the wholesale drop would destroy
    /// the ledger itself. The guard runs here, before any filesystem
    /// mutation.
    pub fn new(cache_map_dir: &Path, cache_dir: &Path) -> Result<Self, LedgerError> {
        let ledger_path = cache_map_dir.join(LEDGER_FILE);
        if absolute(cache_map_dir).starts_with(absolute(cache_dir)) {
            return Err(LedgerError::LedgerInsideCacheDir {
                ledger_path,
                cache_dir: cache_dir.to_path_buf(),
            });
        }
        Ok(Self {
            ledger_path,
            cache_dir: cache_dir.to_path_buf(),
        })
    }

    /// Returns the path of the ledger file.
    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    /// Loads the previously persisted modification map.
    ///
    /// A missing, unreadable, or corrupt ledger file is an empty map, not an
    /// error: with nothing recorded, nothing can be stale.
    pub fn load_recorded(&self) -> ModificationMap {
        std::fs::read_to_string(&self.ledger_path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Runs the invalidation check.
    ///
    /// Rebuilds the modification map from the template store, drops the
    /// whole persistent tier if any template in both maps has a strictly
    /// newer live timestamp, and unconditionally persists the fresh map.
    pub fn check(&self, store: &TemplateStore) -> Result<CheckOutcome, LedgerError> {
        let recorded = self.load_recorded();

        let mut live = ModificationMap::new();
        for name in store.list_all()? {
            // A file deleted between traversal and stat is treated as absent.
            if let Ok(mtime) = store.mtime(&name) {
                live.insert(name, mtime);
            }
        }

        let stale = live
            .iter()
            .any(|(name, &mtime)| matches!(recorded.get(name), Some(&old) if old < mtime));

        if stale && self.cache_dir.exists() {
            std::fs::remove_dir_all(&self.cache_dir).map_err(|e| LedgerError::Io {
                path: self.cache_dir.clone(),
                source: e,
            })?;
        }

        self.persist(&live)?;
        Ok(CheckOutcome {
            stale,
            tracked: live.len(),
        })
    }

    /// Persists a modification map, overwriting the ledger file.
    fn persist(&self, map: &ModificationMap) -> Result<(), LedgerError> {
        if let Some(parent) = self.ledger_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| LedgerError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        let json =
            serde_json::to_string_pretty(map).map_err(|e| LedgerError::Serialization {
                reason: e.to_string(),
            })?;
        std::fs::write(&self.ledger_path, json).map_err(|e| LedgerError::Io {
            path: self.ledger_path.clone(),
            source: e,
        })
    }
}

/// Resolves a path to an absolute, lexically normalized form for the
/// containment comparison. Both paths are resolved against the same working
/// directory, so relative configurations compare consistently.
fn absolute(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    };
    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        store: TemplateStore,
        ledger: InvalidationLedger,
        templates_dir: PathBuf,
        cache_dir: PathBuf,
    }

    fn make_fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let templates_dir = dir.path().join("templates");
        let cache_dir = dir.path().join("cache");
        fs::create_dir_all(&templates_dir).unwrap();
        let store = TemplateStore::new(&templates_dir, "hbs");
        let ledger = InvalidationLedger::new(dir.path(), &cache_dir).unwrap();
        Fixture {
            _dir: dir,
            store,
            ledger,
            templates_dir,
            cache_dir,
        }
    }

    fn write_template(fx: &Fixture, rel: &str) {
        let path = fx.templates_dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{{x}}").unwrap();
    }

    fn seed_cache(fx: &Fixture) {
        fs::create_dir_all(fx.cache_dir.join("widgets")).unwrap();
        fs::write(fx.cache_dir.join("index.tpl"), b"artifact").unwrap();
        fs::write(fx.cache_dir.join("widgets").join("button.tpl"), b"artifact").unwrap();
    }

    fn record(fx: &Fixture, entries: &[(&str, u64)]) {
        let map: ModificationMap = entries
            .iter()
            .map(|(n, t)| (TemplateName::new(*n).unwrap(), *t))
            .collect();
        fs::write(
            fx.ledger.ledger_path(),
            serde_json::to_string_pretty(&map).unwrap(),
        )
        .unwrap();
    }

    #[test]
    fn first_check_is_clean_and_persists_map() {
        let fx = make_fixture();
        write_template(&fx, "index.hbs");

        let outcome = fx.ledger.check(&fx.store).unwrap();
        assert!(!outcome.stale);
        assert_eq!(outcome.tracked, 1);

        let persisted = fx.ledger.load_recorded();
        assert_eq!(persisted.len(), 1);
        assert!(persisted.contains_key(&TemplateName::new("index").unwrap()));
    }

    #[test]
    fn ledger_file_is_pretty_printed() {
        let fx = make_fixture();
        write_template(&fx, "index.hbs");
        fx.ledger.check(&fx.store).unwrap();

        let content = fs::read_to_string(fx.ledger.ledger_path()).unwrap();
        assert!(content.contains('\n'));
        assert!(content.trim_start().starts_with('{'));
    }

    #[test]
    fn older_recorded_timestamp_drops_whole_cache() {
        let fx = make_fixture();
        write_template(&fx, "index.hbs");
        write_template(&fx, "widgets/button.hbs");
        seed_cache(&fx);

        let live = fx
            .store
            .mtime(&TemplateName::new("index").unwrap())
            .unwrap();
        record(
            &fx,
            &[("index", live - 10), ("widgets/button", live)],
        );

        let outcome = fx.ledger.check(&fx.store).unwrap();
        assert!(outcome.stale);
        assert!(!fx.cache_dir.exists(), "cache root must be removed");
    }

    #[test]
    fn unchanged_timestamps_leave_cache_untouched() {
        let fx = make_fixture();
        write_template(&fx, "index.hbs");
        seed_cache(&fx);

        let live = fx
            .store
            .mtime(&TemplateName::new("index").unwrap())
            .unwrap();
        record(&fx, &[("index", live)]);

        let outcome = fx.ledger.check(&fx.store).unwrap();
        assert!(!outcome.stale);
        assert!(fx.cache_dir.join("index.tpl").is_file());
        assert!(fx.cache_dir.join("widgets").join("button.tpl").is_file());
    }

    #[test]
    fn newly_added_template_is_not_stale() {
        let fx = make_fixture();
        write_template(&fx, "index.hbs");
        write_template(&fx, "brand_new.hbs");
        seed_cache(&fx);

        let live = fx
            .store
            .mtime(&TemplateName::new("index").unwrap())
            .unwrap();
        // Only index is recorded; brand_new is absent from the old map.
        record(&fx, &[("index", live)]);

        let outcome = fx.ledger.check(&fx.store).unwrap();
        assert!(!outcome.stale);
        assert!(fx.cache_dir.exists());
        assert_eq!(outcome.tracked, 2);
    }

    #[test]
    fn deleted_template_is_not_stale() {
        let fx = make_fixture();
        write_template(&fx, "index.hbs");
        seed_cache(&fx);

        let live = fx
            .store
            .mtime(&TemplateName::new("index").unwrap())
            .unwrap();
        record(&fx, &[("index", live), ("removed", 12345)]);

        let outcome = fx.ledger.check(&fx.store).unwrap();
        assert!(!outcome.stale);
        assert!(fx.cache_dir.exists());

        let persisted = fx.ledger.load_recorded();
        assert!(!persisted.contains_key(&TemplateName::new("removed").unwrap()));
    }

    #[test]
    fn recorded_newer_than_live_is_not_stale() {
        // Clock skew in the other direction must not drop the cache.
        let fx = make_fixture();
        write_template(&fx, "index.hbs");
        seed_cache(&fx);

        let live = fx
            .store
            .mtime(&TemplateName::new("index").unwrap())
            .unwrap();
        record(&fx, &[("index", live + 100)]);

        let outcome = fx.ledger.check(&fx.store).unwrap();
        assert!(!outcome.stale);
        assert!(fx.cache_dir.exists());
    }

    #[test]
    fn corrupt_ledger_file_is_empty_map() {
        let fx = make_fixture();
        write_template(&fx, "index.hbs");
        seed_cache(&fx);
        fs::write(fx.ledger.ledger_path(), "not json {{{").unwrap();

        let outcome = fx.ledger.check(&fx.store).unwrap();
        assert!(!outcome.stale);
        assert!(fx.cache_dir.exists());
    }

    #[test]
    fn missing_ledger_file_is_empty_map() {
        let fx = make_fixture();
        assert!(fx.ledger.load_recorded().is_empty());
    }

    #[test]
    fn ledger_inside_cache_dir_rejected() {
        let dir = TempDir::new().unwrap();
        let cache_dir = dir.path().join("cache");
        let result = InvalidationLedger::new(&cache_dir.join("meta"), &cache_dir);
        assert!(matches!(
            result,
            Err(LedgerError::LedgerInsideCacheDir { .. })
        ));
    }

    #[test]
    fn ledger_dir_equal_to_cache_dir_rejected() {
        let dir = TempDir::new().unwrap();
        let cache_dir = dir.path().join("cache");
        let result = InvalidationLedger::new(&cache_dir, &cache_dir);
        assert!(matches!(
            result,
            Err(LedgerError::LedgerInsideCacheDir { .. })
        ));
    }

    #[test]
    fn guard_rejects_before_any_mutation() {
        let dir = TempDir::new().unwrap();
        let cache_dir = dir.path().join("cache");
        fs::create_dir_all(&cache_dir).unwrap();
        fs::write(cache_dir.join("index.tpl"), b"artifact").unwrap();

        let result = InvalidationLedger::new(&cache_dir.join("meta"), &cache_dir);
        assert!(result.is_err());
        // Nothing was deleted and no ledger file was written.
        assert!(cache_dir.join("index.tpl").is_file());
        assert!(!cache_dir.join("meta").exists());
    }

    #[test]
    fn sibling_dir_with_common_prefix_is_allowed() {
        let dir = TempDir::new().unwrap();
        let cache_dir = dir.path().join("cache");
        let map_dir = dir.path().join("cache-meta");
        assert!(InvalidationLedger::new(&map_dir, &cache_dir).is_ok());
    }

    #[test]
    fn check_with_empty_store_persists_empty_map() {
        let fx = make_fixture();
        let outcome = fx.ledger.check(&fx.store).unwrap();
        assert!(!outcome.stale);
        assert_eq!(outcome.tracked, 0);
        assert!(fx.ledger.ledger_path().is_file());
    }
}
