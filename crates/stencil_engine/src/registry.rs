//! The partial-template registry.
//!
//! Partials are named sub-templates supplied to the compiler on every
//! compilation; a template references one with `{{> name}}`. The registry is
//! an ordered map from template name to source text, kept sorted by key so
//! compiler input is reproducible. It is process-lifetime state and is never
//! persisted.

use stencil_common::TemplateName;
use stencil_compiler::PartialMap;
use stencil_store::{StoreError, TemplateStore};

/// Result of an [`add`](PartialRegistry::add) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The partial was inserted.
    Inserted,
    /// The partial was already registered; nothing changed.
    AlreadyPresent,
}

/// Ordered mapping of partial name to source text.
#[derive(Debug, Default)]
pub struct PartialRegistry {
    entries: PartialMap,
}

impl PartialRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a single partial by resolving its source from the store.
    ///
    /// Fails on an invalid name or a missing source file. Adding a name that
    /// is already registered is a reported no-op: state is unchanged and
    /// [`AddOutcome::AlreadyPresent`] is returned.
    pub fn add(&mut self, name: &str, store: &TemplateStore) -> Result<AddOutcome, StoreError> {
        let name = TemplateName::new(name)?;
        let source = store.resolve(&name)?;
        if self.entries.contains_key(name.as_str()) {
            return Ok(AddOutcome::AlreadyPresent);
        }
        self.entries.insert(name.to_string(), source);
        Ok(AddOutcome::Inserted)
    }

    /// Registers every template found under a store subfolder.
    ///
    /// Fails on an invalid folder name or a missing folder. Individual
    /// duplicates are ignored. Returns the number of partials actually
    /// inserted.
    pub fn add_folder(
        &mut self,
        folder: &str,
        store: &TemplateStore,
    ) -> Result<usize, StoreError> {
        let mut inserted = 0;
        for name in store.list_folder(folder)? {
            if let AddOutcome::Inserted = self.add(name.as_str(), store)? {
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    /// Removes a partial. Returns whether an entry existed and was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    /// Removes all partials.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Read-only view of the registered partials, in ascending key order.
    pub fn all(&self) -> &PartialMap {
        &self.entries
    }

    /// Number of registered partials.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
