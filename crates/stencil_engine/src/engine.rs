//! The engine: owned state and the render entry points.

use std::sync::RwLock;

use serde_json::Value;

use stencil_cache::{CheckOutcome, InvalidationLedger, TemplateCache};
use stencil_common::TemplateName;
use stencil_compiler::{Compiler, PartialMap, TokenCompiler};
use stencil_config::EngineConfig;
use stencil_store::TemplateStore;

use crate::error::EngineError;
use crate::export;
use crate::journal::RenderJournal;
use crate::registry::{AddOutcome, PartialRegistry};

/// Version string recorded in persisted artifact headers.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The template engine: store, registry, cache, compiler, and journal held
/// as one explicit state object.
///
/// Construction creates the configured directories and runs the invalidation
/// check once, before any rendering. The engine is `Send + Sync`; the
/// registry, memory tier, and journal sit behind reader/writer locks so
/// concurrent renders share reads and serialize writes.
pub struct Engine {
    config: EngineConfig,
    store: TemplateStore,
    ledger: InvalidationLedger,
    cache: TemplateCache,
    registry: RwLock<PartialRegistry>,
    journal: RwLock<RenderJournal>,
    compiler: Box<dyn Compiler>,
}

impl Engine {
    /// Creates an engine with the built-in token compiler.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_compiler(config, Box::new(TokenCompiler::new()))
    }

    /// Creates an engine with a caller-supplied compiler.
    ///
    /// Validates the ledger location first (before any filesystem mutation),
    /// then creates missing directories, then runs the invalidation check.
    /// Directory-creation failure is fatal.
    pub fn with_compiler(
        config: EngineConfig,
        compiler: Box<dyn Compiler>,
    ) -> Result<Self, EngineError> {
        let ledger = InvalidationLedger::new(&config.cache_map_dir, &config.cache_dir)?;

        for dir in [
            &config.templates_dir,
            &config.cache_dir,
            &config.cache_map_dir,
        ] {
            std::fs::create_dir_all(dir).map_err(|e| EngineError::CreateDir {
                path: dir.clone(),
                source: e,
            })?;
        }

        let store = TemplateStore::new(
            config.templates_dir.clone(),
            config.templates_extension.clone(),
        );
        ledger.check(&store)?;

        let cache = TemplateCache::new(config.cache_dir.clone(), ENGINE_VERSION);

        Ok(Self {
            config,
            store,
            ledger,
            cache,
            registry: RwLock::new(PartialRegistry::new()),
            journal: RwLock::new(RenderJournal::new()),
            compiler,
        })
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the template store.
    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Renders a template through the cache with the given data.
    ///
    /// `data` defaults to an empty record when `None`.
    pub fn render(&self, name: &str, data: Option<&Value>) -> Result<String, EngineError> {
        self.render_with(name, data, true)
    }

    /// Renders a template, optionally bypassing both cache tiers.
    ///
    /// The bypass path compiles and executes in-process without persisting
    /// anything; it exists for debugging and low-frequency rendering.
    pub fn render_with(
        &self,
        name: &str,
        data: Option<&Value>,
        use_cache: bool,
    ) -> Result<String, EngineError> {
        let name = TemplateName::new(name)?;
        let empty = Value::Object(serde_json::Map::new());
        let data = data.unwrap_or(&empty);

        // Snapshot the partial map so compilation runs without holding the
        // registry lock.
        let partials = self.read_registry().all().clone();

        let renderer = if use_cache {
            self.cache
                .renderer(&name, &self.store, &partials, self.compiler.as_ref())?
        } else {
            self.cache
                .renderer_uncached(&name, &self.store, &partials, self.compiler.as_ref())?
        };

        let output = renderer.render(data);
        self.write_journal().record(&name, data);
        Ok(output)
    }

    /// Re-runs the invalidation check.
    ///
    /// Not safe to run concurrently with active render calls: the wholesale
    /// drop may delete artifact files out from under in-flight disk reads.
    /// A stale result also clears the memory tier, since its renderers were
    /// compiled from the old sources.
    pub fn check_invalidation(&self) -> Result<CheckOutcome, EngineError> {
        let outcome = self.ledger.check(&self.store)?;
        if outcome.stale {
            self.cache.clear_memory_tier();
        }
        Ok(outcome)
    }

    /// Registers a partial by name.
    pub fn add_partial(&self, name: &str) -> Result<AddOutcome, EngineError> {
        Ok(self.write_registry().add(name, &self.store)?)
    }

    /// Registers every template under a store subfolder as a partial.
    /// Returns the number of partials actually inserted.
    pub fn add_partials_folder(&self, folder: &str) -> Result<usize, EngineError> {
        Ok(self.write_registry().add_folder(folder, &self.store)?)
    }

    /// Ensures a compiled artifact exists for a template without rendering.
    ///
    /// Used to pre-populate the persistent tier ahead of render traffic.
    pub fn warm(&self, name: &str) -> Result<(), EngineError> {
        let name = TemplateName::new(name)?;
        let partials = self.read_registry().all().clone();
        self.cache
            .renderer(&name, &self.store, &partials, self.compiler.as_ref())?;
        Ok(())
    }

    /// Removes a partial; returns whether it existed.
    pub fn remove_partial(&self, name: &str) -> bool {
        self.write_registry().remove(name)
    }

    /// Removes all partials.
    pub fn clear_partials(&self) {
        self.write_registry().clear();
    }

    /// Snapshot of the registered partials, in ascending key order.
    pub fn partials(&self) -> PartialMap {
        self.read_registry().all().clone()
    }

    /// Enables or disables the memory cache tier.
    pub fn set_memory_tier(&self, enabled: bool) {
        self.cache.set_memory_tier(enabled);
    }

    /// Whether the memory cache tier is currently consulted.
    pub fn memory_tier_enabled(&self) -> bool {
        self.cache.memory_tier_enabled()
    }

    /// Returns the raw source text of a template.
    pub fn template_source(&self, name: &str) -> Result<String, EngineError> {
        let name = TemplateName::new(name)?;
        Ok(self.store.resolve(&name)?)
    }

    /// Lists every template discovered in the store.
    pub fn list_templates(&self) -> Result<Vec<TemplateName>, EngineError> {
        Ok(self.store.list_all()?)
    }

    /// Wraps one template's raw source for inline client delivery.
    pub fn script_wrapper(&self, name: &str) -> Result<String, EngineError> {
        let name = TemplateName::new(name)?;
        let source = self.store.resolve(&name)?;
        Ok(export::script_wrapper(&name, &source))
    }

    /// Compact JSON of the partial registry contents.
    pub fn partials_json(&self) -> Result<String, EngineError> {
        serde_json::to_string(self.read_registry().all()).map_err(|e| EngineError::Export {
            reason: e.to_string(),
        })
    }

    /// Pretty JSON of the render-data journal.
    pub fn journal_json(&self) -> Result<String, EngineError> {
        serde_json::to_string_pretty(&*self.read_journal()).map_err(|e| EngineError::Export {
            reason: e.to_string(),
        })
    }

    /// The full client export bundle: every template wrapped in a script
    /// tag, followed by the partial registry and journal as JS globals.
    pub fn export_bundle(&self) -> Result<String, EngineError> {
        let mut out = String::new();
        for name in self.store.list_all()? {
            let source = self.store.resolve(&name)?;
            out.push_str(&export::script_wrapper(&name, &source));
            out.push('\n');
        }
        out.push_str(&export::global_assignment(
            export::PARTIALS_GLOBAL,
            &self.partials_json()?,
        ));
        out.push('\n');
        out.push_str(&export::global_assignment(
            export::DATA_GLOBAL,
            &self.journal_json()?,
        ));
        Ok(out)
    }

    fn read_registry(&self) -> std::sync::RwLockReadGuard<'_, PartialRegistry> {
        self.registry
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_registry(&self) -> std::sync::RwLockWriteGuard<'_, PartialRegistry> {
        self.registry
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_journal(&self) -> std::sync::RwLockReadGuard<'_, RenderJournal> {
        self.journal
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_journal(&self) -> std::sync::RwLockWriteGuard<'_, RenderJournal> {
        self.journal
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
