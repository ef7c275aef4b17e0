//! The two-tier template cache.
//!
//! Tier one is a process-lifetime map of name to loaded renderer; tier two
//! is the persistent artifact store. A miss in both tiers resolves the
//! template source, invokes the compiler with the current partial map,
//! persists the artifact, and populates both tiers. Reads take a shared
//! lock; the memory tier is only written after compilation completes, so
//! concurrent misses for the same name at worst compile redundantly — the
//! artifact write is idempotent and the last insert wins.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use stencil_common::TemplateName;
use stencil_compiler::{Compiler, PartialMap, Renderer};
use stencil_store::TemplateStore;

use crate::artifact::ArtifactStore;
use crate::error::CacheError;

/// Two-tier cache resolving template names to executable renderers.
pub struct TemplateCache {
    artifacts: ArtifactStore,
    memory: RwLock<HashMap<TemplateName, Arc<dyn Renderer>>>,
    memory_enabled: AtomicBool,
}

impl TemplateCache {
    /// Creates a cache with its persistent tier rooted at `cache_dir`.
    ///
    /// The memory tier starts enabled.
    pub fn new(cache_dir: impl Into<PathBuf>, engine_version: impl Into<String>) -> Self {
        Self {
            artifacts: ArtifactStore::new(cache_dir, engine_version),
            memory: RwLock::new(HashMap::new()),
            memory_enabled: AtomicBool::new(true),
        }
    }

    /// Enables or disables the memory tier.
    ///
    /// While disabled, every resolution re-checks the persistent tier, which
    /// still avoids recompilation as long as the artifact file exists.
    pub fn set_memory_tier(&self, enabled: bool) {
        self.memory_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Returns whether the memory tier is currently consulted.
    pub fn memory_tier_enabled(&self) -> bool {
        self.memory_enabled.load(Ordering::Relaxed)
    }

    /// Drops every entry of the memory tier. The persistent tier is untouched.
    pub fn clear_memory_tier(&self) {
        self.memory
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }

    /// Returns the persistent-tier file path for a template name.
    pub fn artifact_path(&self, name: &TemplateName) -> PathBuf {
        self.artifacts.artifact_path(name)
    }

    /// Resolves a renderer for `name`, compiling and populating both tiers
    /// on a full miss.
    pub fn renderer(
        &self,
        name: &TemplateName,
        store: &TemplateStore,
        partials: &PartialMap,
        compiler: &dyn Compiler,
    ) -> Result<Arc<dyn Renderer>, CacheError> {
        if self.memory_tier_enabled() {
            let memory = self
                .memory
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(renderer) = memory.get(name) {
                return Ok(Arc::clone(renderer));
            }
        }

        // Disk tier: a corrupt or undecodable artifact is a miss and falls
        // through to recompilation.
        if let Some(payload) = self.artifacts.read(name) {
            if let Ok(renderer) = compiler.load(&payload) {
                self.remember(name, &renderer);
                return Ok(renderer);
            }
        }

        // Full miss: compile, persist, then load the persisted bytes so the
        // returned renderer is exactly what later processes will see.
        let source = store.resolve(name)?;
        let payload = compiler.compile(&source, partials)?;
        self.artifacts.write(name, &payload)?;
        let renderer =
            compiler
                .load(&payload)
                .map_err(|_| CacheError::RendererUnavailable {
                    name: name.to_string(),
                })?;
        self.remember(name, &renderer);
        Ok(renderer)
    }

    /// Bypass path: compiles and loads in-process without touching either
    /// tier. For ephemeral, low-frequency rendering only.
    pub fn renderer_uncached(
        &self,
        name: &TemplateName,
        store: &TemplateStore,
        partials: &PartialMap,
        compiler: &dyn Compiler,
    ) -> Result<Arc<dyn Renderer>, CacheError> {
        let source = store.resolve(name)?;
        let payload = compiler.compile(&source, partials)?;
        compiler
            .load(&payload)
            .map_err(|_| CacheError::RendererUnavailable {
                name: name.to_string(),
            })
    }

    /// Populates the memory tier when it is enabled.
    fn remember(&self, name: &TemplateName, renderer: &Arc<dyn Renderer>) {
        if self.memory_tier_enabled() {
            self.memory
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .insert(name.clone(), Arc::clone(renderer));
        }
    }
}
