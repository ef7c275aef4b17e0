//! Implementation of the `stencil check` command.
//!
//! Runs the invalidation check directly against the configured store and
//! cache, without going through engine construction (which would have
//! already absorbed the outcome), and reports what happened.

use stencil_cache::InvalidationLedger;
use stencil_store::TemplateStore;

use crate::project::load_project_config;
use crate::GlobalArgs;

/// Runs the `stencil check` command.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_project_config(global)?;
    let store = TemplateStore::new(
        config.templates_dir.clone(),
        config.templates_extension.clone(),
    );
    let ledger = InvalidationLedger::new(&config.cache_map_dir, &config.cache_dir)?;

    let outcome = ledger.check(&store)?;

    if !global.quiet {
        if outcome.stale {
            eprintln!(
                "   Sources changed: dropped cache at {}",
                config.cache_dir.display()
            );
        } else {
            eprintln!("   Cache is up to date");
        }
        eprintln!("   Tracking {} template(s)", outcome.tracked);
    }

    Ok(0)
}
