//! Implementation of the `stencil warm` command.
//!
//! Precompiles every discovered template into the persistent cache so the
//! first render of each name skips compilation. Templates that fail to
//! compile are reported and skipped; the command fails if any did.

use crate::project::open_engine;
use crate::{GlobalArgs, WarmArgs};

/// Runs the `stencil warm` command.
pub fn run(args: &WarmArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let engine = open_engine(global)?;

    if let Some(folder) = &args.partials {
        engine.add_partials_folder(folder)?;
    }

    let names = engine.list_templates()?;
    let mut warmed = 0usize;
    let mut failed = 0usize;

    for name in &names {
        match engine.warm(name.as_str()) {
            Ok(()) => warmed += 1,
            Err(e) => {
                failed += 1;
                eprintln!("error: {name}: {e}");
            }
        }
    }

    if !global.quiet {
        eprintln!("   Warmed {warmed} of {} template(s)", names.len());
    }

    Ok(if failed > 0 { 1 } else { 0 })
}
