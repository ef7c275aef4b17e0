//! Implementation of the `stencil export` command.

use crate::project::open_engine;
use crate::{ExportArgs, GlobalArgs};

/// Runs the `stencil export` command.
///
/// Prints the client-side bundle: every template wrapped in a
/// `x-handlebars-template` script tag, plus the partial registry and
/// render-data journal as JS globals.
pub fn run(args: &ExportArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let engine = open_engine(global)?;

    if let Some(folder) = &args.partials {
        let added = engine.add_partials_folder(folder)?;
        if global.verbose {
            eprintln!("Registered {added} partials from '{folder}'");
        }
    }

    println!("{}", engine.export_bundle()?);
    Ok(0)
}
