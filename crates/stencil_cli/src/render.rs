//! Implementation of the `stencil render` command.

use serde_json::Value;

use crate::project::open_engine;
use crate::{GlobalArgs, RenderArgs};

/// Runs the `stencil render` command.
///
/// Renders one template with the supplied data record and prints the output
/// to stdout. `--no-cache` uses the bypass path, persisting nothing.
pub fn run(args: &RenderArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let engine = open_engine(global)?;

    if let Some(folder) = &args.partials {
        let added = engine.add_partials_folder(folder)?;
        if global.verbose {
            eprintln!("Registered {added} partials from '{folder}'");
        }
    }

    let data = load_data(args)?;
    let output = engine.render_with(&args.name, data.as_ref(), !args.no_cache)?;

    println!("{output}");
    Ok(0)
}

/// Parses the data record from `--data` or `--data-file`.
fn load_data(args: &RenderArgs) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if let Some(inline) = &args.data {
        let value = serde_json::from_str(inline)
            .map_err(|e| format!("invalid --data JSON: {e}"))?;
        return Ok(Some(value));
    }
    if let Some(path) = &args.data_file {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("cannot read data file '{path}': {e}"))?;
        let value = serde_json::from_str(&content)
            .map_err(|e| format!("invalid JSON in '{path}': {e}"))?;
        return Ok(Some(value));
    }
    Ok(None)
}
