//! Implementation of the `stencil list` command.

use crate::project::open_engine;
use crate::GlobalArgs;

/// Runs the `stencil list` command.
///
/// Prints every discovered template name, one per line.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let engine = open_engine(global)?;
    let names = engine.list_templates()?;

    if !global.quiet {
        eprintln!(
            "   {} template(s) in {}",
            names.len(),
            engine.config().templates_dir.display()
        );
    }
    for name in names {
        println!("{name}");
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn list_succeeds_on_seeded_project() {
        let dir = TempDir::new().unwrap();
        let templates = dir.path().join("templates");
        fs::create_dir_all(templates.join("widgets")).unwrap();
        fs::write(templates.join("index.hbs"), "x").unwrap();
        fs::write(templates.join("widgets").join("row.hbs"), "y").unwrap();

        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(dir.path().to_string_lossy().into_owned()),
        };
        assert_eq!(run(&global).unwrap(), 0);
    }

    #[test]
    fn list_succeeds_on_empty_project() {
        let dir = TempDir::new().unwrap();
        let global = GlobalArgs {
            quiet: true,
            verbose: false,
            config: Some(dir.path().to_string_lossy().into_owned()),
        };
        assert_eq!(run(&global).unwrap(), 0);
    }
}
