//! Stencil CLI — command-line interface for the compiled-template cache.
//!
//! Provides `stencil init` for project scaffolding, `stencil render` for
//! rendering a single template, `stencil list` for template discovery,
//! `stencil warm` for precompiling the persistent cache, `stencil check`
//! for running the invalidation check, and `stencil export` for the
//! client-side template bundle.

#![warn(missing_docs)]

mod check;
mod export;
mod init;
mod list;
mod project;
mod render;
mod warm;

use std::process;

use clap::{Parser, Subcommand};

/// Stencil — a compiled-template cache engine.
#[derive(Parser, Debug)]
#[command(name = "stencil", version, about = "Stencil template engine")]
pub struct Cli {
    /// Suppress progress output; command results still print.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory holding `stencil.toml` (default: current directory).
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new stencil project.
    Init {
        /// Target directory. If omitted, initializes in the current directory.
        dir: Option<String>,
    },
    /// Render a template to stdout.
    Render(RenderArgs),
    /// List every template discovered in the store.
    List,
    /// Precompile every template into the persistent cache.
    Warm(WarmArgs),
    /// Run the invalidation check and report the outcome.
    Check,
    /// Print the client-side export bundle.
    Export(ExportArgs),
}

/// Arguments for the `stencil render` subcommand.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Template name.
    pub name: String,

    /// Inline JSON data record.
    #[arg(long, conflicts_with = "data_file")]
    pub data: Option<String>,

    /// Path to a JSON file holding the data record.
    #[arg(long)]
    pub data_file: Option<String>,

    /// Store folder of partials to register before rendering.
    #[arg(long)]
    pub partials: Option<String>,

    /// Bypass both cache tiers: compile in-process, persist nothing.
    #[arg(long)]
    pub no_cache: bool,
}

/// Arguments for the `stencil warm` subcommand.
#[derive(Parser, Debug)]
pub struct WarmArgs {
    /// Store folder of partials to register before compiling.
    #[arg(long)]
    pub partials: Option<String>,
}

/// Arguments for the `stencil export` subcommand.
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Store folder of partials to register before exporting.
    #[arg(long)]
    pub partials: Option<String>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress progress output.
    pub quiet: bool,
    /// Whether to print verbose information.
    pub verbose: bool,
    /// Optional project directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Init { dir } => init::run(dir, &global),
        Command::Render(ref args) => render::run(args, &global),
        Command::List => list::run(&global),
        Command::Warm(ref args) => warm::run(args, &global),
        Command::Check => check::run(&global),
        Command::Export(ref args) => export::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
