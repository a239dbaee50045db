//! afrender: batch AlphaFold model download and PyMOL rendering.
//!
//! # Usage
//!
//! ```text
//! afrender run --csv <table> --output-dir <dir> --template <pml> --renderer <pymol> [--cleanup-log] [--json]
//! afrender run --config afrender.yaml
//! afrender check-template --template <pml> [--uid P12345]
//! afrender paths <uid> --output-dir <dir>
//! ```

mod commands;
mod progress;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check_template::CheckTemplateArgs, paths::PathsArgs, run::RunArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "afrender",
    version,
    about = "Download AlphaFold models and render them with PyMOL, one table row at a time",
    long_about = None,
)]
struct Cli {
    /// Log per-record progress to stderr (same as RUST_LOG=info).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Process every row of the input table.
    Run(RunArgs),

    /// Print the control file a template would produce, without running anything.
    CheckTemplate(CheckTemplateArgs),

    /// Print the output paths used for one identifier.
    Paths(PathsArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::CheckTemplate(args) => args.run(),
        Commands::Paths(args) => args.run(),
    }
}

/// Logs go to stderr; stdout carries results only.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
