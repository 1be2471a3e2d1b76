//! hookdown CLI - Markdown rendering engine.
//!
//! Provides commands for:
//! - `render`: Render a markdown document to HTML
//! - `lines`: Show how rendered blocks map to source lines

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{LinesArgs, RenderArgs};
use output::Output;

/// hookdown - Markdown rendering engine.
#[derive(Parser)]
#[command(name = "hookdown", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render markdown to HTML.
    Render(RenderArgs),
    /// Print the source line range of every rendered block.
    Lines(LinesArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Lines(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
