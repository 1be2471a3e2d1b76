//! `hookdown lines` command implementation.

use std::fmt::Write;
use std::path::PathBuf;

use clap::Args;
use hookdown_config::Config;
use hookdown_renderer::{Engine, LineMap};

use super::{engine_options_from_config, read_input};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the lines command.
#[derive(Args)]
pub(crate) struct LinesArgs {
    /// Markdown file to inspect (default: stdin).
    input: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover hookdown.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl LinesArgs {
    /// Execute the lines command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        let markdown = read_input(self.input.as_deref())?;
        let mut engine = Engine::new(engine_options_from_config(&config))?;
        let result = engine.render(&markdown);

        output.document(&format_line_map(&result.line_map))?;
        Ok(())
    }
}

/// One row per block: index, 1-based inclusive source range, line count.
fn format_line_map(map: &LineMap) -> String {
    let mut out = String::new();
    for block in map.blocks() {
        let _ = writeln!(
            out,
            "{:>4}  {:>5}-{:<5}  {}",
            block.index,
            block.start_line + 1,
            block.end_line(),
            block.lines
        );
    }
    let _ = write!(out, "total {}", map.total_lines());
    out
}
