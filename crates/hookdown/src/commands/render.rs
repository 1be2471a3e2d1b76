//! `hookdown render` command implementation.

use std::path::PathBuf;

use clap::Args;
use hookdown_config::{CliSettings, Config};
use hookdown_renderer::Engine;

use super::{engine_options_from_config, read_input};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (default: stdin).
    input: Option<PathBuf>,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover hookdown.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not register the `!!!color text!!!` hook.
    #[arg(long)]
    no_background_color: bool,

    /// Do not register the inline code hook.
    #[arg(long)]
    no_inline_code: bool,

    /// Warn when placeholders restore without a cached fragment.
    #[arg(long)]
    report_cache_misses: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the input can't be read or
    /// the output can't be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let markdown = read_input(self.input.as_deref())?;
        let mut engine = Engine::new(engine_options_from_config(&config))?;
        let result = engine.render(&markdown);
        tracing::info!(
            blocks = result.line_map.len(),
            lines = result.line_map.total_lines(),
            cache_misses = result.cache_misses,
            "Rendered document"
        );

        match &self.output {
            Some(path) => {
                std::fs::write(path, &result.html)?;
                output.info(&format!("Wrote {}", path.display()));
            }
            None => output.document(&result.html)?,
        }

        Ok(())
    }

    /// Collect flag overrides; absent flags leave config values alone.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            background_color: self.no_background_color.then_some(false),
            inline_code: self.no_inline_code.then_some(false),
            report_cache_misses: self.report_cache_misses.then_some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: RenderArgs,
    }

    fn parse(argv: &[&str]) -> RenderArgs {
        TestCli::parse_from(std::iter::once("hookdown").chain(argv.iter().copied())).args
    }

    #[test]
    fn test_cli_settings_default() {
        let settings = parse(&[]).cli_settings();
        assert_eq!(settings.background_color, None);
        assert_eq!(settings.inline_code, None);
        assert_eq!(settings.report_cache_misses, None);
    }

    #[test]
    fn test_cli_settings_flags() {
        let settings = parse(&["--no-inline-code", "--report-cache-misses"]).cli_settings();
        assert_eq!(settings.background_color, None);
        assert_eq!(settings.inline_code, Some(false));
        assert_eq!(settings.report_cache_misses, Some(true));
    }

    #[test]
    fn test_no_cache_flag_rejected() {
        let result = TestCli::try_parse_from(["hookdown", "--no-cache"]);
        assert!(result.is_err());
    }
}
