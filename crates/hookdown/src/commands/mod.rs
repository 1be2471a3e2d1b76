//! CLI command implementations.

pub(crate) mod lines;
pub(crate) mod render;

use std::io::Read;
use std::path::Path;

use hookdown_config::Config;
use hookdown_renderer::EngineOptions;

pub(crate) use lines::LinesArgs;
pub(crate) use render::RenderArgs;

/// Map loaded configuration onto engine options.
pub(crate) fn engine_options_from_config(config: &Config) -> EngineOptions {
    EngineOptions::default()
        .with_background_color(config.hooks.background_color)
        .with_inline_code(config.hooks.inline_code)
        .with_cache_miss_report(config.diagnostics.report_cache_misses)
}

/// Read markdown from `input`, or from stdin when absent or `-`.
pub(crate) fn read_input(input: Option<&Path>) -> std::io::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_engine_options_from_default_config() {
        assert_eq!(
            engine_options_from_config(&Config::default()),
            EngineOptions::default()
        );
    }

    #[test]
    fn test_engine_options_follow_config() {
        let mut config = Config::default();
        config.hooks.inline_code = false;
        config.diagnostics.report_cache_misses = true;

        let options = engine_options_from_config(&config);
        assert!(!options.inline_code);
        assert!(options.background_color);
        assert!(options.report_cache_misses);
    }
}
