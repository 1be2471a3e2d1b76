//! Configuration management for hookdown.
//!
//! Parses `hookdown.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [hooks]
//! background_color = true
//! inline_code = true
//!
//! [diagnostics]
//! report_cache_misses = false
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override background color hook registration.
    pub background_color: Option<bool>,
    /// Override inline code hook registration.
    pub inline_code: Option<bool>,
    /// Override cache miss reporting.
    pub report_cache_misses: Option<bool>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "hookdown.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Optional hooks.
    pub hooks: HooksConfig,
    /// Diagnostics configuration.
    pub diagnostics: DiagnosticsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Optional hook registration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HooksConfig {
    /// Register the `!!!color text!!!` hook.
    pub background_color: bool,
    /// Register the inline code hook.
    pub inline_code: bool,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            background_color: true,
            inline_code: true,
        }
    }
}

/// Diagnostics configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosticsConfig {
    /// Warn once per render when placeholders restore without a fragment.
    pub report_cache_misses: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `hookdown.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(background_color) = settings.background_color {
            self.hooks.background_color = background_color;
        }
        if let Some(inline_code) = settings.inline_code {
            self.hooks.inline_code = inline_code;
        }
        if let Some(report_cache_misses) = settings.report_cache_misses {
            self.diagnostics.report_cache_misses = report_cache_misses;
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }
}

/// Search for a config file in `start` and its parents.
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.hooks.background_color);
        assert!(config.hooks.inline_code);
        assert!(!config.diagnostics.report_cache_misses);
        assert_eq!(config.config_path, None);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.hooks.background_color);
        assert!(config.hooks.inline_code);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r"
[hooks]
background_color = false
inline_code = false

[diagnostics]
report_cache_misses = true
";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.hooks.background_color);
        assert!(!config.hooks.inline_code);
        assert!(config.diagnostics.report_cache_misses);
    }

    #[test]
    fn test_parse_partial_section_keeps_defaults() {
        let config: Config = toml::from_str("[hooks]\ninline_code = false\n").unwrap();
        assert!(config.hooks.background_color);
        assert!(!config.hooks.inline_code);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<Config, _> = toml::from_str("[hooks]\ncolour = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_render_section_rejected() {
        let result: Result<Config, _> = toml::from_str("[render]\ncache = false\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[hooks]\ninline_code = false\n");

        let config = Config::load(Some(&path), None).unwrap();
        assert!(!config.hooks.inline_code);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[hooks]\nunknown = 1\n");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_apply_cli_settings_hooks() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[hooks]\nbackground_color = true\n");
        let settings = CliSettings {
            background_color: Some(false),
            inline_code: Some(false),
            ..CliSettings::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert!(!config.hooks.background_color);
        assert!(!config.hooks.inline_code);
    }

    #[test]
    fn test_apply_cli_settings_report_cache_misses() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "");
        let settings = CliSettings {
            report_cache_misses: Some(true),
            ..CliSettings::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert!(config.diagnostics.report_cache_misses);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "[hooks]\ninline_code = false\n");

        let config = Config::load(Some(&path), Some(&CliSettings::default())).unwrap();
        assert!(!config.hooks.inline_code);
        assert!(config.hooks.background_color);
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = TempDir::new().unwrap();
        let path = write_config(dir.path(), "");
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(discover_config(&nested), Some(path));
    }

    #[test]
    fn test_discover_config_prefers_nearest() {
        let dir = TempDir::new().unwrap();
        write_config(dir.path(), "");
        let nested = dir.path().join("sub");
        std::fs::create_dir_all(&nested).unwrap();
        let nearest = write_config(&nested, "");

        assert_eq!(discover_config(&nested), Some(nearest));
    }
}
