//! CLI configuration
//!
//! Values come from the built-in defaults, then an optional TOML file, then
//! `FERRUM_R5__*` environment variables (e.g. `FERRUM_R5__LOGGING__LEVEL=debug`,
//! `FERRUM_R5__MODEL__CHECK_REFERENCE_TYPES=false`).

use anyhow::Context;
use config::{Config, Environment, File};
use ferrum_r5::ModelConfig;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub logging: LoggingConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for the ferrum crates; `RUST_LOG` takes precedence
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

impl CliConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("FERRUM_R5")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.logging.level, "warn");
        assert!(!config.logging.json);
        assert!(config.model.check_reference_types);
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("ferrum-r5-cli-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"\n\n[model]\ncheck_reference_types = false").unwrap();
        drop(file);

        let config = CliConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert!(!config.model.check_reference_types);
        assert!(config.model.pretty_printing);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(CliConfig::load(Some(Path::new("/nonexistent/ferrum-r5.toml"))).is_err());
    }
}
