//! Process-wide model configuration
//!
//! Builders and the JSON generator consult [`ModelConfig::current`] at the time they run,
//! so a change made with [`ModelConfig::set`] affects every subsequent build.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

static CONFIG: Lazy<RwLock<ModelConfig>> = Lazy::new(|| RwLock::new(ModelConfig::default()));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Check that references point at one of the resource types an element allows
    pub check_reference_types: bool,

    /// Pretty-print JSON produced by `Display` implementations
    pub pretty_printing: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            check_reference_types: true,
            pretty_printing: true,
        }
    }
}

impl ModelConfig {
    /// Snapshot of the active configuration
    pub fn current() -> ModelConfig {
        *CONFIG.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the active configuration
    pub fn set(config: ModelConfig) {
        let mut guard = CONFIG.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = config;
        tracing::debug!(?config, "model configuration updated");
    }
}
