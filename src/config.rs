//! Configuration System
//!
//! Layered configuration: built-in defaults, then the global config file (or
//! a file named on the command line), then `ONION_*` environment variables.

use crate::commands::ServiceSettings;
use crate::concurrency::FileLock;
use crate::error::OnionError;
use crate::frame::TintPalette;
use crate::logging::LoggingConfig;
use crate::navigation::NavigationSettings;
use crate::types::FULL_OPACITY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnionConfig {
    #[serde(default)]
    pub navigation: NavigationConfig,

    /// Tint layer names and colours
    #[serde(default)]
    pub tint: TintPalette,

    #[serde(default)]
    pub lock: LockConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Neighbours sampled on each side by the auto-context commands
    #[serde(default = "default_radius")]
    pub radius: usize,

    /// Opacity of neighbours shown by fixed-context commands
    #[serde(default = "default_neighbor_opacity")]
    pub neighbor_opacity: f64,
}

fn default_radius() -> usize {
    1
}

fn default_neighbor_opacity() -> f64 {
    25.0
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            neighbor_opacity: default_neighbor_opacity(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LockConfig {
    /// Lock file; defaults to `<cache dir>/onion-layers.lock`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl OnionConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), OnionError> {
        let mut errors = Vec::new();

        if self.navigation.radius == 0 {
            errors.push("navigation.radius must be at least 1".to_string());
        }
        let opacity = self.navigation.neighbor_opacity;
        if !(0.0..=FULL_OPACITY).contains(&opacity) {
            errors.push(format!(
                "navigation.neighbor_opacity {} outside 0..=100",
                opacity
            ));
        }
        if self.tint.prefix.is_empty() {
            errors.push("tint.prefix cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(OnionError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }

    pub fn settings(&self) -> ServiceSettings {
        ServiceSettings {
            navigation: NavigationSettings {
                radius: self.navigation.radius,
                palette: self.tint.clone(),
            },
            neighbor_opacity: self.navigation.neighbor_opacity,
        }
    }

    /// The configured file lock, or the default one under the cache dir.
    pub fn file_lock(&self) -> Result<FileLock, OnionError> {
        match &self.lock.path {
            Some(path) => Ok(FileLock::new(path)),
            None => FileLock::default_path().map(FileLock::new).ok_or_else(|| {
                OnionError::ConfigError("No cache directory for the lock file".to_string())
            }),
        }
    }
}
