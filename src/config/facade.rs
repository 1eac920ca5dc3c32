//! Loading entry point over the merge policy and the individual sources.

use super::merge::builder_with_defaults;
use super::sources::{environment, explicit_file, global_file};
use super::OnionConfig;
use crate::error::OnionError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads and validates [`OnionConfig`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then `explicit` or the global file, then environment.
    pub fn load(explicit: Option<&Path>) -> Result<OnionConfig, OnionError> {
        let mut builder = builder_with_defaults()?;
        builder = match explicit {
            Some(path) => explicit_file::add_to_builder(builder, path)?,
            None => global_file::add_to_builder(builder)?,
        };
        builder = environment::add_to_builder(builder);

        let config: OnionConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(config = ?config, "Loaded configuration");
        Ok(config)
    }

    /// Defaults plus a single file, without environment overrides.
    pub fn load_from_file(path: &Path) -> Result<OnionConfig, OnionError> {
        let builder = explicit_file::add_to_builder(builder_with_defaults()?, path)?;
        let config: OnionConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Where the global config file is looked up.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
