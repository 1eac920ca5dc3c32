//! Merge rules: defaults, override order.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("navigation.radius", 1)?
        .set_default("navigation.neighbor_opacity", 25.0)?
        .set_default("tint.prefix", "onion-tint-")
}
