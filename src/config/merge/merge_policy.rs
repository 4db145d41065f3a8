//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Only scalar service and render settings are seeded here; nested
/// sections fall back to their serde defaults.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("service.base_url", "http://localhost:8080/api")?
        .set_default("service.connect_timeout_secs", 10)?
        .set_default("render.height", 600)?
        .set_default("render.output_dir", "plots")
}
