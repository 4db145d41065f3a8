//! Config loader: assembles sources in precedence order and deserializes
//! the result into [`PlotConfig`].

use super::merge::merge_policy;
use super::sources::{global_file, workspace_file};
use super::PlotConfig;
use crate::error::ApiError;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use std::path::Path;
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// files, `POTPLOT_<SECTION>__<KEY>` environment variables.
    pub fn load(workspace_root: &Path) -> Result<PlotConfig, ApiError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        debug!(workspace = %workspace_root.display(), "Loading configuration");
        Self::finish(builder)
    }

    /// Load configuration from a single file on top of the defaults.
    /// Environment overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<PlotConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<PlotConfig, ApiError> {
        let config = builder
            .add_source(
                Environment::with_prefix("POTPLOT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        let config: PlotConfig = config.try_deserialize()?;
        Ok(config)
    }
}
