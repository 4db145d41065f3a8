//! Workspace config files: `config/config.toml`, then `config/<env>.toml`
//! for the environment named by `POTPLOT_ENV` (default `development`).

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_VAR: &str = "POTPLOT_ENV";
const DEFAULT_ENV: &str = "development";

/// Active environment name. Must be a bare file stem.
pub fn active_environment() -> Result<String, ConfigError> {
    let name = std::env::var(ENV_VAR).unwrap_or_else(|_| DEFAULT_ENV.to_string());
    let name = name.trim();
    if name.is_empty() {
        return Ok(DEFAULT_ENV.to_string());
    }
    if name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(ConfigError::Message(format!(
            "{} must be a plain name, got '{}'",
            ENV_VAR, name
        )));
    }
    Ok(name.to_string())
}

/// Workspace config files that exist, lowest precedence first.
pub fn existing_files(workspace_root: &Path, env_name: &str) -> Vec<PathBuf> {
    let config_dir = workspace_root.join("config");
    [
        config_dir.join("config.toml"),
        config_dir.join(format!("{}.toml", env_name)),
    ]
    .into_iter()
    .filter(|path| path.is_file())
    .collect()
}

pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let env_name = active_environment()?;
    for path in existing_files(workspace_root, &env_name) {
        debug!(config_path = %path.display(), env = %env_name, "Adding workspace configuration");
        builder = builder.add_source(File::from(path).required(false));
    }
    Ok(builder)
}
