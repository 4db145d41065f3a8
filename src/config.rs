//! Configuration System
//!
//! Layered configuration for the plot client: built-in defaults, the user's
//! global config file, workspace config files, then `POTPLOT_*` environment
//! overrides.

use crate::logging::LoggingConfig;
use crate::params::{GridInput, ParameterSet, PotentialType};
use crate::render::ImageFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Remote plot service
    #[serde(default)]
    pub service: ServiceConfig,

    /// Initial parameter model
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Rendering and export
    #[serde(default)]
    pub render: RenderConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Overall request deadline; unset means no deadline
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_plot_type")]
    pub plot_type: PotentialType,

    #[serde(default)]
    pub grid: GridInput,

    #[serde(default)]
    pub parameters: ParameterSet,
}

fn default_plot_type() -> PotentialType {
    PotentialType::Morse
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            plot_type: default_plot_type(),
            grid: GridInput::default(),
            parameters: ParameterSet::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Fixed plot height merged into layouts that do not set one
    #[serde(default = "default_plot_height")]
    pub height: u32,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_plotly_src")]
    pub plotly_src: String,

    #[serde(default)]
    pub export: ExportConfig,
}

fn default_plot_height() -> u32 {
    600
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("plots")
}

fn default_plotly_src() -> String {
    "https://cdn.plot.ly/plotly-2.35.2.min.js".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            height: default_plot_height(),
            output_dir: default_output_dir(),
            plotly_src: default_plotly_src(),
            export: ExportConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_format")]
    pub format: ImageFormat,

    #[serde(default = "default_export_width")]
    pub width: u32,

    #[serde(default = "default_export_height")]
    pub height: u32,

    #[serde(default = "default_export_scale")]
    pub scale: f64,

    /// Prefix of programmatic export file names (`<prefix>_<unix millis>`)
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,

    /// File name offered by the plot toolbar's download button
    #[serde(default = "default_toolbar_filename")]
    pub toolbar_filename: String,
}

fn default_export_format() -> ImageFormat {
    ImageFormat::Png
}

fn default_export_width() -> u32 {
    1200
}

fn default_export_height() -> u32 {
    800
}

fn default_export_scale() -> f64 {
    2.0
}

fn default_filename_prefix() -> String {
    "plot".to_string()
}

fn default_toolbar_filename() -> String {
    "quantum_plot".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: default_export_format(),
            width: default_export_width(),
            height: default_export_height(),
            scale: default_export_scale(),
            filename_prefix: default_filename_prefix(),
            toolbar_filename: default_toolbar_filename(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Service(String),
    Render(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Service(msg) => write!(f, "Service: {}", msg),
            ValidationError::Render(msg) => write!(f, "Render: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ServiceConfig {
    pub fn validate(&self) -> Result<(), String> {
        let base_url = self.base_url.trim();
        if base_url.is_empty() {
            return Err("base_url cannot be empty".to_string());
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(format!(
                "base_url '{}' must start with http:// or https://",
                base_url
            ));
        }
        if self.request_timeout_secs == Some(0) {
            return Err("request_timeout_secs must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.height == 0 {
            return Err("height must be greater than zero".to_string());
        }
        if self.export.width == 0 || self.export.height == 0 {
            return Err("export width and height must be greater than zero".to_string());
        }
        if !(self.export.scale.is_finite() && self.export.scale > 0.0) {
            return Err("export scale must be a positive number".to_string());
        }
        for (key, name) in [
            ("filename_prefix", &self.export.filename_prefix),
            ("toolbar_filename", &self.export.toolbar_filename),
        ] {
            if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
                return Err(format!(
                    "export {} '{}' must be a plain file name",
                    key, name
                ));
            }
        }
        Ok(())
    }
}

impl PlotConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.service.validate() {
            errors.push(ValidationError::Service(e));
        }
        if let Err(e) = self.render.validate() {
            errors.push(ValidationError::Render(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Effective configuration rendered as TOML
    pub fn to_toml(&self) -> Result<String, crate::error::ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::error::ApiError::ConfigError(format!("{}", e)))
    }
}
