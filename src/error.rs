//! Error types for the plot generation client.

use crate::params::PotentialType;
use thiserror::Error;

/// Local input errors, raised before any request leaves the process.
///
/// Every variant names the offending field so the message can be shown
/// next to the input that caused it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field}: value must be a finite number (got {value})")]
    NonFinite { field: String, value: f64 },

    #[error("rMin/rMax: rMin ({r_min}) must be less than rMax ({r_max})")]
    EmptyRange { r_min: f64, r_max: f64 },

    #[error("nGrid: must be a whole number of at least 2 (got {value})")]
    GridPoints { value: f64 },

    #[error("{field}: must be greater than zero (got {value})")]
    NotPositive { field: String, value: f64 },

    #[error("{field}: not a parameter of the {plot_type} potential")]
    UnknownField {
        field: String,
        plot_type: PotentialType,
    },

    #[error("{field}: not a grid field (expected rMin, rMax or nGrid)")]
    UnknownGridField { field: String },
}

impl ValidationError {
    /// Name of the field the error refers to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::NonFinite { field, .. }
            | ValidationError::NotPositive { field, .. }
            | ValidationError::UnknownField { field, .. }
            | ValidationError::UnknownGridField { field } => field,
            ValidationError::EmptyRange { .. } => "rMin/rMax",
            ValidationError::GridPoints { .. } => "nGrid",
        }
    }
}

/// Failure of one generation attempt.
///
/// Cloneable so it can be held by the controller state and handed out in
/// snapshots.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transport error{}: {detail}", status_suffix(.status))]
    Transport { status: Option<u16>, detail: String },

    #[error("Protocol error: {0}")]
    Protocol(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {})", code),
        None => String::new(),
    }
}

impl GenerationError {
    /// HTTP status carried by a transport failure, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            GenerationError::Transport { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, GenerationError::Validation(_))
    }
}

/// Rendering surface errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Render I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize figure: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Render target unavailable: {0}")]
    TargetUnavailable(String),
}

/// Image export errors. Never fatal: callers disable the export action.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Export unavailable: {0}")]
    Unavailable(String),

    #[error("Export failed: {0}")]
    Failed(#[from] RenderError),
}

/// Crate-level error for configuration, logging and command execution.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Client error: {0}")]
    ClientError(String),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Prompt error: {0}")]
    PromptError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
