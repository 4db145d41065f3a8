//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a string for CLI output.
/// Generation failures never reach here; they are reported as command output.
pub fn map_error(e: &ApiError) -> String {
    e.to_string()
}
