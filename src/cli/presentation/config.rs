//! Config command presentation.

use crate::config::ValidationError;
use owo_colors::OwoColorize;

pub fn format_config_validation(result: &Result<(), Vec<ValidationError>>) -> String {
    match result {
        Ok(()) => format!("{} Configuration is valid\n", "✓".green()),
        Err(errors) => {
            let mut output = format!("{} Configuration has {} error(s):\n", "✗".red(), errors.len());
            for error in errors {
                output.push_str(&format!("  - {}\n", error));
            }
            output
        }
    }
}
