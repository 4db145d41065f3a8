//! CLI presentation: text and json formatters per command family.

mod config;
mod generation;
mod types;

pub use config::format_config_validation;
pub use generation::{format_generation_json, format_generation_text, GenerationReport};
pub use types::{format_types_json, format_types_text};

use owo_colors::OwoColorize;

/// Section heading in bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}
