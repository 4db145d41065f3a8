//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to the plot session.

mod help;
mod interactive;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, ConfigCommands};
pub use presentation::{
    format_config_validation, format_generation_json, format_generation_text,
    format_types_json, format_types_text, GenerationReport,
};
pub use route::{parse_assignment, CommandOutput, RunContext};
