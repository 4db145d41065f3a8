//! CLI help and command-name contract for logging and routing.

use crate::cli::parse::{Commands, ConfigCommands};

/// Command name string for log records (e.g. "generate", "config.show").
pub fn command_name(command: &Commands) -> String {
    match command {
        Commands::Generate { .. } => "generate".to_string(),
        Commands::Types { .. } => "types".to_string(),
        Commands::Config { command } => format!("config.{}", config_command_name(command)),
        Commands::Interactive { .. } => "interactive".to_string(),
    }
}

pub fn config_command_name(command: &ConfigCommands) -> &'static str {
    match command {
        ConfigCommands::Show => "show",
        ConfigCommands::Validate => "validate",
    }
}
