//! CLI route: single route table and run context. Dispatches to the plot
//! session and presentation.

use crate::cli::help::command_name;
use crate::cli::interactive;
use crate::cli::parse::{Commands, ConfigCommands};
use crate::cli::presentation::{
    format_config_validation, format_generation_json, format_generation_text,
    format_types_json, format_types_text, GenerationReport,
};
use crate::config::{ConfigLoader, PlotConfig};
use crate::controller::GenerationState;
use crate::error::ApiError;
use crate::params::{Container, PotentialType};
use crate::render::ImageFormat;
use crate::session::PlotSession;
use std::path::PathBuf;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::info;

/// Text to print plus whether the command reached its goal.
#[derive(Debug)]
pub struct CommandOutput {
    pub text: String,
    pub success: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Runtime context for CLI execution: loaded configuration and the async
/// runtime generation runs on.
pub struct RunContext {
    config: PlotConfig,
    runtime: Runtime,
}

impl RunContext {
    /// Create run context from workspace root and optional config path.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::with_config(config)
    }

    pub fn with_config(config: PlotConfig) -> Result<Self, ApiError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to start async runtime: {}", e)))?;
        Ok(Self { config, runtime })
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<CommandOutput, ApiError> {
        let started = Instant::now();
        let result = match command {
            Commands::Generate {
                plot_type,
                grid,
                params,
                base_url,
                out,
                export,
                export_width,
                export_height,
                format,
            } => self.handle_generate(GenerateArgs {
                plot_type: plot_type.as_deref(),
                grid,
                params,
                base_url: base_url.as_deref(),
                out: out.clone(),
                export: export.as_deref(),
                export_width: *export_width,
                export_height: *export_height,
                format,
            }),
            Commands::Types { format } => Ok(CommandOutput::ok(if format == "json" {
                format_types_json()
            } else {
                format_types_text()
            })),
            Commands::Config { command } => self.handle_config(command),
            Commands::Interactive { out } => {
                let session = self.session(&self.config, out.clone())?;
                interactive::run(&self.runtime, session).map(CommandOutput::ok)
            }
        };
        info!(
            command = command_name(command),
            duration_ms = started.elapsed().as_millis() as u64,
            ok = result.as_ref().map(|o| o.success).unwrap_or(false),
            "Command finished"
        );
        result
    }

    fn session(&self, config: &PlotConfig, out: Option<PathBuf>) -> Result<PlotSession, ApiError> {
        if let Err(errors) = config.validate() {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            return Err(ApiError::ConfigError(messages.join("; ")));
        }
        PlotSession::from_config(config, out)
    }

    fn handle_generate(&self, args: GenerateArgs<'_>) -> Result<CommandOutput, ApiError> {
        let mut config = self.config.clone();
        if let Some(url) = args.base_url {
            config.service.base_url = url.to_string();
        }
        let mut session = self.session(&config, args.out)?;

        if let Some(name) = args.plot_type {
            let plot_type: PotentialType = name.parse().map_err(ApiError::ConfigError)?;
            session.select_type(plot_type);
        }
        for assignment in args.grid {
            let (key, value) = parse_assignment(assignment)?;
            session.set_field_text(Container::Grid, key, value)?;
        }
        for assignment in args.params {
            let (key, value) = parse_assignment(assignment)?;
            session.set_field_text(Container::Potential, key, value)?;
        }
        let export_format = args
            .export
            .map(|f| f.parse::<ImageFormat>().map_err(ApiError::ConfigError))
            .transpose()?;

        let state = self.runtime.block_on(session.generate());

        let export = export_format.map(|format| {
            let export_config = &config.render.export;
            session.export_image(
                format,
                args.export_width.unwrap_or(export_config.width),
                args.export_height.unwrap_or(export_config.height),
            )
        });

        let report = GenerationReport {
            plot_type: session.model().plot_type(),
            endpoint: &config.service.base_url,
            state: &state,
            target: session.adapter().target(),
            export: export.as_ref(),
        };
        let text = if args.format == "json" {
            format_generation_json(&report)
        } else {
            format_generation_text(&report)
        };
        Ok(CommandOutput {
            text,
            success: matches!(state, GenerationState::Success { .. }),
        })
    }

    fn handle_config(&self, command: &ConfigCommands) -> Result<CommandOutput, ApiError> {
        match command {
            ConfigCommands::Show => Ok(CommandOutput::ok(self.config.to_toml()?)),
            ConfigCommands::Validate => {
                let result = self.config.validate();
                Ok(CommandOutput {
                    text: format_config_validation(&result),
                    success: result.is_ok(),
                })
            }
        }
    }
}

struct GenerateArgs<'a> {
    plot_type: Option<&'a str>,
    grid: &'a [String],
    params: &'a [String],
    base_url: Option<&'a str>,
    out: Option<PathBuf>,
    export: Option<&'a str>,
    export_width: Option<u32>,
    export_height: Option<u32>,
    format: &'a str,
}

/// Split a `KEY=VALUE` override. The value is kept as text so that the
/// parameter model decides how to parse it.
pub fn parse_assignment(assignment: &str) -> Result<(&str, &str), ApiError> {
    let (key, value) = assignment.split_once('=').ok_or_else(|| {
        ApiError::ConfigError(format!(
            "Expected KEY=VALUE, got '{}'",
            assignment
        ))
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ApiError::ConfigError(format!(
            "Missing key in '{}'",
            assignment
        )));
    }
    Ok((key, value.trim()))
}
