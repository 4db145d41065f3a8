//! CLI parse: clap types for potplot. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Potplot CLI - Generate quantum potential plots from a remote plot service
#[derive(Parser)]
#[command(name = "potplot")]
#[command(about = "Generate quantum potential-energy plots from a remote plot service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (for config/config.toml)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, default_value = "false")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate one plot and render it to HTML
    Generate {
        /// Potential type (Morse, Softcore, surface_3d, energy_levels)
        #[arg(long = "type")]
        plot_type: Option<String>,
        /// Grid field override, e.g. --grid rMax=12 (repeatable)
        #[arg(long = "grid", value_name = "KEY=VALUE")]
        grid: Vec<String>,
        /// Potential parameter override, e.g. --param D=80 (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
        /// Plot service base URL (overrides service.base_url)
        #[arg(long)]
        base_url: Option<String>,
        /// Output directory for rendered pages (overrides render.output_dir)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also export an image in this format (png, jpeg, webp, svg)
        #[arg(long)]
        export: Option<String>,
        /// Export width in pixels
        #[arg(long)]
        export_width: Option<u32>,
        /// Export height in pixels
        #[arg(long)]
        export_height: Option<u32>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List potential types and their parameter fields
    Types {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Edit parameters and generate plots interactively
    Interactive {
        /// Output directory for rendered pages (overrides render.output_dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Validate the effective configuration
    Validate,
}
