//! lakegate - S3-compatible listing gateway for a branch-addressed data lake

mod commands;
mod exit_code;
mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::exit_code::ExitCode;
use crate::output::OutputConfig;

/// S3-compatible listing gateway for a branch-addressed data lake
#[derive(Parser, Debug)]
#[command(name = "lakegate", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/lakegate/config.toml)
    #[arg(long, global = true, env = "LAKEGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP gateway
    Serve(commands::serve::ServeArgs),

    /// Run one listing request and print the result
    Ls(commands::ls::LsArgs),

    /// Show the effective configuration
    Config,

    /// Generate shell completions
    Completions(commands::CompletionsArgs),
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output_config = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        quiet: cli.quiet,
    };

    let code = commands::execute(cli, output_config).await;
    code.into()
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}
