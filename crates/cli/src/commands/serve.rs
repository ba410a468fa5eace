//! serve command - Run the HTTP gateway
//!
//! Binds the configured address and answers ListObjects requests until
//! interrupted.

use std::sync::Arc;

use clap::Args;
use lg_core::Config;
use tokio::net::TcpListener;

use super::{build_handler, exit_code_for};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Run the HTTP gateway
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides server.listen)
    #[arg(short, long)]
    pub listen: Option<String>,
}

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: &Config, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let handler = match build_handler(config) {
        Ok(h) => Arc::new(h),
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            return exit_code_for(&e);
        }
    };

    if config.catalog.seed.is_none() {
        formatter.warning("No catalog seed configured, serving an empty catalog");
    }

    let listen = args.listen.as_deref().unwrap_or(&config.server.listen);
    let listener = match TcpListener::bind(listen).await {
        Ok(l) => l,
        Err(e) => {
            formatter.error(&format!("Failed to bind {listen}: {e}"));
            return ExitCode::NetworkError;
        }
    };

    let addr = listener
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| listen.to_string());
    formatter.success(&format!(
        "Serving ListObjects on http://{}",
        formatter.style_name(&addr)
    ));

    if let Err(e) = lg_s3::serve(listener, handler, shutdown_signal()).await {
        formatter.error(&format!("Server error: {e}"));
        return ExitCode::NetworkError;
    }

    tracing::info!("lakegate stopped");
    ExitCode::Success
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
