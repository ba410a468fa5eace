//! Command implementations

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, CommandFactory};
use clap_complete::Shell;
use lg_core::{Catalog, Config, ConfigManager, MemoryCatalog, RetryingCatalog};
use lg_s3::ListObjects;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};
use crate::{Cli, Commands};

pub mod ls;
pub mod serve;

/// Generate shell completions
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: Shell,
}

/// Execute the parsed command line
pub async fn execute(cli: Cli, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config);

    if let Commands::Completions(args) = &cli.command {
        clap_complete::generate(
            args.shell,
            &mut Cli::command(),
            "lakegate",
            &mut std::io::stdout(),
        );
        return ExitCode::Success;
    }

    let config = match load_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&format!("{e:#}"));
            return exit_code_for(&e);
        }
    };

    match cli.command {
        Commands::Serve(args) => serve::execute(args, &config, output_config).await,
        Commands::Ls(args) => ls::execute(args, &config, output_config).await,
        Commands::Config => show_config(&config, &formatter),
        Commands::Completions(_) => ExitCode::Success,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    tracing::debug!(path = %manager.path().display(), "Loading configuration");
    manager
        .load()
        .with_context(|| format!("Failed to load config from {}", manager.path().display()))
}

/// Build the catalog described by `config`, wrapped with the retry policy
pub(crate) fn build_catalog(config: &Config) -> anyhow::Result<Arc<dyn Catalog>> {
    let catalog = match &config.catalog.seed {
        Some(seed) => MemoryCatalog::load(seed)
            .with_context(|| format!("Failed to load catalog seed {}", seed.display()))?,
        None => MemoryCatalog::new(),
    };
    Ok(Arc::new(RetryingCatalog::new(
        catalog,
        config.catalog.retry.clone(),
    )))
}

/// Build the listing handler for `config`
pub(crate) fn build_handler(config: &Config) -> anyhow::Result<ListObjects> {
    let catalog = build_catalog(config)?;
    Ok(ListObjects::new(catalog).with_max_keys(config.listing.max_keys))
}

/// Map a setup failure to a process exit code
pub(crate) fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<lg_core::Error>() {
        Some(lg_core::Error::Io(io)) if io.kind() == std::io::ErrorKind::NotFound => {
            ExitCode::NotFound
        }
        Some(lg_core::Error::Io(_)) => ExitCode::GeneralError,
        Some(_) => ExitCode::ConfigError,
        None => ExitCode::GeneralError,
    }
}

fn show_config(config: &Config, formatter: &Formatter) -> ExitCode {
    if formatter.is_json() {
        formatter.json(config);
        return ExitCode::Success;
    }

    let seed = config
        .catalog
        .seed
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none)".to_string());
    let retry = &config.catalog.retry;

    let rows = [
        ("server.listen", config.server.listen.clone()),
        ("listing.max_keys", config.listing.max_keys.to_string()),
        ("catalog.seed", seed),
        ("catalog.retry.max_attempts", retry.max_attempts.to_string()),
        (
            "catalog.retry.initial_backoff_ms",
            retry.initial_backoff_ms.to_string(),
        ),
        (
            "catalog.retry.max_backoff_ms",
            retry.max_backoff_ms.to_string(),
        ),
    ];
    for (key, value) in rows {
        formatter.println(&format!("{} = {value}", formatter.style_key(key)));
    }
    ExitCode::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_build_catalog_without_seed() {
        let config = Config::default();
        assert!(build_catalog(&config).is_ok());
    }

    #[test]
    fn test_missing_seed_is_not_found() {
        let mut config = Config::default();
        config.catalog.seed = Some("/nonexistent/lakegate/seed.toml".into());
        let err = build_catalog(&config).err().expect("missing seed must fail");
        assert_eq!(exit_code_for(&err), ExitCode::NotFound);
    }

    #[test]
    fn test_malformed_seed_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "repositories = 42").unwrap();

        let mut config = Config::default();
        config.catalog.seed = Some(file.path().to_path_buf());
        let err = build_catalog(&config).err().expect("malformed seed must fail");
        assert_eq!(exit_code_for(&err), ExitCode::ConfigError);
    }

    #[test]
    fn test_handler_uses_configured_max_keys() {
        let mut config = Config::default();
        config.listing.max_keys = 25;
        let handler = build_handler(&config).unwrap();
        assert_eq!(handler.max_keys(), 25);
    }
}
