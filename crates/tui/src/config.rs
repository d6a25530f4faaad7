use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::core::{HttpTaskClient, MemoryTaskApi, TaskApi};

pub use crate::core::config::*;

const DEFAULT_LOG_FILTER: &str = "info";

pub fn from_cli(cli: &Cli) -> Result<ApiConfig> {
    ApiConfig::discover(cli.api_url.clone(), cli.timeout)
}

/// The task backend the session talks to: the remote API, or sample data for `--demo`.
pub fn connect(cli: &Cli, config: &ApiConfig) -> Result<Arc<dyn TaskApi>> {
    if cli.demo {
        tracing::info!("using in-memory sample tasks");
        return Ok(Arc::new(MemoryTaskApi::with_sample_tasks()));
    }
    let client = HttpTaskClient::new(config).context("failed to build the HTTP client")?;
    tracing::info!(base_url = %client.base_url(), "using remote task API");
    Ok(Arc::new(client))
}

fn env_filter(directive: Option<&str>) -> Result<EnvFilter> {
    let directive = directive.unwrap_or(DEFAULT_LOG_FILTER);
    let directive: Directive = directive
        .parse()
        .with_context(|| format!("invalid log directive `{directive}`"))?;
    Ok(EnvFilter::builder()
        .with_default_directive(directive)
        .from_env_lossy())
}

/// Scripted commands log to stderr so stdout stays clean for their output.
pub fn init_stderr_tracing(cli: &Cli) -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(cli.log_filter.as_deref())?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
    Ok(())
}

/// The terminal owns stdout, so the TUI only logs when given a file.
pub fn init_tui_tracing(cli: &Cli) -> Result<()> {
    let Some(path) = cli.log_file.as_ref() else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(cli.log_filter.as_deref())?)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn invalid_directive_is_reported() {
        assert!(env_filter(Some("info")).is_ok());
        assert!(env_filter(Some("taskdesk=loud")).is_err());
    }

    #[test]
    fn api_url_flag_wins() {
        let cli = Cli::parse_from(["taskdesk", "--api-url", "https://tasks.example.com/api", "--timeout", "5"]);
        let config = from_cli(&cli).unwrap();
        assert_eq!(config.base_url().as_str(), "https://tasks.example.com/api");
        assert_eq!(config.timeout(), Some(std::time::Duration::from_secs(5)));
    }

    #[test]
    fn demo_uses_sample_tasks() {
        let cli = Cli::parse_from(["taskdesk", "--demo"]);
        let config = ApiConfig::default();
        assert!(connect(&cli, &config).is_ok());
    }
}
