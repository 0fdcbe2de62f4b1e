//! Gleaner CLI entrypoint for scraping, merging, and summarising closed
//! GitHub issues and pull requests.

use std::io::{self, Write};
use std::process::ExitCode;

use gleaner::{GleanerConfig, OperationMode, ScrapeError};
use ortho_config::OrthoConfig;
use tracing_subscriber::EnvFilter;

mod cli;

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ScrapeError> {
    let config = load_config()?;
    match config.operation_mode() {
        OperationMode::Scrape => cli::scrape::run(&config),
        OperationMode::MergePages => cli::merge::run(&config),
        OperationMode::Summarise => cli::summaries::run(&config),
    }
}

/// Routes structured logs to stderr, honouring `RUST_LOG` when set.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ScrapeError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<GleanerConfig, ScrapeError> {
    GleanerConfig::load().map_err(|error| ScrapeError::Configuration {
        message: error.to_string(),
    })
}
