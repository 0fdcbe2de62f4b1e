//! Application configuration loaded from CLI, environment, and files.
//!
//! Configuration values merge from command-line arguments, environment
//! variables, and configuration files using ortho-config's layered
//! approach, with CLI taking the highest precedence.
//!
//! # Configuration File
//!
//! Place `.gleaner.toml` in the current directory, home directory, or XDG
//! config directory with:
//!
//! ```toml
//! repos = ["jax-ml/jax", "pytorch/pytorch"]
//! token = "ghp_example"
//! output_dir = "scraped_issues"
//! per_page = 100
//! ```

use std::env;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::error::ScrapeError;
use crate::github::locator::RepositorySlug;

/// Operation selected by configuration flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Scrape closed issues/PRs for the configured repositories.
    Scrape,
    /// Concatenate persisted page files into one file per repository.
    MergePages,
    /// Generate summary files from merged data.
    Summarise,
}

const DEFAULT_API_BASE: &str = "https://api.github.com";
const DEFAULT_OUTPUT_DIR: &str = "scraped_issues";
const DEFAULT_PER_PAGE: u32 = 100;
/// Quota held in reserve by the paginator's page fetcher so that a page's
/// sub-resource fetches never start without allowance to finish.
const DEFAULT_PAGE_BUFFER: u32 = 20;

/// Batch-job configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `GLEANER_REPOS` or `--repos`: repositories to process (`owner/name`)
/// - `GLEANER_TOKEN`, `GITHUB_TOKEN`, or `--token`: authentication token
/// - `GLEANER_OUTPUT_DIR` or `--output-dir`: root for persisted state
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "GLEANER",
    discovery(
        dotfile_name = ".gleaner.toml",
        config_file_name = "gleaner.toml",
        app_name = "gleaner"
    )
)]
pub struct GleanerConfig {
    /// Repositories to process, each as `owner/name`.
    #[ortho_config(cli_short = 'r')]
    pub repos: Vec<String>,

    /// Personal access token for GitHub API authentication.
    ///
    /// Falls back to the `GITHUB_TOKEN` environment variable when unset.
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Base URL of the GitHub REST API.
    #[ortho_config()]
    pub api_base: String,

    /// Directory holding the checkpoint, page files, and summaries.
    #[ortho_config(cli_short = 'o')]
    pub output_dir: String,

    /// Records requested per listing page.
    #[ortho_config()]
    pub per_page: u32,

    /// Quota safety buffer for the paginator's page fetcher.
    #[ortho_config()]
    pub page_buffer: u32,

    /// Merges persisted pages instead of scraping.
    #[ortho_config()]
    pub merge: bool,

    /// Generates summaries from merged data instead of scraping.
    #[ortho_config()]
    pub summarise: bool,
}

impl Default for GleanerConfig {
    fn default() -> Self {
        Self {
            repos: Vec::new(),
            token: None,
            api_base: DEFAULT_API_BASE.to_owned(),
            output_dir: DEFAULT_OUTPUT_DIR.to_owned(),
            per_page: DEFAULT_PER_PAGE,
            page_buffer: DEFAULT_PAGE_BUFFER,
            merge: false,
            summarise: false,
        }
    }
}

impl GleanerConfig {
    /// Resolves the token from configuration or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, ScrapeError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .ok_or(ScrapeError::MissingToken)
    }

    /// Parses the configured repository identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Configuration`] when no repositories are
    /// configured and [`ScrapeError::InvalidRepository`] when any identifier
    /// is malformed.
    pub fn repositories(&self) -> Result<Vec<RepositorySlug>, ScrapeError> {
        if self.repos.is_empty() {
            return Err(ScrapeError::Configuration {
                message: "at least one repository is required (use --repos owner/name)".to_owned(),
            });
        }
        self.repos
            .iter()
            .map(|identifier| RepositorySlug::parse(identifier))
            .collect()
    }

    /// Determines the operation mode based on provided flags.
    ///
    /// Merging wins over summarising so the two batch steps can be run in
    /// their natural order from the same configuration file by flipping one
    /// flag at a time.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.merge {
            OperationMode::MergePages
        } else if self.summarise {
            OperationMode::Summarise
        } else {
            OperationMode::Scrape
        }
    }
}
