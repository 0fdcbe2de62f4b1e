//! Checkpointed scraping of each configured repository.
//!
//! Repositories are processed strictly in sequence with one blocking HTTP
//! request in flight at a time. A failure in one repository is logged and
//! the run moves on to the next; the failing repository resumes from its
//! checkpoint on the next invocation.

use std::io::{self, Write};
use std::time::Duration;

use camino::Utf8PathBuf;
use url::Url;

use gleaner::persistence::PageStore;
use gleaner::retry::RetryPolicy;
use gleaner::scrape::{CheckpointStore, CheckpointedPaginator, ResourceEnricher};
use gleaner::{GleanerConfig, HttpFetcher, PersonalAccessToken, ScrapeError};

use super::output::write_scrape_report;

/// Sub-resource fetchers only wait once the quota is fully exhausted.
const SUB_RESOURCE_BUFFER: u32 = 0;
const RETRY_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(2);
const CHECKPOINT_FILE: &str = "checkpoint.json";

/// Scrapes every configured repository, resuming each from its checkpoint.
///
/// # Errors
///
/// Returns [`ScrapeError::Configuration`] when no repositories are
/// configured, [`ScrapeError::MissingToken`] when no token source provides
/// a value, and otherwise the last per-repository failure so unattended
/// runs exit non-zero when any repository was left incomplete.
pub fn run(config: &GleanerConfig) -> Result<(), ScrapeError> {
    let mut stdout = io::stdout().lock();
    run_to(config, &mut stdout)
}

/// Scrapes every configured repository, reporting progress to `writer`.
///
/// This function is exposed for testing with an in-memory writer.
pub fn run_to<W: Write>(config: &GleanerConfig, writer: &mut W) -> Result<(), ScrapeError> {
    let repositories = config.repositories()?;
    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let api_base =
        Url::parse(&config.api_base).map_err(|error| ScrapeError::InvalidUrl(error.to_string()))?;

    let retry = RetryPolicy::new(RETRY_ATTEMPTS, RETRY_DELAY);
    let page_fetcher = HttpFetcher::new(token.clone(), config.page_buffer)?.with_retry(retry);
    let resource_fetcher = HttpFetcher::new(token, SUB_RESOURCE_BUFFER)?.with_retry(retry);

    let output_root = Utf8PathBuf::from(&config.output_dir);
    let checkpoint = CheckpointStore::new(output_root.join(CHECKPOINT_FILE));
    let pages = PageStore::new(output_root);
    let paginator = CheckpointedPaginator::new(
        &page_fetcher,
        ResourceEnricher::new(&resource_fetcher),
        &checkpoint,
        &pages,
        api_base,
        config.per_page,
    );

    let mut last_error = None;
    for repo in &repositories {
        match paginator.run(repo) {
            Ok(report) => write_scrape_report(writer, repo, &report)?,
            Err(error) => {
                tracing::error!(%repo, %error, "scrape failed; continuing with next repository");
                last_error = Some(error);
            }
        }
    }
    last_error.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use gleaner::{GleanerConfig, ScrapeError};

    use super::run_to;

    #[test]
    fn empty_repository_list_fails_before_any_network_use() {
        let config = GleanerConfig {
            token: Some("ghp_test".to_owned()),
            ..GleanerConfig::default()
        };
        let mut buffer = Vec::new();
        assert!(matches!(
            run_to(&config, &mut buffer),
            Err(ScrapeError::Configuration { .. })
        ));
        assert!(buffer.is_empty());
    }

    #[test]
    fn missing_token_is_reported_as_such() {
        let config = GleanerConfig {
            repos: vec!["jax-ml/jax".to_owned()],
            token: Some(String::new()),
            ..GleanerConfig::default()
        };
        let mut buffer = Vec::new();
        assert!(matches!(
            run_to(&config, &mut buffer),
            Err(ScrapeError::MissingToken)
        ));
    }
}
