//! Page-by-page traversal of a repository's closed-issues endpoint.
//!
//! Each cycle fetches one page, enriches every record in received order,
//! persists the whole page file, and only then advances the checkpoint to
//! the next page. A crash between persisting and advancing re-fetches and
//! overwrites that page on resume; page files are keyed by page number, so
//! the overwrite is idempotent. A fetch failure ends the run with the
//! checkpoint still pointing at the failed page (at-least-once, never-skip).

use url::Url;

use crate::github::error::ScrapeError;
use crate::github::fetch::Fetcher;
use crate::github::locator::RepositorySlug;
use crate::github::models::IssueRecord;
use crate::persistence::PageStore;

use super::checkpoint::CheckpointStore;
use super::enrich::ResourceEnricher;

/// What one paginator run accomplished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    /// Pages fetched, enriched, and persisted.
    pub pages: u32,
    /// Records across those pages.
    pub records: usize,
}

/// Drives checkpointed scraping of one repository at a time.
///
/// `P` fetches listing pages (configured with the larger quota buffer);
/// `S` fetches per-record sub-resources.
pub struct CheckpointedPaginator<'deps, P: Fetcher, S: Fetcher> {
    page_fetcher: &'deps P,
    enricher: ResourceEnricher<'deps, S>,
    checkpoint: &'deps CheckpointStore,
    pages: &'deps PageStore,
    api_base: Url,
    per_page: u32,
}

impl<'deps, P: Fetcher, S: Fetcher> CheckpointedPaginator<'deps, P, S> {
    /// Assembles a paginator from its injected collaborators.
    #[must_use]
    pub const fn new(
        page_fetcher: &'deps P,
        enricher: ResourceEnricher<'deps, S>,
        checkpoint: &'deps CheckpointStore,
        pages: &'deps PageStore,
        api_base: Url,
        per_page: u32,
    ) -> Self {
        Self {
            page_fetcher,
            enricher,
            checkpoint,
            pages,
            api_base,
            per_page,
        }
    }

    /// Scrapes the repository from its checkpoint until an empty page.
    ///
    /// Designed to be re-invoked after a failure or crash: the next run
    /// resumes from the checkpoint without refetching completed pages.
    ///
    /// # Errors
    ///
    /// Returns the page-level [`ScrapeError`] that ended the run: a fetch or
    /// decode failure on the listing endpoint, or a persistence failure
    /// writing the page or checkpoint. Per-record enrichment failures never
    /// end a run.
    pub fn run(&self, repo: &RepositorySlug) -> Result<ScrapeReport, ScrapeError> {
        let start_page = self.checkpoint.next_page(repo)?;
        let mut page = start_page;
        let mut report = ScrapeReport::default();

        loop {
            let url = repo.closed_issues_url(&self.api_base, self.per_page, page)?;
            let body = self.page_fetcher.fetch_json(&url)?;
            let mut records: Vec<IssueRecord> =
                serde_json::from_value(body).map_err(|error| ScrapeError::MalformedResponse {
                    url: url.to_string(),
                    message: error.to_string(),
                })?;

            if records.is_empty() {
                tracing::info!(repo = %repo, page, "no more pages");
                break;
            }

            for record in &mut records {
                self.enricher.enrich(record);
            }

            self.pages.write_page(repo, page, &records)?;
            self.checkpoint.advance(repo, page + 1)?;

            tracing::info!(repo = %repo, page, records = records.len(), "page persisted");
            report.pages += 1;
            report.records += records.len();
            page += 1;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use mockall::predicate::function;
    use serde_json::json;
    use tempfile::TempDir;
    use url::Url;

    use super::CheckpointedPaginator;
    use crate::github::error::ScrapeError;
    use crate::github::fetch::MockFetcher;
    use crate::github::locator::RepositorySlug;
    use crate::persistence::PageStore;
    use crate::scrape::checkpoint::CheckpointStore;
    use crate::scrape::enrich::ResourceEnricher;

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("temp path should be UTF-8")
    }

    fn repo() -> RepositorySlug {
        RepositorySlug::parse("acme/widgets").expect("identifier should parse")
    }

    fn api_base() -> Url {
        Url::parse("https://api.github.com").expect("base should parse")
    }

    fn expect_page(mock: &mut MockFetcher, page: u32, response: serde_json::Value) {
        // Anchored to the tail: "per_page=100" would match a bare contains.
        let needle = format!("&page={page}");
        mock.expect_fetch_json()
            .with(function(move |url: &Url| url.as_str().ends_with(&needle)))
            .times(1)
            .return_once(move |_| Ok(response));
    }

    #[test]
    fn one_page_then_empty_persists_once_and_advances() {
        let dir = TempDir::new().expect("temp dir");
        let root = utf8(&dir);
        let checkpoint = CheckpointStore::new(root.join("checkpoint.json"));
        let pages = PageStore::new(root);

        let mut page_fetcher = MockFetcher::new();
        expect_page(
            &mut page_fetcher,
            1,
            json!([{ "number": 1, "body": null }, { "number": 2, "body": null }]),
        );
        expect_page(&mut page_fetcher, 2, json!([]));

        let sub_fetcher = MockFetcher::new();
        let paginator = CheckpointedPaginator::new(
            &page_fetcher,
            ResourceEnricher::new(&sub_fetcher),
            &checkpoint,
            &pages,
            api_base(),
            100,
        );

        let report = paginator.run(&repo()).expect("run should finish");
        assert_eq!(report.pages, 1);
        assert_eq!(report.records, 2);
        assert_eq!(checkpoint.next_page(&repo()).expect("read"), 2);
        assert!(pages.page_path(&repo(), 1).as_std_path().exists());
        assert!(!pages.page_path(&repo(), 2).as_std_path().exists());
    }

    #[test]
    fn fetch_failure_ends_the_run_without_advancing() {
        let dir = TempDir::new().expect("temp dir");
        let root = utf8(&dir);
        let checkpoint = CheckpointStore::new(root.join("checkpoint.json"));
        let pages = PageStore::new(root);

        let mut page_fetcher = MockFetcher::new();
        expect_page(&mut page_fetcher, 1, json!([{ "number": 1, "body": null }]));
        let needle = "&page=2";
        page_fetcher
            .expect_fetch_json()
            .with(function(move |url: &Url| url.as_str().ends_with(needle)))
            .times(1)
            .return_once(|_| {
                Err(ScrapeError::Network {
                    message: "timed out".to_owned(),
                })
            });

        let sub_fetcher = MockFetcher::new();
        let paginator = CheckpointedPaginator::new(
            &page_fetcher,
            ResourceEnricher::new(&sub_fetcher),
            &checkpoint,
            &pages,
            api_base(),
            100,
        );

        let error = paginator.run(&repo()).expect_err("run should fail");
        assert!(matches!(error, ScrapeError::Network { .. }));
        // Page 1 completed; the failed page 2 stays next for the re-run.
        assert_eq!(checkpoint.next_page(&repo()).expect("read"), 2);
        assert!(pages.page_path(&repo(), 1).as_std_path().exists());
    }

    #[test]
    fn malformed_page_body_is_fatal_to_the_run() {
        let dir = TempDir::new().expect("temp dir");
        let root = utf8(&dir);
        let checkpoint = CheckpointStore::new(root.join("checkpoint.json"));
        let pages = PageStore::new(root);

        let mut page_fetcher = MockFetcher::new();
        expect_page(&mut page_fetcher, 1, json!({ "message": "bad credentials" }));

        let sub_fetcher = MockFetcher::new();
        let paginator = CheckpointedPaginator::new(
            &page_fetcher,
            ResourceEnricher::new(&sub_fetcher),
            &checkpoint,
            &pages,
            api_base(),
            100,
        );

        let error = paginator.run(&repo()).expect_err("run should fail");
        assert!(matches!(error, ScrapeError::MalformedResponse { .. }));
        assert_eq!(checkpoint.next_page(&repo()).expect("read"), 1);
    }

    #[test]
    fn resumes_from_persisted_checkpoint() {
        let dir = TempDir::new().expect("temp dir");
        let root = utf8(&dir);
        let checkpoint = CheckpointStore::new(root.join("checkpoint.json"));
        let pages = PageStore::new(root);
        checkpoint.advance(&repo(), 3).expect("seed checkpoint");

        let mut page_fetcher = MockFetcher::new();
        expect_page(&mut page_fetcher, 3, json!([]));

        let sub_fetcher = MockFetcher::new();
        let paginator = CheckpointedPaginator::new(
            &page_fetcher,
            ResourceEnricher::new(&sub_fetcher),
            &checkpoint,
            &pages,
            api_base(),
            100,
        );

        let report = paginator.run(&repo()).expect("run should finish");
        assert_eq!(report.pages, 0);
    }
}
