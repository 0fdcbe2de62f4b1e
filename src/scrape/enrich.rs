//! Attaches nested sub-resources to a base issue or pull request record.
//!
//! Enrichment never fails a record: each sub-resource fetch that errors
//! degrades only its own field. Review comments and the commit message stay
//! absent on failure, while plain comments degrade to an empty list; the
//! asymmetry matches the persisted data set downstream consumers already
//! branch on.

use serde::de::DeserializeOwned;
use url::Url;

use crate::github::error::ScrapeError;
use crate::github::fetch::Fetcher;
use crate::github::models::{CommentRecord, CommitEntry, IssueRecord, PullRequestDetail};
use crate::links::extract_all_links;

/// Enriches issue records through a [`Fetcher`].
pub struct ResourceEnricher<'fetcher, F: Fetcher> {
    fetcher: &'fetcher F,
}

impl<'fetcher, F: Fetcher> ResourceEnricher<'fetcher, F> {
    /// Creates an enricher over the given fetcher.
    #[must_use]
    pub const fn new(fetcher: &'fetcher F) -> Self {
        Self { fetcher }
    }

    /// Attaches pull request detail, review comments, commit message, plain
    /// comments, and extracted links to the record, degrading per field on
    /// failure.
    pub fn enrich(&self, record: &mut IssueRecord) {
        let is_pull_request = record.is_pull_request();
        if is_pull_request {
            self.attach_pull_request_detail(record);
        }
        self.attach_comments(record);

        let links = extract_all_links(record, is_pull_request);
        if !links.is_empty() {
            record.links_to = Some(links);
        }
    }

    fn attach_pull_request_detail(&self, record: &mut IssueRecord) {
        let Some(detail_url) = record
            .pull_request
            .as_ref()
            .and_then(|stub| stub.url.clone())
        else {
            return;
        };

        let Some(mut detail) = self.fetch_field::<PullRequestDetail>(
            &detail_url,
            "pull request detail",
            record.number,
        ) else {
            return;
        };

        if let Some(reviews_url) = detail.review_comments_url.clone() {
            detail.review_comments_url_body = self.fetch_field::<Vec<CommentRecord>>(
                &reviews_url,
                "review comments",
                record.number,
            );
        }

        if let Some(commits_url) = detail.commits_url.clone()
            && let Some(commits) =
                self.fetch_field::<Vec<CommitEntry>>(&commits_url, "commits", record.number)
        {
            detail.commit_message = commits
                .into_iter()
                .next()
                .and_then(|entry| entry.commit)
                .and_then(|commit| commit.message);
        }

        record.pull_request_url_body = Some(detail);
    }

    fn attach_comments(&self, record: &mut IssueRecord) {
        record.comments_url_body = record
            .comments_url
            .clone()
            .and_then(|url| {
                self.fetch_field::<Vec<CommentRecord>>(&url, "comments", record.number)
            })
            .unwrap_or_default();
    }

    /// Fetches and deserialises one sub-resource, logging and returning
    /// `None` on any failure.
    fn fetch_field<T: DeserializeOwned>(&self, url: &str, what: &str, number: u64) -> Option<T> {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(error) => {
                tracing::warn!("skipping {what} for #{number}: bad URL {url}: {error}");
                return None;
            }
        };
        let value = match self.fetcher.fetch_json(&parsed) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!("failed to fetch {what} for #{number}: {error}");
                return None;
            }
        };
        match serde_json::from_value(value) {
            Ok(typed) => Some(typed),
            Err(error) => {
                let malformed = ScrapeError::MalformedResponse {
                    url: url.to_owned(),
                    message: error.to_string(),
                };
                tracing::warn!("discarding {what} for #{number}: {malformed}");
                None
            }
        }
    }
}
