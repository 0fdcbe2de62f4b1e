//! Link and cross-reference extraction from issue text.
//!
//! Scanning is a two-pass affair over each record's assembled free text:
//! URL matches are collected first, then bare cross-references such as
//! `fixes #42`. Classification is a coarse substring check on the URL, which
//! is exactly as precise as the downstream analysis needs.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::github::models::IssueRecord;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
    Regex::new(r"https?://\S+").expect("URL pattern must compile")
});

static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[expect(clippy::expect_used, reason = "pattern is a compile-time constant")]
    Regex::new(r"(?i)(?:fixes|mentioned in|resolves|closes) #?(\d+)").expect("reference pattern must compile")
});

/// Punctuation stripped from the tail of URL matches.
const TRAILING_PUNCTUATION: [char; 4] = ['.', ',', '!', '?'];

/// Coarse classification of an extracted link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    /// URL containing neither "pull" nor "issue".
    #[serde(rename = "url")]
    Url,
    /// URL containing "pull".
    #[serde(rename = "pull_url")]
    PullUrl,
    /// URL containing "issue".
    #[serde(rename = "issue_url")]
    IssueUrl,
    /// Bare cross-reference such as `fixes #42`, rendered as `#42`.
    #[serde(rename = "Issue/PR number")]
    IssueOrPrNumber,
}

/// A classified reference extracted from free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDescriptor {
    /// The URL or `#<number>` reference.
    pub link: String,
    /// Classification of the target.
    #[serde(rename = "type")]
    pub kind: LinkKind,
}

/// Extracts URL and cross-reference descriptors from the given texts.
///
/// URL descriptors come first, in encounter order across the inputs, then
/// cross-reference descriptors. Trailing sentence punctuation is stripped
/// from URL matches. Never fails; no text means no descriptors.
#[must_use]
pub fn extract_links<'text>(texts: impl IntoIterator<Item = &'text str>) -> Vec<LinkDescriptor> {
    let mut urls = Vec::new();
    let mut references = Vec::new();

    for text in texts {
        for found in URL_PATTERN.find_iter(text) {
            let trimmed = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
            if !trimmed.is_empty() {
                urls.push(trimmed.to_owned());
            }
        }
        for capture in REFERENCE_PATTERN.captures_iter(text) {
            if let Some(number) = capture.get(1) {
                references.push(format!("#{}", number.as_str()));
            }
        }
    }

    let mut links = Vec::with_capacity(urls.len() + references.len());
    links.extend(urls.into_iter().map(|url| LinkDescriptor {
        kind: classify_url(&url),
        link: url,
    }));
    links.extend(references.into_iter().map(|reference| LinkDescriptor {
        link: reference,
        kind: LinkKind::IssueOrPrNumber,
    }));
    links
}

/// Extracts descriptors from every text field of a record.
///
/// Assembles the body, every comment body, and — only for pull requests with
/// an attached detail — every review-comment body plus the commit message,
/// then delegates to [`extract_links`]. Missing fields contribute no text.
#[must_use]
pub fn extract_all_links(record: &IssueRecord, is_pull_request: bool) -> Vec<LinkDescriptor> {
    let mut texts: Vec<&str> = Vec::new();

    if let Some(body) = record.body.as_deref()
        && !body.is_empty()
    {
        texts.push(body);
    }

    texts.extend(
        record
            .comments_url_body
            .iter()
            .filter_map(|comment| comment.body.as_deref())
            .filter(|body| !body.is_empty()),
    );

    if is_pull_request
        && let Some(detail) = record.pull_request_url_body.as_ref()
    {
        if let Some(reviews) = detail.review_comments_url_body.as_ref() {
            texts.extend(
                reviews
                    .iter()
                    .filter_map(|comment| comment.body.as_deref())
                    .filter(|body| !body.is_empty()),
            );
        }
        if let Some(message) = detail.commit_message.as_deref()
            && !message.is_empty()
        {
            texts.push(message);
        }
    }

    extract_links(texts)
}

fn classify_url(url: &str) -> LinkKind {
    if url.contains("pull") {
        LinkKind::PullUrl
    } else if url.contains("issue") {
        LinkKind::IssueUrl
    } else {
        LinkKind::Url
    }
}
