//! Data models for scraped issues, pull requests, and their sub-resources.
//!
//! These are deliberately loose projections of the GitHub REST schema: every
//! field the pipeline does not branch on is optional, and unknown fields are
//! ignored on deserialisation. Enrichment fields follow explicit presence
//! conventions (see field docs): `pull_request_url_body`,
//! `review_comments_url_body`, and `commit_message` are absent when their
//! fetch failed, while `comments_url_body` degrades to an empty list. The
//! asymmetry is preserved from the original data set so that downstream
//! consumers can keep branching on presence.

use serde::{Deserialize, Serialize};

use crate::links::LinkDescriptor;

#[cfg(feature = "test-support")]
pub mod test_support;

/// GitHub account attached to issues, comments, and merge events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Account login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    /// Account kind (`User`, `Bot`, `Organization`).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Label attached to an issue or pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Label description; GitHub reports `null` for undescribed labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Plain issue comment or pull request review comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    /// Comment body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Comment author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Actor>,
    /// Author's association with the repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_association: Option<String>,
    /// Creation timestamp (ISO 8601).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// The `pull_request` stub embedded in an issue record.
///
/// Presence of this key marks the issue as a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestStub {
    /// API URL of the full pull request resource.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Merge timestamp; `None` means the pull request was closed unmerged.
    pub merged_at: Option<String>,
}

/// Full pull request detail fetched from the stub's `url`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestDetail {
    /// Endpoint listing review comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_comments_url: Option<String>,
    /// Endpoint listing commits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commits_url: Option<String>,
    /// Merge timestamp.
    pub merged_at: Option<String>,
    /// Account that merged the pull request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged_by: Option<Actor>,
    /// Review comments, attached by enrichment. Absent (not empty) when the
    /// fetch failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_comments_url_body: Option<Vec<CommentRecord>>,
    /// First commit's message, attached by enrichment. Absent when the fetch
    /// failed or the pull request has no commits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
}

/// One entry of a pull request's commit listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEntry {
    /// Nested commit payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<CommitDetail>,
}

/// Commit payload carrying the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitDetail {
    /// Commit message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Closed issue or pull request record, optionally enriched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// GitHub's global identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Issue or pull request number within the repository.
    pub number: u64,
    /// Title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Author.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Actor>,
    /// State (`open` or `closed`; scraping only requests closed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Whether the conversation is locked.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub locked: bool,
    /// Lock reason, present only for locked conversations with a reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_lock_reason: Option<String>,
    /// Author's association with the repository.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_association: Option<String>,
    /// Labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    /// Free-text body.
    pub body: Option<String>,
    /// Endpoint listing plain comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments_url: Option<String>,
    /// HTML URL for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
    /// Creation timestamp (ISO 8601).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Close timestamp (ISO 8601).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<String>,
    /// Account that closed the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_by: Option<Actor>,
    /// Pull request stub; presence marks the record as a pull request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PullRequestStub>,
    /// Full pull request detail, attached by enrichment. Present if and only
    /// if the stub carried a `url` and the detail fetch succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request_url_body: Option<PullRequestDetail>,
    /// Plain comments, attached by enrichment. Empty (not absent) when the
    /// fetch failed or the record has no comments.
    #[serde(default)]
    pub comments_url_body: Vec<CommentRecord>,
    /// Extracted link descriptors, attached by enrichment only when
    /// non-empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links_to: Option<Vec<LinkDescriptor>>,
}

impl IssueRecord {
    /// Returns true when the record is a pull request with a detail URL,
    /// the condition under which enrichment fetches PR sub-resources.
    #[must_use]
    pub fn is_pull_request(&self) -> bool {
        self.pull_request
            .as_ref()
            .is_some_and(|stub| stub.url.is_some())
    }

    /// Returns true when the pull request was closed without being merged.
    #[must_use]
    pub fn is_unmerged_pull_request(&self) -> bool {
        self.pull_request
            .as_ref()
            .is_some_and(|stub| stub.merged_at.is_none())
    }
}
