//! Test helpers for constructing issue and pull request fixtures.
//!
//! These builders keep summary and enrichment tests free of record-literal
//! boilerplate. They are available to integration tests through the
//! `test-support` feature.

use super::{Actor, CommentRecord, IssueRecord, PullRequestDetail, PullRequestStub};

/// Constructs a closed issue with the fields the normaliser's header needs.
#[must_use]
pub fn closed_issue(number: u64, title: &str) -> IssueRecord {
    IssueRecord {
        number,
        title: Some(title.to_owned()),
        user: Some(actor("User")),
        state: Some("closed".to_owned()),
        author_association: Some("CONTRIBUTOR".to_owned()),
        created_at: Some("2024-01-01T00:00:00Z".to_owned()),
        closed_at: Some("2024-02-01T00:00:00Z".to_owned()),
        ..IssueRecord::default()
    }
}

/// Constructs a closed, unmerged pull request with a detail URL.
#[must_use]
pub fn unmerged_pull_request(number: u64, title: &str) -> IssueRecord {
    let mut record = closed_issue(number, title);
    record.pull_request = Some(PullRequestStub {
        url: Some(format!(
            "https://api.github.com/repos/acme/widgets/pulls/{number}"
        )),
        merged_at: None,
    });
    record
}

/// Constructs an actor of the given kind with a fixed login.
#[must_use]
pub fn actor(kind: &str) -> Actor {
    Actor {
        login: Some("octocat".to_owned()),
        kind: Some(kind.to_owned()),
    }
}

/// Constructs a comment with body, association, author kind, and timestamp.
#[must_use]
pub fn comment(body: &str, association: &str, created_at: &str) -> CommentRecord {
    CommentRecord {
        body: Some(body.to_owned()),
        user: Some(actor("User")),
        author_association: Some(association.to_owned()),
        created_at: Some(created_at.to_owned()),
    }
}

/// Attaches an enriched pull request detail carrying the given review
/// comments.
#[must_use]
pub fn with_review_comments(mut record: IssueRecord, reviews: Vec<CommentRecord>) -> IssueRecord {
    let detail = record.pull_request_url_body.take().unwrap_or_default();
    record.pull_request_url_body = Some(PullRequestDetail {
        review_comments_url_body: Some(reviews),
        ..detail
    });
    record
}
