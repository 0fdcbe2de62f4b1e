//! Deterministic natural-language rendering of enriched records.
//!
//! The classifier downstream consumes one paragraph per pull request. The
//! paragraph is a pure, order-preserving concatenation of sections; a
//! section whose source data is absent contributes nothing, not even a
//! blank marker, and the result is trimmed once at the end. Byte-identical
//! input yields byte-identical output.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::github::models::{Actor, CommentRecord, IssueRecord};

/// Placeholder for actor kinds and associations the record does not carry.
const UNKNOWN: &str = "unknown";

/// Rendered summary plus the metadata tuple the analysis stage keys on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// The rendered paragraph.
    #[serde(rename = "summary")]
    pub text: String,
    /// Whether the record was locked with a stated reason.
    pub has_locked_reason: bool,
    /// Whether the pull request was merged.
    pub merged: bool,
    /// Number of plain comments rendered.
    pub num_comments: usize,
    /// Number of review comments rendered.
    pub num_review_comments: usize,
}

/// Returns true when a record qualifies for summary generation: an unmerged
/// pull request with at least one comment and one review comment.
#[must_use]
pub fn qualifies_for_summary(record: &IssueRecord) -> bool {
    let has_review_comments = record
        .pull_request_url_body
        .as_ref()
        .and_then(|detail| detail.review_comments_url_body.as_ref())
        .is_some_and(|reviews| !reviews.is_empty());

    record.is_unmerged_pull_request()
        && !record.comments_url_body.is_empty()
        && has_review_comments
}

/// Renders the record into its summary paragraph and metadata.
#[must_use]
pub fn to_summary(record: &IssueRecord) -> Summary {
    let mut text = String::new();
    let mut has_locked_reason = false;
    let mut merged = false;
    let mut num_comments = 0;
    let mut num_review_comments = 0;

    push_header(&mut text, record);
    push_labels(&mut text, record);

    if record.locked
        && let Some(reason) = record.active_lock_reason.as_deref()
    {
        has_locked_reason = true;
        let _ignored = writeln!(text, "PR was locked because of {reason}.");
    }

    if let Some(body) = record.body.as_deref()
        && !body.is_empty()
    {
        let _ignored = writeln!(text, "It has a body of '{body}'");
    }

    if !record.comments_url_body.is_empty() {
        num_comments = record.comments_url_body.len();
        text.push_str("PR has comments:\n");
        for comment in &record.comments_url_body {
            push_comment_line(&mut text, comment);
        }
        text.push('\n');
    }

    if let Some(stub) = record.pull_request.as_ref()
        && let Some(merged_at) = stub.merged_at.as_deref()
    {
        merged = true;
        let merger = record
            .pull_request_url_body
            .as_ref()
            .and_then(|detail| detail.merged_by.as_ref())
            .map_or(UNKNOWN, actor_kind);
        let _ignored = writeln!(text, "It was merged at {merged_at} by a {merger}.");
    }

    if let Some(reviews) = record
        .pull_request_url_body
        .as_ref()
        .and_then(|detail| detail.review_comments_url_body.as_ref())
        && !reviews.is_empty()
    {
        num_review_comments = reviews.len();
        text.push_str("PR has review comments:\n");
        for review in reviews {
            push_review_line(&mut text, review);
        }
        text.push('\n');
    }

    Summary {
        text: text.trim().to_owned(),
        has_locked_reason,
        merged,
        num_comments,
        num_review_comments,
    }
}

fn push_header(text: &mut String, record: &IssueRecord) {
    let author = record.user.as_ref().map_or(UNKNOWN, actor_kind);
    let association = record.author_association.as_deref().unwrap_or(UNKNOWN);
    let created = record.created_at.as_deref().unwrap_or(UNKNOWN);
    let closed = record.closed_at.as_deref().unwrap_or(UNKNOWN);
    let closer = record.closed_by.as_ref().map_or_else(
        || "N/A".to_owned(),
        |actor| format!("by a {}", actor_kind(actor)),
    );
    let title = record.title.as_deref().unwrap_or(UNKNOWN);

    let _ignored = writeln!(
        text,
        "Pull Request '{number}' titled '{title}' was authored by a {author}, \
         who is associated as a {association}. \nIt was created at {created}, \
         and was closed at {closed} {closer}.",
        number = record.number,
    );
}

fn push_labels(text: &mut String, record: &IssueRecord) {
    if record.labels.is_empty() {
        return;
    }
    text.push_str("The PR has labels: ");
    let last = record.labels.len() - 1;
    for (index, label) in record.labels.iter().enumerate() {
        let name = label.name.as_deref().unwrap_or("");
        let description = label.description.as_deref().unwrap_or("");
        let separator = if index == last { ". " } else { ", " };
        let _ignored = write!(text, "{name} - {description}{separator}");
    }
    text.push('\n');
}

fn push_comment_line(text: &mut String, comment: &CommentRecord) {
    let body = comment.body.as_deref().unwrap_or("");
    let association = comment.author_association.as_deref().unwrap_or(UNKNOWN);
    let kind = comment.user.as_ref().map_or(UNKNOWN, actor_kind);
    let created = comment.created_at.as_deref().unwrap_or(UNKNOWN);
    let _ignored = writeln!(text, "'{body}' by a {association} of type {kind} on {created}");
}

fn push_review_line(text: &mut String, review: &CommentRecord) {
    let body = review.body.as_deref().unwrap_or("No body available");
    let association = review.author_association.as_deref().unwrap_or("Unknown");
    let kind = review.user.as_ref().map_or("Unknown", actor_kind);
    let created = review.created_at.as_deref().unwrap_or("Unknown date");
    let _ignored = writeln!(text, "'{body}' by a {association} of type {kind} on {created}");
}

fn actor_kind(actor: &Actor) -> &str {
    actor.kind.as_deref().unwrap_or(UNKNOWN)
}
