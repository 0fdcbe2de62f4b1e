//! GitHub API access: identities, rate-limit handling, and record models.
//!
//! This module wraps blocking HTTP access to the GitHub REST API behind the
//! [`Fetcher`] trait so that the enricher and paginator can be driven with
//! scripted responses in tests. Errors are mapped into [`ScrapeError`]
//! variants so callers can decide per call site whether a failure degrades a
//! field or ends the run.

pub mod error;
pub mod fetch;
pub mod locator;
pub mod models;
pub mod rate_limit;

pub use error::ScrapeError;
pub use fetch::{Fetcher, HttpFetcher};
pub use locator::{PersonalAccessToken, RepositorySlug};
pub use rate_limit::RateLimitInfo;

#[cfg(test)]
pub use fetch::MockFetcher;
