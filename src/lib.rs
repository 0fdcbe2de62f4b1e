//! Gleaner library crate for harvesting closed GitHub issues and pull
//! requests into research-ready JSON.
//!
//! The library wraps a blocking, rate-limit-aware GitHub REST client behind
//! the [`github::Fetcher`] trait, enriches each record with its comments and
//! pull request detail, extracts cross-reference links, and persists pages
//! under a per-repository checkpoint so interrupted runs resume without
//! refetching completed work.

pub mod config;
pub mod github;
pub mod links;
pub mod persistence;
pub mod retry;
pub mod scrape;
pub mod summary;

pub use config::{GleanerConfig, OperationMode};
pub use github::{
    Fetcher, HttpFetcher, PersonalAccessToken, RateLimitInfo, RepositorySlug, ScrapeError,
};
pub use links::{LinkDescriptor, LinkKind, extract_all_links, extract_links};
