//! Rate limit state parsed from GitHub API response headers.
//!
//! GitHub reports quota through `X-RateLimit-Limit`, `X-RateLimit-Remaining`,
//! and `X-RateLimit-Reset` headers on every response. The fetcher inspects
//! these after each successful request and blocks until the reset time when
//! the remaining quota drops to (or below) its configured safety buffer.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Rate limit information extracted from GitHub API response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    /// Maximum requests allowed in the current window.
    limit: u32,
    /// Remaining requests in the current window.
    remaining: u32,
    /// Unix timestamp when the rate limit resets.
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a new rate limit info instance.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// Parses rate limit headers from a response.
    ///
    /// Returns `None` when any of the three headers is missing or not an
    /// integer. Callers treat an absent result as "no wait required", so
    /// endpoints that do not report quota never stall the scraper.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        Some(Self {
            limit: parse_header(headers, LIMIT_HEADER)?,
            remaining: parse_header(headers, REMAINING_HEADER)?,
            reset_at: parse_header(headers, RESET_HEADER)?,
        })
    }

    /// Returns the maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the remaining requests in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns the Unix timestamp when the rate limit resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Returns true when the remaining quota has dropped to or below the
    /// given safety buffer.
    ///
    /// A buffer of 0 triggers only on full exhaustion; the paginator's page
    /// fetcher uses a larger buffer so that per-record sub-resource fetches
    /// never start a page they cannot finish.
    #[must_use]
    pub const fn is_depleted(&self, buffer: u32) -> bool {
        self.remaining <= buffer
    }

    /// Calculates seconds until the rate limit resets.
    ///
    /// Returns 0 if the reset time has already passed or if the system time
    /// cannot be determined.
    #[must_use]
    pub fn seconds_until_reset(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0);

        self.reset_at.saturating_sub(now)
    }

    /// Returns how long a caller must sleep before issuing another request.
    #[must_use]
    pub fn wait_duration(&self) -> Duration {
        Duration::from_secs(self.seconds_until_reset())
    }

    /// Returns the reset instant as a UTC timestamp, for diagnostics.
    ///
    /// `None` when the header value does not denote a representable instant.
    #[must_use]
    pub fn reset_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(i64::try_from(self.reset_at).ok()?, 0)
    }
}

fn parse_header<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers
        .get(name)
        .and_then(|raw| raw.to_str().ok())
        .and_then(|text| text.parse().ok())
}
