//! Blocking JSON fetcher with rate-limit compliance.
//!
//! The scraper is single-threaded and fully synchronous by design: quota
//! compliance and resumability matter, throughput does not. The fetcher
//! issues one bounded-timeout GET at a time and, after a successful response,
//! sleeps until the quota reset when the remaining allowance has dropped to
//! its safety buffer. The request that consumed the last of the quota is not
//! retried; only the next call pays the wait.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use url::Url;

use crate::retry::RetryPolicy;

use super::error::ScrapeError;
use super::locator::PersonalAccessToken;
use super::rate_limit::RateLimitInfo;

/// Bound on any single HTTP request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Source of JSON documents addressed by URL.
///
/// The trait seam lets tests drive the enricher and paginator with scripted
/// responses instead of live HTTP.
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher {
    /// Fetches and parses the JSON body at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Network`] for transport failures,
    /// [`ScrapeError::Status`] for non-2xx responses, and
    /// [`ScrapeError::MalformedResponse`] when the body is not JSON.
    fn fetch_json(&self, url: &Url) -> Result<Value, ScrapeError>;
}

/// Blocking fetcher over `reqwest` with GitHub quota handling.
pub struct HttpFetcher {
    client: Client,
    token: PersonalAccessToken,
    buffer: u32,
    retry: RetryPolicy,
}

impl HttpFetcher {
    /// Creates a fetcher holding `buffer` requests in reserve.
    ///
    /// Sub-resource fetchers use a buffer of 0 (wait only on exhaustion);
    /// the paginator's page fetcher uses a larger buffer so each page's
    /// enrichment fetches have quota to draw on.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Network`] when the HTTP client cannot be
    /// constructed.
    pub fn new(token: PersonalAccessToken, buffer: u32) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| ScrapeError::Network {
                message: error.to_string(),
            })?;
        Ok(Self {
            client,
            token,
            buffer,
            retry: RetryPolicy::none(),
        })
    }

    /// Retries transport-level failures under the given policy.
    ///
    /// Non-2xx statuses and malformed bodies are never retried.
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn request(&self, url: &Url) -> Result<Value, ScrapeError> {
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, GITHUB_JSON)
            .bearer_auth(self.token.value())
            .send()
            .map_err(|error| ScrapeError::Network {
                message: error.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // Headers must be captured before the body consumes the response.
        let limits = RateLimitInfo::from_headers(response.headers());

        let body =
            response
                .json::<Value>()
                .map_err(|error| ScrapeError::MalformedResponse {
                    url: url.to_string(),
                    message: error.to_string(),
                })?;

        if let Some(info) = limits
            && info.is_depleted(self.buffer)
        {
            let wait = info.wait_duration();
            if !wait.is_zero() {
                tracing::warn!(
                    remaining = info.remaining(),
                    buffer = self.buffer,
                    wait_secs = wait.as_secs(),
                    reset_at = ?info.reset_time(),
                    "rate limit low; waiting until reset"
                );
                thread::sleep(wait);
            }
        }

        Ok(body)
    }
}

impl Fetcher for HttpFetcher {
    fn fetch_json(&self, url: &Url) -> Result<Value, ScrapeError> {
        self.retry.run(
            || self.request(url),
            |error| matches!(error, ScrapeError::Network { .. }),
        )
    }
}
