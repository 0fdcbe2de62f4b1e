//! Error types surfaced by the scraping pipeline.

use thiserror::Error;

/// Errors raised while talking to the GitHub API or persisting scraped data.
///
/// Sub-resource fetch failures are swallowed by the enricher and degrade the
/// affected field; only page-level fetches and persistence treat these as
/// fatal to the current run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScrapeError {
    /// A repository identifier was not written as `owner/name`.
    #[error("repository must be written as owner/name: {input}")]
    InvalidRepository {
        /// The identifier that failed to parse.
        input: String,
    },

    /// The authentication token was missing.
    #[error("personal access token is required")]
    MissingToken,

    /// A URL could not be parsed or constructed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Networking failed while calling the API.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The API answered with a non-success status code.
    #[error("GitHub returned HTTP {status} for {url}")]
    Status {
        /// HTTP status code of the response.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// A response body did not have the expected JSON shape.
    #[error("malformed response from {url}: {message}")]
    MalformedResponse {
        /// The requested URL.
        url: String,
        /// Deserialisation error detail.
        message: String,
    },

    /// A page, checkpoint, or summary file could not be read or written.
    #[error("persistence error at {path}: {message}")]
    Persistence {
        /// Path of the file involved.
        path: String,
        /// Error detail from the underlying I/O or serialisation.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded or was incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}
