//! Identity wrappers for repositories and API credentials.

use std::fmt;

use url::Url;

use super::error::ScrapeError;

/// Repository identifier in `owner/name` form.
///
/// The identifier doubles as a namespace for persisted output; the path-safe
/// form substitutes `/` with `_` so that it can name files and directories.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepositorySlug {
    owner: String,
    name: String,
}

impl RepositorySlug {
    /// Parses an `owner/name` identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidRepository`] when the input does not
    /// contain exactly one `/` separating two non-empty segments.
    pub fn parse(input: &str) -> Result<Self, ScrapeError> {
        let invalid = || ScrapeError::InvalidRepository {
            input: input.to_owned(),
        };
        let (owner, name) = input.split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }

    /// Borrow the owner segment.
    #[must_use]
    pub const fn owner(&self) -> &str {
        self.owner.as_str()
    }

    /// Borrow the name segment.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the identifier with `/` replaced by `_`, safe for use in
    /// file and directory names.
    #[must_use]
    pub fn path_safe(&self) -> String {
        format!("{}_{}", self.owner, self.name)
    }

    /// Builds the closed-issues listing endpoint for one page of this
    /// repository.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidUrl`] when the API base cannot be
    /// combined into a valid URL.
    pub fn closed_issues_url(
        &self,
        api_base: &Url,
        per_page: u32,
        page: u32,
    ) -> Result<Url, ScrapeError> {
        let base = api_base.as_str().trim_end_matches('/');
        let endpoint = format!(
            "{base}/repos/{owner}/{name}/issues?state=closed&per_page={per_page}&page={page}",
            owner = self.owner,
            name = self.name,
        );
        Url::parse(&endpoint).map_err(|error| ScrapeError::InvalidUrl(error.to_string()))
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::MissingToken`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, ScrapeError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ScrapeError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}
