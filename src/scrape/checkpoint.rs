//! Durable record of fetch progress per repository.
//!
//! The checkpoint is a single JSON file mapping the path-safe repository
//! identifier to the next unfetched page number. Updates read the whole map,
//! modify one key, and write the whole map back. A single process owns the
//! file; concurrent paginator runs against the same repository are
//! unsupported and would corrupt this state.

use std::collections::BTreeMap;
use std::fs;

use camino::Utf8PathBuf;

use crate::github::error::ScrapeError;
use crate::github::locator::RepositorySlug;

/// First page of a never-seen repository.
const FIRST_PAGE: u32 = 1;

/// File-backed map from repository to next unfetched page.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: Utf8PathBuf,
}

impl CheckpointStore {
    /// Creates a store backed by the given file. The file is created on
    /// first write; a missing file reads as an empty map.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the next unfetched page for the repository, page 1 when the
    /// repository has never been scraped.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Persistence`] when the checkpoint file exists
    /// but cannot be read or parsed.
    pub fn next_page(&self, repo: &RepositorySlug) -> Result<u32, ScrapeError> {
        let map = self.load()?;
        Ok(map.get(&repo.path_safe()).copied().unwrap_or(FIRST_PAGE))
    }

    /// Records `next_page` as the repository's next unfetched page.
    ///
    /// The checkpoint only ever advances: a value at or below the recorded
    /// one (page 1 for a never-seen repository) is ignored with a warning,
    /// so a buggy caller cannot roll progress back.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Persistence`] when the file cannot be read or
    /// written.
    pub fn advance(&self, repo: &RepositorySlug, next_page: u32) -> Result<(), ScrapeError> {
        let mut map = self.load()?;
        let key = repo.path_safe();
        let current = map.get(&key).copied().unwrap_or(FIRST_PAGE);
        if next_page <= current {
            tracing::warn!(
                repo = %repo,
                current,
                requested = next_page,
                "ignoring checkpoint regression"
            );
            return Ok(());
        }
        map.insert(key, next_page);
        self.store(&map)
    }

    fn load(&self) -> Result<BTreeMap<String, u32>, ScrapeError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let data = fs::read_to_string(&self.path).map_err(|error| self.persistence(&error))?;
        serde_json::from_str(&data).map_err(|error| self.persistence(&error))
    }

    fn store(&self, map: &BTreeMap<String, u32>) -> Result<(), ScrapeError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|error| self.persistence(&error))?;
        }
        let data = serde_json::to_string_pretty(map).map_err(|error| self.persistence(&error))?;
        fs::write(&self.path, data).map_err(|error| self.persistence(&error))
    }

    fn persistence(&self, error: &dyn std::fmt::Display) -> ScrapeError {
        ScrapeError::Persistence {
            path: self.path.to_string(),
            message: error.to_string(),
        }
    }
}
