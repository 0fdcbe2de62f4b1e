//! Summary-file layout: one file per repository under `summaries/`.

use std::fs;

use camino::Utf8PathBuf;

use crate::github::error::ScrapeError;
use crate::github::locator::RepositorySlug;
use crate::summary::Summary;

/// Writes per-repository summary files under one output root.
#[derive(Debug, Clone)]
pub struct SummaryStore {
    root: Utf8PathBuf,
}

impl SummaryStore {
    /// Creates a store rooted at the given output directory; summaries land
    /// in its `summaries/` subdirectory.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the path of one repository's summary file.
    #[must_use]
    pub fn summary_path(&self, repo: &RepositorySlug) -> Utf8PathBuf {
        self.root
            .join("summaries")
            .join(format!("{}.json", repo.path_safe()))
    }

    /// Writes the repository's summary records, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Persistence`] when the directory or file
    /// cannot be written.
    pub fn write(
        &self,
        repo: &RepositorySlug,
        summaries: &[Summary],
    ) -> Result<Utf8PathBuf, ScrapeError> {
        let path = self.summary_path(repo);
        let persistence = |error: &dyn std::fmt::Display| ScrapeError::Persistence {
            path: path.to_string(),
            message: error.to_string(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| persistence(&error))?;
        }
        let data = serde_json::to_string_pretty(summaries).map_err(|error| persistence(&error))?;
        fs::write(&path, data).map_err(|error| persistence(&error))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    use super::SummaryStore;
    use crate::github::locator::RepositorySlug;
    use crate::summary::Summary;

    #[test]
    fn summaries_round_trip_through_the_file() {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .expect("temp path should be UTF-8");
        let store = SummaryStore::new(root);
        let repo = RepositorySlug::parse("acme/widgets").expect("identifier should parse");

        let records = vec![Summary {
            text: "Pull Request '1' titled 'x'".to_owned(),
            has_locked_reason: false,
            merged: false,
            num_comments: 2,
            num_review_comments: 1,
        }];
        let path = store.write(&repo, &records).expect("summaries should write");
        assert!(path.as_str().ends_with("summaries/acme_widgets.json"));

        let data = std::fs::read_to_string(path.as_std_path()).expect("file should read");
        let parsed: Vec<Summary> = serde_json::from_str(&data).expect("file should parse");
        assert_eq!(parsed, records);
        assert!(data.contains("\"summary\""));
    }
}
