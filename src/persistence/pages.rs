//! Page-file layout, whole-file overwrite writes, and in-order merging.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::github::error::ScrapeError;
use crate::github::locator::RepositorySlug;
use crate::github::models::IssueRecord;

/// Writes and merges per-page files under one output root.
#[derive(Debug, Clone)]
pub struct PageStore {
    root: Utf8PathBuf,
}

impl PageStore {
    /// Creates a store rooted at the given output directory.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the directory holding one repository's files.
    #[must_use]
    pub fn repo_dir(&self, repo: &RepositorySlug) -> Utf8PathBuf {
        self.root.join(repo.path_safe())
    }

    /// Returns the path of one page file.
    #[must_use]
    pub fn page_path(&self, repo: &RepositorySlug, page: u32) -> Utf8PathBuf {
        self.repo_dir(repo)
            .join(format!("{}_page_{page}.json", repo.path_safe()))
    }

    /// Returns the path of the merged file.
    #[must_use]
    pub fn merged_path(&self, repo: &RepositorySlug) -> Utf8PathBuf {
        self.repo_dir(repo)
            .join(format!("{}_merged.json", repo.path_safe()))
    }

    /// Persists one page of enriched records, replacing any previous file
    /// for the same page wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Persistence`] when the directory or file
    /// cannot be written.
    pub fn write_page(
        &self,
        repo: &RepositorySlug,
        page: u32,
        records: &[IssueRecord],
    ) -> Result<Utf8PathBuf, ScrapeError> {
        let path = self.page_path(repo, page);
        write_records(&path, records)?;
        Ok(path)
    }

    /// Concatenates the repository's page files in ascending page order into
    /// the merged file, returning its path.
    ///
    /// Unreadable page files are skipped with a warning, matching the
    /// batch-job convention of salvaging what is there rather than aborting.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Persistence`] when the repository directory
    /// cannot be listed or the merged file cannot be written.
    pub fn merge(&self, repo: &RepositorySlug) -> Result<Utf8PathBuf, ScrapeError> {
        let mut all_records = Vec::new();
        for (page, path) in self.page_files(repo)? {
            match read_records(&path) {
                Ok(mut records) => all_records.append(&mut records),
                Err(error) => {
                    tracing::warn!("skipping unreadable page {page}: {error}");
                }
            }
        }

        let path = self.merged_path(repo);
        write_records(&path, &all_records)?;
        Ok(path)
    }

    /// Reads the repository's merged file.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Persistence`] when the file is missing,
    /// unreadable, or not a JSON array of records.
    pub fn read_merged(&self, repo: &RepositorySlug) -> Result<Vec<IssueRecord>, ScrapeError> {
        read_records(&self.merged_path(repo))
    }

    /// Lists the repository's page files as `(page, path)` pairs in
    /// ascending page order. Files not matching the page naming scheme
    /// (including the merged file) are ignored.
    fn page_files(
        &self,
        repo: &RepositorySlug,
    ) -> Result<Vec<(u32, Utf8PathBuf)>, ScrapeError> {
        let dir = self.repo_dir(repo);
        let prefix = format!("{}_page_", repo.path_safe());

        let entries = fs::read_dir(&dir).map_err(|error| ScrapeError::Persistence {
            path: dir.to_string(),
            message: error.to_string(),
        })?;

        let mut pages = Vec::new();
        for entry in entries {
            let dir_entry = entry.map_err(|error| ScrapeError::Persistence {
                path: dir.to_string(),
                message: error.to_string(),
            })?;
            let Ok(path) = Utf8PathBuf::from_path_buf(dir_entry.path()) else {
                continue;
            };
            let Some(page) = path
                .file_name()
                .and_then(|name| name.strip_suffix(".json"))
                .and_then(|stem| stem.strip_prefix(prefix.as_str()))
                .and_then(|digits| digits.parse::<u32>().ok())
            else {
                continue;
            };
            pages.push((page, path));
        }
        pages.sort_unstable_by_key(|(page, _)| *page);
        Ok(pages)
    }
}

fn write_records(path: &Utf8Path, records: &[IssueRecord]) -> Result<(), ScrapeError> {
    let persistence = |error: &dyn std::fmt::Display| ScrapeError::Persistence {
        path: path.to_string(),
        message: error.to_string(),
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|error| persistence(&error))?;
    }
    let data = serde_json::to_string_pretty(records).map_err(|error| persistence(&error))?;
    fs::write(path, data).map_err(|error| persistence(&error))
}

fn read_records(path: &Utf8Path) -> Result<Vec<IssueRecord>, ScrapeError> {
    let persistence = |error: &dyn std::fmt::Display| ScrapeError::Persistence {
        path: path.to_string(),
        message: error.to_string(),
    };
    let data = fs::read_to_string(path).map_err(|error| persistence(&error))?;
    serde_json::from_str(&data).map_err(|error| persistence(&error))
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    use super::PageStore;
    use crate::github::locator::RepositorySlug;
    use crate::github::models::IssueRecord;

    fn store_in(dir: &TempDir) -> PageStore {
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .expect("temp path should be UTF-8");
        PageStore::new(root)
    }

    fn repo() -> RepositorySlug {
        RepositorySlug::parse("acme/widgets").expect("identifier should parse")
    }

    fn record(number: u64) -> IssueRecord {
        IssueRecord {
            number,
            ..IssueRecord::default()
        }
    }

    #[test]
    fn page_files_are_named_by_slug_and_page() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);

        let path = store
            .write_page(&repo(), 3, &[record(1)])
            .expect("page should write");
        assert!(path.as_str().ends_with("acme_widgets/acme_widgets_page_3.json"));
        assert!(path.as_std_path().exists());
    }

    #[test]
    fn rewriting_a_page_replaces_it_wholesale() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        let target = repo();

        store
            .write_page(&target, 1, &[record(1), record(2)])
            .expect("first write");
        store
            .write_page(&target, 1, &[record(3)])
            .expect("overwrite");
        store.merge(&target).expect("merge");

        let merged = store.read_merged(&target).expect("read merged");
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].number, 3);
    }

    #[test]
    fn merge_concatenates_pages_in_numeric_order() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        let target = repo();

        // Page 10 sorts after page 2 numerically, not lexically.
        store.write_page(&target, 10, &[record(100)]).expect("write");
        store.write_page(&target, 2, &[record(20)]).expect("write");
        store.write_page(&target, 1, &[record(10)]).expect("write");
        store.merge(&target).expect("merge");

        let numbers: Vec<u64> = store
            .read_merged(&target)
            .expect("read merged")
            .iter()
            .map(|item| item.number)
            .collect();
        assert_eq!(numbers, vec![10, 20, 100]);
    }

    #[test]
    fn merge_ignores_the_previous_merged_file() {
        let dir = TempDir::new().expect("temp dir");
        let store = store_in(&dir);
        let target = repo();

        store.write_page(&target, 1, &[record(1)]).expect("write");
        store.merge(&target).expect("first merge");
        store.merge(&target).expect("second merge");

        assert_eq!(store.read_merged(&target).expect("read merged").len(), 1);
    }
}
