//! Summary generation from merged repository data.

use std::io::{self, Write};

use camino::Utf8PathBuf;

use gleaner::persistence::{PageStore, SummaryStore};
use gleaner::summary::{qualifies_for_summary, to_summary};
use gleaner::{GleanerConfig, ScrapeError};

use super::output::{write_no_summaries, write_summary_report};

/// Generates summary files for every configured repository.
///
/// Only unmerged pull requests that attracted both comments and review
/// comments are summarised. Repositories producing no qualifying records
/// get a note instead of a summary file.
///
/// # Errors
///
/// Returns [`ScrapeError::Configuration`] when no repositories are
/// configured, and otherwise the last per-repository persistence failure
/// (typically a missing merged file).
pub fn run(config: &GleanerConfig) -> Result<(), ScrapeError> {
    let mut stdout = io::stdout().lock();
    run_to(config, &mut stdout)
}

/// Generates summaries, reporting progress to `writer`.
///
/// This function is exposed for testing with an in-memory writer.
pub fn run_to<W: Write>(config: &GleanerConfig, writer: &mut W) -> Result<(), ScrapeError> {
    let repositories = config.repositories()?;
    let root = Utf8PathBuf::from(&config.output_dir);
    let pages = PageStore::new(root.clone());
    let store = SummaryStore::new(root);

    let mut last_error = None;
    for repo in &repositories {
        let records = match pages.read_merged(repo) {
            Ok(records) => records,
            Err(error) => {
                tracing::error!(%repo, %error, "cannot read merged data; run the merge step first");
                last_error = Some(error);
                continue;
            }
        };

        let summaries: Vec<_> = records
            .iter()
            .filter(|record| qualifies_for_summary(record))
            .map(to_summary)
            .collect();

        if summaries.is_empty() {
            write_no_summaries(writer, repo)?;
            continue;
        }

        match store.write(repo, &summaries) {
            Ok(path) => write_summary_report(writer, repo, summaries.len(), &path)?,
            Err(error) => {
                tracing::error!(%repo, %error, "summary write failed; continuing");
                last_error = Some(error);
            }
        }
    }
    last_error.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    use gleaner::github::models::test_support::{
        closed_issue, comment, unmerged_pull_request, with_review_comments,
    };
    use gleaner::persistence::{PageStore, SummaryStore};
    use gleaner::{GleanerConfig, RepositorySlug, ScrapeError};

    use super::run_to;

    fn workspace() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 path");
        (dir, root)
    }

    fn config_for(root: &Utf8PathBuf) -> GleanerConfig {
        GleanerConfig {
            repos: vec!["acme/widgets".to_owned()],
            output_dir: root.to_string(),
            ..GleanerConfig::default()
        }
    }

    #[test]
    fn writes_summaries_for_qualifying_records_only() {
        let (_dir, root) = workspace();
        let repo = RepositorySlug::parse("acme/widgets").expect("valid slug");
        let pages = PageStore::new(root.clone());

        let mut qualifying = unmerged_pull_request(7, "Fix the gadget");
        qualifying.comments_url_body = vec![comment("Looks sane", "MEMBER", "2024-01-02")];
        qualifying = with_review_comments(
            qualifying,
            vec![comment("Nit on naming", "CONTRIBUTOR", "2024-01-03")],
        );
        pages
            .write_page(&repo, 1, &[closed_issue(1, "Plain issue"), qualifying])
            .expect("page written");
        pages.merge(&repo).expect("merged");

        let config = config_for(&root);
        let mut buffer = Vec::new();
        run_to(&config, &mut buffer).expect("summaries succeed");

        let path = SummaryStore::new(root).summary_path(&repo);
        let data = std::fs::read_to_string(path).expect("summary file exists");
        let parsed: serde_json::Value = serde_json::from_str(&data).expect("valid json");
        let entries = parsed.as_array().expect("array");
        assert_eq!(entries.len(), 1);
        assert!(
            String::from_utf8(buffer)
                .expect("utf-8")
                .contains("acme/widgets")
        );
    }

    #[test]
    fn reports_when_nothing_qualifies() {
        let (_dir, root) = workspace();
        let repo = RepositorySlug::parse("acme/widgets").expect("valid slug");
        let pages = PageStore::new(root.clone());
        pages
            .write_page(&repo, 1, &[closed_issue(1, "Plain issue")])
            .expect("page written");
        pages.merge(&repo).expect("merged");

        let config = config_for(&root);
        let mut buffer = Vec::new();
        run_to(&config, &mut buffer).expect("run succeeds");
        assert!(
            String::from_utf8(buffer)
                .expect("utf-8")
                .contains("No summaries")
        );
    }

    #[test]
    fn missing_merged_file_is_a_persistence_error() {
        let (_dir, root) = workspace();
        let config = config_for(&root);
        let mut buffer = Vec::new();
        assert!(matches!(
            run_to(&config, &mut buffer),
            Err(ScrapeError::Persistence { .. })
        ));
    }
}
