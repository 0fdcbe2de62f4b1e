//! Page merging: concatenates persisted page files into one file per
//! repository.

use std::io::{self, Write};

use camino::Utf8PathBuf;

use gleaner::persistence::PageStore;
use gleaner::{GleanerConfig, ScrapeError};

use super::output::write_merge_report;

/// Merges every configured repository's page files.
///
/// A repository whose directory holds no page files is logged and skipped;
/// the run continues with the remaining repositories.
///
/// # Errors
///
/// Returns [`ScrapeError::Configuration`] when no repositories are
/// configured, and otherwise the last per-repository persistence failure.
pub fn run(config: &GleanerConfig) -> Result<(), ScrapeError> {
    let mut stdout = io::stdout().lock();
    run_to(config, &mut stdout)
}

/// Merges page files, reporting progress to `writer`.
///
/// This function is exposed for testing with an in-memory writer.
pub fn run_to<W: Write>(config: &GleanerConfig, writer: &mut W) -> Result<(), ScrapeError> {
    let repositories = config.repositories()?;
    let pages = PageStore::new(Utf8PathBuf::from(&config.output_dir));

    let mut last_error = None;
    for repo in &repositories {
        match pages.merge(repo) {
            Ok(merged) => write_merge_report(writer, repo, &merged)?,
            Err(error) => {
                tracing::error!(%repo, %error, "merge failed; continuing with next repository");
                last_error = Some(error);
            }
        }
    }
    last_error.map_or(Ok(()), Err)
}
