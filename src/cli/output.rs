//! Output formatting utilities for CLI operations.

use std::io::Write;

use camino::Utf8Path;

use gleaner::scrape::ScrapeReport;
use gleaner::{RepositorySlug, ScrapeError};

fn io_error(error: &dyn std::fmt::Display) -> ScrapeError {
    ScrapeError::Io {
        message: error.to_string(),
    }
}

/// Writes a one-line account of a completed scrape run.
pub fn write_scrape_report<W: Write>(
    writer: &mut W,
    repo: &RepositorySlug,
    report: &ScrapeReport,
) -> Result<(), ScrapeError> {
    writeln!(
        writer,
        "Scraped {repo}: {} page(s), {} record(s)",
        report.pages, report.records
    )
    .map_err(|e| io_error(&e))
}

/// Writes a one-line account of a completed page merge.
pub fn write_merge_report<W: Write>(
    writer: &mut W,
    repo: &RepositorySlug,
    merged: &Utf8Path,
) -> Result<(), ScrapeError> {
    writeln!(writer, "Merged {repo} into {merged}").map_err(|e| io_error(&e))
}

/// Writes a one-line account of summary generation for one repository.
pub fn write_summary_report<W: Write>(
    writer: &mut W,
    repo: &RepositorySlug,
    count: usize,
    path: &Utf8Path,
) -> Result<(), ScrapeError> {
    writeln!(writer, "Wrote {count} summary record(s) for {repo} to {path}")
        .map_err(|e| io_error(&e))
}

/// Notes that a repository produced no qualifying summary records.
pub fn write_no_summaries<W: Write>(
    writer: &mut W,
    repo: &RepositorySlug,
) -> Result<(), ScrapeError> {
    writeln!(
        writer,
        "No summaries for {repo}: no unmerged pull requests with discussion"
    )
    .map_err(|e| io_error(&e))
}
