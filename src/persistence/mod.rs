//! Flat-file persistence for scraped pages and generated summaries.
//!
//! All durable state lives under one output directory:
//!
//! - `checkpoint.json` — scrape progress (owned by
//!   [`crate::scrape::CheckpointStore`])
//! - `<slug>/<slug>_page_<n>.json` — one enriched page per file
//! - `<slug>/<slug>_merged.json` — page files concatenated in page order
//! - `summaries/<slug>.json` — summary records for the classifier
//!
//! Page files are keyed by page number and fully overwritten, never appended
//! to, which makes re-scraping after a crash idempotent.

mod pages;
mod summaries;

pub use pages::PageStore;
pub use summaries::SummaryStore;
