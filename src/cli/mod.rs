//! CLI operation mode handlers.
//!
//! This module contains the implementations for the batch operations:
//! - [`scrape`]: checkpointed scraping of closed issues and pull requests
//! - [`merge`]: concatenation of persisted page files per repository
//! - [`summaries`]: summary generation from merged data
//!
//! Output formatting utilities are in [`output`].

pub mod merge;
pub mod output;
pub mod scrape;
pub mod summaries;
