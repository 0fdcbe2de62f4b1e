//! Checkpointed, rate-limited incremental scraping.
//!
//! The paginator ties the pieces together: it requests listing pages through
//! a [`Fetcher`](crate::github::Fetcher) with a quota safety buffer, hands
//! each record to the [`ResourceEnricher`], persists the page, and advances
//! the [`CheckpointStore`]. The whole pipeline is synchronous and
//! single-writer; resumability comes from durable state, not coordination.

pub mod checkpoint;
pub mod enrich;
pub mod paginator;

pub use checkpoint::CheckpointStore;
pub use enrich::ResourceEnricher;
pub use paginator::{CheckpointedPaginator, ScrapeReport};
