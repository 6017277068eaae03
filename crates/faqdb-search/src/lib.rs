//! faqdb-search
//!
//! Per-source searchers that race the server-side vector index against a
//! client-side brute-force fallback, and the orchestrator that fans out to
//! them and merges the ranked results.

pub mod chunk;
pub mod document;
pub mod faq;
pub mod media;
pub mod orchestrator;
mod remote;

pub use chunk::ChunkSearcher;
pub use document::DocumentSearcher;
pub use faq::FaqSearcher;
pub use media::{MediaFilter, MediaSearcher};
pub use orchestrator::SearchOrchestrator;

use faqdb_core::types::SearchResult;

/// Sort by weighted score descending and truncate. Merge order across
/// sources is irrelevant; this single sort establishes the final ranking.
pub(crate) fn sort_and_truncate(mut results: Vec<SearchResult>, limit: usize) -> Vec<SearchResult> {
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(limit);
    results
}
