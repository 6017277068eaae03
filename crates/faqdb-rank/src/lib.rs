//! faqdb-rank
//!
//! Pure scoring functions: cosine similarity, the per-source weighted boost
//! rules, and the lexical keyword fallback matcher.

pub mod keyword;
pub mod score;

pub use keyword::keyword_search;
pub use score::{
    cosine_similarity, weighted_chunk_score, weighted_document_score, weighted_faq_score,
    weighted_media_score,
};
