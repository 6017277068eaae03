//! Cosine similarity and the weighted relevance scoring rules.
//!
//! Scores are always the raw similarity times the documented multiplicative
//! boosts, composed in the order they are listed here. Server-side and
//! brute-force search paths both go through these functions so the two are
//! behaviorally equivalent.

use faqdb_core::types::{ChunkEntry, ChunkKind, FaqEntry, Importance, MatchField, MediaKind};
use faqdb_core::{Error, Result};

pub const FAQ_QUESTION_BOOST: f32 = 1.2;
pub const FAQ_ANSWER_BOOST: f32 = 0.8;
pub const FAQ_KEYWORD_BOOST: f32 = 1.15;
pub const CHUNK_KEYWORD_BOOST: f32 = 1.2;
pub const FAQ_ANALYSIS_QUESTION_BOOST: f32 = 1.1;
pub const FAQ_ANALYSIS_ANSWER_BOOST: f32 = 1.05;
pub const CHUNK_IMPORTANCE_HIGH_BOOST: f32 = 1.2;
pub const CHUNK_IMPORTANCE_MEDIUM_BOOST: f32 = 1.05;
pub const CHUNK_KIND_PAGE_BOOST: f32 = 1.15;
pub const CHUNK_KIND_HEADING_BOOST: f32 = 1.1;
pub const GRAPH_BOOST: f32 = 1.1;

/// Standard cosine similarity.
///
/// Mismatched lengths are an explicit error rather than a silent 0; a silent
/// 0 would mask stale embeddings generated under an old dimension setting.
/// Zero-magnitude input yields 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch { left: a.len(), right: b.len() });
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

/// Substring overlap between the query and an item's semantic keyword list.
/// Keywords shorter than two characters are ignored.
fn keyword_overlap(query: &str, keywords: &[String]) -> bool {
    let query = query.trim().to_lowercase();
    keywords.iter().any(|k| {
        let k = k.trim().to_lowercase();
        k.chars().count() >= 2 && (query.contains(&k) || k.contains(&query))
    })
}

/// Confidence in (0, 1] rescales the score into [0.8, 1.0] of itself.
fn confidence_boost(confidence: Option<f32>) -> f32 {
    match confidence {
        Some(c) if c > 0.0 && c <= 1.0 => 0.8 + 0.2 * c,
        _ => 1.0,
    }
}

/// Weighted score for a FAQ match on the given field.
pub fn weighted_faq_score(
    similarity: f32,
    field: MatchField,
    entry: &FaqEntry,
    query: &str,
) -> f32 {
    let field_boost = match field {
        MatchField::Question | MatchField::Content => FAQ_QUESTION_BOOST,
        MatchField::Answer => FAQ_ANSWER_BOOST,
    };
    let mut score = similarity * field_boost;
    if keyword_overlap(query, &entry.keywords) {
        score *= FAQ_KEYWORD_BOOST;
    }
    if entry.from_semantic_analysis {
        score *= match field {
            MatchField::Answer => FAQ_ANALYSIS_ANSWER_BOOST,
            _ => FAQ_ANALYSIS_QUESTION_BOOST,
        };
    }
    score * confidence_boost(entry.confidence)
}

/// Weighted score for a chunk content match.
pub fn weighted_chunk_score(similarity: f32, chunk: &ChunkEntry, query: &str) -> f32 {
    let mut score = similarity;
    if keyword_overlap(query, &chunk.keywords) {
        score *= CHUNK_KEYWORD_BOOST;
    }
    score *= confidence_boost(chunk.confidence);
    score *= match chunk.importance {
        Importance::High => CHUNK_IMPORTANCE_HIGH_BOOST,
        Importance::Medium => CHUNK_IMPORTANCE_MEDIUM_BOOST,
        Importance::Low => 1.0,
    };
    score *= match chunk.kind {
        ChunkKind::Page => CHUNK_KIND_PAGE_BOOST,
        ChunkKind::Heading => CHUNK_KIND_HEADING_BOOST,
        ChunkKind::Other => 1.0,
    };
    score
}

/// Document-name matches carry no boost.
pub fn weighted_document_score(similarity: f32) -> f32 {
    similarity
}

/// Image matches carry no boost; graphs get a small one.
pub fn weighted_media_score(similarity: f32, kind: MediaKind) -> f32 {
    match kind {
        MediaKind::Image => similarity,
        MediaKind::Graph => similarity * GRAPH_BOOST,
    }
}
