//! Lexical fallback matcher over FAQ entries.
//!
//! Used only when the query embedding is flagged degraded: a non-semantic
//! vector would rank everything with misleading confidence, so the degraded
//! regime runs this ladder instead and the two regimes are never blended.
//!
//! Ladder per entry, first rung that fires wins:
//! 1. direct containment between query and question (ratio x 1.2, cap 1.0)
//! 2. word-level overlap against question + answer (blend x 0.9, cap 0.85)
//! 3. any semantic keyword inside the query (0.6)
//! 4. category inside the query (0.5)
//! 5. excluded

use faqdb_core::types::{FaqEntry, ResultKind, SearchOptions, SearchResult};

/// Minimum query length for the containment rung.
const MIN_CONTAINMENT_CHARS: usize = 3;
/// Minimum word/keyword/category length considered at all.
const MIN_TOKEN_CHARS: usize = 2;

pub fn keyword_search(faqs: &[FaqEntry], query: &str, options: &SearchOptions) -> Vec<SearchResult> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<SearchResult> = faqs
        .iter()
        .filter(|f| f.active)
        .filter_map(|f| {
            let score = match_score(f, &query)?;
            if score < options.min_similarity {
                return None;
            }
            Some(SearchResult {
                id: f.id.clone(),
                kind: ResultKind::Faq,
                title: f.question.clone(),
                body: f.answer.clone(),
                // One lexical number drives the whole keyword regime.
                similarity: score,
                score,
                document_id: None,
            })
        })
        .collect();

    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    results.truncate(options.limit);
    results
}

fn match_score(entry: &FaqEntry, query: &str) -> Option<f32> {
    let question = entry.question.trim().to_lowercase();

    if let Some(score) = containment_score(query, &question) {
        return Some(score);
    }
    if let Some(score) = word_overlap_score(query, entry, &question) {
        return Some(score);
    }
    if entry.keywords.iter().any(|k| {
        let k = k.trim().to_lowercase();
        k.chars().count() >= MIN_TOKEN_CHARS && query.contains(&k)
    }) {
        return Some(0.6);
    }
    let category = entry.category.trim().to_lowercase();
    if category.chars().count() >= MIN_TOKEN_CHARS && query.contains(&category) {
        return Some(0.5);
    }
    None
}

fn containment_score(query: &str, question: &str) -> Option<f32> {
    let q_len = query.chars().count();
    if q_len < MIN_CONTAINMENT_CHARS || question.is_empty() {
        return None;
    }
    if question.contains(query) || query.contains(question) {
        let question_len = question.chars().count();
        let ratio = q_len.min(question_len) as f32 / q_len.max(question_len) as f32;
        Some((ratio * 1.2).min(1.0))
    } else {
        None
    }
}

fn word_overlap_score(query: &str, entry: &FaqEntry, question: &str) -> Option<f32> {
    let words: Vec<String> = query
        .split_whitespace()
        .map(|w| w.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|w| w.chars().count() >= MIN_TOKEN_CHARS)
        .collect();
    if words.is_empty() {
        return None;
    }

    let answer = entry.answer.trim().to_lowercase();
    let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
    let mut matched_words = 0usize;
    let mut matched_chars = 0usize;
    for word in &words {
        if question.contains(word.as_str()) || answer.contains(word.as_str()) {
            matched_words += 1;
            matched_chars += word.chars().count();
        }
    }
    if matched_words == 0 {
        return None;
    }

    let word_ratio = matched_words as f32 / words.len() as f32;
    let char_ratio = matched_chars as f32 / total_chars as f32;
    Some(((word_ratio * 0.6 + char_ratio * 0.4) * 0.9).min(0.85))
}
