//! FAQ source searcher.
//!
//! Races the server-side vector index against the per-source timeout and
//! falls back to a brute-force cosine scan over the active FAQ snapshot.
//! Both paths apply the same weighting, so they differ only in performance.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use faqdb_core::traits::{IndexCandidate, SnapshotStore, VectorIndex};
use faqdb_core::types::{FaqEntry, MatchField, ResultKind, SearchResult, SourceKind, SourceRecord};
use faqdb_rank::{cosine_similarity, weighted_faq_score};

use crate::remote::IndexClient;
use crate::sort_and_truncate;

pub struct FaqSearcher {
    client: IndexClient,
    store: Arc<dyn SnapshotStore>,
}

/// One scored field match, before per-entry dedup.
struct FieldMatch {
    entry: FaqEntry,
    similarity: f32,
    score: f32,
}

impl FaqSearcher {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        store: Arc<dyn SnapshotStore>,
        timeout: Duration,
    ) -> Self {
        Self { client: IndexClient::new(index, SourceKind::Faq, timeout), store }
    }

    /// Never fails: a source that cannot produce results contributes an
    /// empty list.
    pub async fn search(
        &self,
        query: &str,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Vec<SearchResult> {
        match self.client.query(embedding, threshold, limit).await {
            Ok(candidates) => Self::from_candidates(query, candidates, threshold, limit),
            Err(e) => {
                warn!(error = %e, "faq index query failed, brute-force fallback");
                self.brute_force(query, embedding, threshold, limit).await
            }
        }
    }

    fn from_candidates(
        query: &str,
        candidates: Vec<IndexCandidate>,
        threshold: f32,
        limit: usize,
    ) -> Vec<SearchResult> {
        let mut best: HashMap<String, FieldMatch> = HashMap::new();
        for candidate in candidates {
            let SourceRecord::Faq(entry) = candidate.record else { continue };
            if !entry.active || candidate.similarity < threshold {
                continue;
            }
            let score = weighted_faq_score(candidate.similarity, candidate.field, &entry, query);
            merge_match(&mut best, FieldMatch { entry, similarity: candidate.similarity, score });
        }
        finish(best, threshold, limit)
    }

    async fn brute_force(
        &self,
        query: &str,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Vec<SearchResult> {
        let records = match self.store.list_active(SourceKind::Faq).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "faq snapshot unavailable, source contributes nothing");
                return Vec::new();
            }
        };

        let mut best: HashMap<String, FieldMatch> = HashMap::new();
        for record in records {
            let SourceRecord::Faq(entry) = record else { continue };
            if !entry.active {
                continue;
            }
            let fields = [
                (MatchField::Question, entry.question_embedding.as_deref()),
                (MatchField::Answer, entry.answer_embedding.as_deref()),
            ];
            for (field, stored) in fields {
                let Some(stored) = stored else { continue };
                let similarity = match cosine_similarity(embedding, stored) {
                    Ok(s) => s,
                    Err(e) => {
                        warn!(id = %entry.id, field = ?field, error = %e, "skipping stale embedding");
                        continue;
                    }
                };
                if similarity < threshold {
                    continue;
                }
                let score = weighted_faq_score(similarity, field, &entry, query);
                merge_match(
                    &mut best,
                    FieldMatch { entry: entry.clone(), similarity, score },
                );
            }
        }
        finish(best, threshold, limit)
    }
}

/// Question and answer matches for the same entry compete: the higher
/// weighted score wins and the reported similarity is the winning match's
/// similarity.
fn merge_match(best: &mut HashMap<String, FieldMatch>, candidate: FieldMatch) {
    match best.get_mut(&candidate.entry.id) {
        Some(existing) if candidate.score > existing.score => *existing = candidate,
        Some(_) => {}
        None => {
            best.insert(candidate.entry.id.clone(), candidate);
        }
    }
}

fn finish(best: HashMap<String, FieldMatch>, threshold: f32, limit: usize) -> Vec<SearchResult> {
    let results = best
        .into_values()
        .filter(|m| m.similarity >= threshold)
        .map(|m| SearchResult {
            id: m.entry.id.clone(),
            kind: ResultKind::Faq,
            title: m.entry.question.clone(),
            body: m.entry.answer,
            similarity: m.similarity,
            score: m.score,
            document_id: None,
        })
        .collect();
    sort_and_truncate(results, limit)
}
