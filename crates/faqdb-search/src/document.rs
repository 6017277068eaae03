//! Document source searcher, matching on the document name/summary
//! embedding. No boost: score equals raw similarity.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use faqdb_core::traits::{IndexCandidate, SnapshotStore, VectorIndex};
use faqdb_core::types::{DocumentEntry, ResultKind, SearchResult, SourceKind, SourceRecord};
use faqdb_rank::{cosine_similarity, weighted_document_score};

use crate::remote::IndexClient;
use crate::sort_and_truncate;

pub struct DocumentSearcher {
    client: IndexClient,
    store: Arc<dyn SnapshotStore>,
}

impl DocumentSearcher {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        store: Arc<dyn SnapshotStore>,
        timeout: Duration,
    ) -> Self {
        Self { client: IndexClient::new(index, SourceKind::Document, timeout), store }
    }

    pub async fn search(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Vec<SearchResult> {
        match self.client.query(embedding, threshold, limit).await {
            Ok(candidates) => Self::from_candidates(candidates, threshold, limit),
            Err(e) => {
                warn!(error = %e, "document index query failed, brute-force fallback");
                self.brute_force(embedding, threshold, limit).await
            }
        }
    }

    fn from_candidates(
        candidates: Vec<IndexCandidate>,
        threshold: f32,
        limit: usize,
    ) -> Vec<SearchResult> {
        let results = candidates
            .into_iter()
            .filter_map(|candidate| {
                let SourceRecord::Document(entry) = candidate.record else { return None };
                if !entry.active || candidate.similarity < threshold {
                    return None;
                }
                Some(to_result(candidate.similarity, &entry))
            })
            .collect();
        sort_and_truncate(results, limit)
    }

    async fn brute_force(&self, embedding: &[f32], threshold: f32, limit: usize) -> Vec<SearchResult> {
        let records = match self.store.list_active(SourceKind::Document).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "document snapshot unavailable, source contributes nothing");
                return Vec::new();
            }
        };

        let mut results = Vec::new();
        for record in records {
            let SourceRecord::Document(entry) = record else { continue };
            if !entry.active {
                continue;
            }
            let Some(stored) = entry.embedding.as_deref() else { continue };
            let similarity = match cosine_similarity(embedding, stored) {
                Ok(s) => s,
                Err(e) => {
                    warn!(id = %entry.id, error = %e, "skipping stale embedding");
                    continue;
                }
            };
            if similarity >= threshold {
                results.push(to_result(similarity, &entry));
            }
        }
        sort_and_truncate(results, limit)
    }
}

fn to_result(similarity: f32, entry: &DocumentEntry) -> SearchResult {
    SearchResult {
        id: entry.id.clone(),
        kind: ResultKind::Document,
        title: entry.name.clone(),
        body: entry.summary.clone(),
        similarity,
        score: weighted_document_score(similarity),
        document_id: None,
    }
}
