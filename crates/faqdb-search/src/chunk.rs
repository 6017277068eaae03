//! Chunk source searcher. Same shape as the FAQ searcher, single
//! content-embedding field.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use faqdb_core::traits::{IndexCandidate, SnapshotStore, VectorIndex};
use faqdb_core::types::{ChunkEntry, ResultKind, SearchResult, SourceKind, SourceRecord};
use faqdb_rank::{cosine_similarity, weighted_chunk_score};

use crate::remote::IndexClient;
use crate::sort_and_truncate;

pub struct ChunkSearcher {
    client: IndexClient,
    store: Arc<dyn SnapshotStore>,
}

impl ChunkSearcher {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        store: Arc<dyn SnapshotStore>,
        timeout: Duration,
    ) -> Self {
        Self { client: IndexClient::new(index, SourceKind::Chunk, timeout), store }
    }

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
                warn!(error = %e, "chunk index query failed, brute-force fallback");
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
        let results = candidates
            .into_iter()
            .filter_map(|candidate| {
                let SourceRecord::Chunk(entry) = candidate.record else { return None };
                if !entry.active || candidate.similarity < threshold {
                    return None;
                }
                Some(to_result(candidate.similarity, &entry, query))
            })
            .collect();
        sort_and_truncate(results, limit)
    }

    async fn brute_force(
        &self,
        query: &str,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Vec<SearchResult> {
        let records = match self.store.list_active(SourceKind::Chunk).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "chunk snapshot unavailable, source contributes nothing");
                return Vec::new();
            }
        };

        let mut results = Vec::new();
        for record in records {
            let SourceRecord::Chunk(entry) = record else { continue };
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
                results.push(to_result(similarity, &entry, query));
            }
        }
        sort_and_truncate(results, limit)
    }
}

fn to_result(similarity: f32, entry: &ChunkEntry, query: &str) -> SearchResult {
    SearchResult {
        id: entry.id.clone(),
        kind: ResultKind::Chunk,
        title: entry.document_id.clone(),
        body: entry.content.clone(),
        similarity,
        score: weighted_chunk_score(similarity, entry, query),
        document_id: Some(entry.document_id.clone()),
    }
}
