//! Media source searcher, serving both image and graph results from the
//! caption embedding. Result kinds can be filtered independently because the
//! orchestrator exposes separate include flags for images and graphs.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use faqdb_core::traits::{IndexCandidate, SnapshotStore, VectorIndex};
use faqdb_core::types::{MediaEntry, MediaKind, ResultKind, SearchResult, SourceKind, SourceRecord};
use faqdb_rank::{cosine_similarity, weighted_media_score};

use crate::remote::IndexClient;
use crate::sort_and_truncate;

pub struct MediaSearcher {
    client: IndexClient,
    store: Arc<dyn SnapshotStore>,
}

#[derive(Clone, Copy)]
pub struct MediaFilter {
    pub images: bool,
    pub graphs: bool,
}

impl MediaFilter {
    fn admits(&self, kind: MediaKind) -> bool {
        match kind {
            MediaKind::Image => self.images,
            MediaKind::Graph => self.graphs,
        }
    }
}

impl MediaSearcher {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        store: Arc<dyn SnapshotStore>,
        timeout: Duration,
    ) -> Self {
        Self { client: IndexClient::new(index, SourceKind::Media, timeout), store }
    }

    pub async fn search(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
        filter: MediaFilter,
    ) -> Vec<SearchResult> {
        match self.client.query(embedding, threshold, limit).await {
            Ok(candidates) => Self::from_candidates(candidates, threshold, limit, filter),
            Err(e) => {
                warn!(error = %e, "media index query failed, brute-force fallback");
                self.brute_force(embedding, threshold, limit, filter).await
            }
        }
    }

    fn from_candidates(
        candidates: Vec<IndexCandidate>,
        threshold: f32,
        limit: usize,
        filter: MediaFilter,
    ) -> Vec<SearchResult> {
        let results = candidates
            .into_iter()
            .filter_map(|candidate| {
                let SourceRecord::Media(entry) = candidate.record else { return None };
                if !entry.active || !filter.admits(entry.kind) || candidate.similarity < threshold {
                    return None;
                }
                Some(to_result(candidate.similarity, &entry))
            })
            .collect();
        sort_and_truncate(results, limit)
    }

    async fn brute_force(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
        filter: MediaFilter,
    ) -> Vec<SearchResult> {
        let records = match self.store.list_active(SourceKind::Media).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "media snapshot unavailable, source contributes nothing");
                return Vec::new();
            }
        };

        let mut results = Vec::new();
        for record in records {
            let SourceRecord::Media(entry) = record else { continue };
            if !entry.active || !filter.admits(entry.kind) {
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

fn to_result(similarity: f32, entry: &MediaEntry) -> SearchResult {
    let kind = match entry.kind {
        MediaKind::Image => ResultKind::Image,
        MediaKind::Graph => ResultKind::Graph,
    };
    SearchResult {
        id: entry.id.clone(),
        kind,
        title: entry.caption.clone(),
        body: String::new(),
        similarity,
        score: weighted_media_score(similarity, entry.kind),
        document_id: entry.document_id.clone(),
    }
}
