//! Top-level search entry point.
//!
//! One search call: embed the query under the outer timeout, pick the
//! ranking regime (vector path for semantic embeddings, keyword ladder for
//! degraded ones — never blended), fan out to the enabled source searchers
//! concurrently, then merge, filter, sort and truncate.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use faqdb_core::config::SearchConfig;
use faqdb_core::traits::{SnapshotStore, VectorIndex};
use faqdb_core::types::{
    FaqEntry, SearchOptions, SearchResult, SourceKind, SourceRecord, MEDIUM_CONFIDENCE,
};
use faqdb_embed::{hash_embedding, Embedding, EmbeddingService, Trust};
use faqdb_rank::keyword_search;

use crate::media::MediaFilter;
use crate::sort_and_truncate;
use crate::{ChunkSearcher, DocumentSearcher, FaqSearcher, MediaSearcher};

pub struct SearchOrchestrator {
    embeddings: Arc<EmbeddingService>,
    store: Arc<dyn SnapshotStore>,
    faqs: FaqSearcher,
    chunks: ChunkSearcher,
    documents: DocumentSearcher,
    media: MediaSearcher,
    embedding_timeout: Duration,
}

impl SearchOrchestrator {
    pub fn new(
        embeddings: Arc<EmbeddingService>,
        index: Arc<dyn VectorIndex>,
        store: Arc<dyn SnapshotStore>,
        config: &SearchConfig,
    ) -> Self {
        let timeout = config.per_source_timeout();
        Self {
            embeddings,
            faqs: FaqSearcher::new(index.clone(), store.clone(), timeout),
            chunks: ChunkSearcher::new(index.clone(), store.clone(), timeout),
            documents: DocumentSearcher::new(index.clone(), store.clone(), timeout),
            media: MediaSearcher::new(index, store.clone(), timeout),
            store,
            embedding_timeout: config.embedding_timeout(),
        }
    }

    /// The single public search entry point. Never raises: an empty list is
    /// the only expression of "nothing found", whatever failed underneath.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let embedding = self.query_embedding(trimmed).await;
        if embedding.is_degraded() {
            // A non-semantic vector would rank with misleading confidence;
            // delegate wholesale to the lexical ladder instead.
            return self.keyword_fallback(trimmed, options).await;
        }

        let threshold = options.min_similarity;
        let limit = options.limit;
        let vector = &embedding.vector;

        let faq_results = async {
            if options.include_faqs {
                self.faqs.search(trimmed, vector, threshold, limit).await
            } else {
                Vec::new()
            }
        };
        let chunk_results = async {
            if options.include_chunks {
                self.chunks.search(trimmed, vector, threshold, limit).await
            } else {
                Vec::new()
            }
        };
        let document_results = async {
            if options.include_documents {
                self.documents.search(vector, threshold, limit).await
            } else {
                Vec::new()
            }
        };
        let media_results = async {
            let filter =
                MediaFilter { images: options.include_images, graphs: options.include_graphs };
            if filter.images || filter.graphs {
                self.media.search(vector, threshold, limit, filter).await
            } else {
                Vec::new()
            }
        };

        let (mut merged, chunks, documents, media)
            = tokio::join!(faq_results, chunk_results, document_results, media_results);
        merged.extend(chunks);
        merged.extend(documents);
        merged.extend(media);
        merged.retain(|r| r.similarity >= threshold);
        sort_and_truncate(merged, limit)
    }

    /// FAQ-only convenience wrapper. `None` expresses "no match"; callers
    /// map the similarity onto the named confidence bands to decide between
    /// a direct answer, a hedged one, or the no-answer fallback.
    pub async fn find_best_match(&self, query: &str) -> Option<SearchResult> {
        let options = SearchOptions::faq_only(1, MEDIUM_CONFIDENCE);
        self.search(query, &options)
            .await
            .into_iter()
            .next()
            .filter(|r| r.similarity >= MEDIUM_CONFIDENCE)
    }

    /// Embed the query under the outer timeout. Timeouts and backend errors
    /// force the degraded hash path; only blank input short-circuits to an
    /// empty result upstream.
    async fn query_embedding(&self, trimmed: &str) -> Embedding {
        match tokio::time::timeout(self.embedding_timeout, self.embeddings.generate(trimmed)).await
        {
            Ok(Ok(embedding)) => embedding,
            Ok(Err(e)) => {
                warn!(error = %e, "query embedding failed, forcing hash fallback");
                self.degraded(trimmed)
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.embedding_timeout.as_millis() as u64,
                    "query embedding timed out, forcing hash fallback"
                );
                self.degraded(trimmed)
            }
        }
    }

    fn degraded(&self, trimmed: &str) -> Embedding {
        Embedding {
            vector: hash_embedding(trimmed, self.embeddings.dimension()),
            trust: Trust::Degraded,
        }
    }

    /// Degraded regime: lexical matching over the FAQ snapshot only.
    async fn keyword_fallback(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        let records = match self.store.list_active(SourceKind::Faq).await {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "faq snapshot unavailable for keyword fallback");
                return Vec::new();
            }
        };
        let faqs: Vec<FaqEntry> = records
            .into_iter()
            .filter_map(|record| match record {
                SourceRecord::Faq(entry) => Some(entry),
                _ => None,
            })
            .collect();
        keyword_search(&faqs, query, options)
    }
}
