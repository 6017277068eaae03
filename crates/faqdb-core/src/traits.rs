//! Collaborator interfaces implemented outside the retrieval core.
//!
//! The embedding backend and the server-side vector index are remote,
//! possibly-absent dependencies; the snapshot store is the read-only view of
//! the persistent record tables used by the brute-force fallback.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{MatchField, SourceKind, SourceRecord};

/// Remote embedding model.
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Default implementation embeds sequentially; backends with native
    /// batching should override it.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

/// One candidate row returned by the server-side vector index.
///
/// The index returns the matched record inline so the client can apply the
/// same weighting rules as the brute-force path without a second fetch.
#[derive(Debug, Clone)]
pub struct IndexCandidate {
    pub record: SourceRecord,
    pub field: MatchField,
    pub similarity: f32,
}

/// Server-side vector index, consumed over RPC.
///
/// Errors (including "not implemented" deployments) are normal and trigger
/// the client-side brute-force fallback; implementations must never panic
/// on an absent index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn query(
        &self,
        kind: SourceKind,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<IndexCandidate>>;
}

/// Snapshot read over the persistent record tables.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn list_active(&self, kind: SourceKind) -> Result<Vec<SourceRecord>>;
}
