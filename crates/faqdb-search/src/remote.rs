//! Bounded client for the server-side vector index.
//!
//! Every remote query runs under the per-source timeout. A
//! `VectorIndexUnavailable` response (missing/unimplemented index) is
//! memoized per process so later calls skip the remote attempt and go
//! straight to the brute-force path. A timed-out query's eventual result is
//! simply dropped with its future; nothing lingers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use faqdb_core::traits::{IndexCandidate, VectorIndex};
use faqdb_core::types::SourceKind;
use faqdb_core::{Error, Result};

pub(crate) struct IndexClient {
    index: Arc<dyn VectorIndex>,
    kind: SourceKind,
    timeout: Duration,
    unavailable: AtomicBool,
}

impl IndexClient {
    pub(crate) fn new(index: Arc<dyn VectorIndex>, kind: SourceKind, timeout: Duration) -> Self {
        Self { index, kind, timeout, unavailable: AtomicBool::new(false) }
    }

    pub(crate) async fn query(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: usize,
    ) -> Result<Vec<IndexCandidate>> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(Error::VectorIndexUnavailable("cached as unavailable".into()));
        }
        let attempt = self.index.query(self.kind, embedding, threshold, limit);
        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(Ok(candidates)) => Ok(candidates),
            Ok(Err(e)) => {
                if matches!(e, Error::VectorIndexUnavailable(_)) {
                    debug!(kind = ?self.kind, "vector index reported unavailable, remembering");
                    self.unavailable.store(true, Ordering::Relaxed);
                }
                Err(e)
            }
            Err(_) => Err(Error::Timeout(self.timeout.as_millis() as u64)),
        }
    }
}
