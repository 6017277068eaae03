use thiserror::Error;

/// Failure taxonomy for the retrieval core.
///
/// Every variant maps to a local fallback decision: none of these are ever
/// surfaced to the orchestrator's caller. `search` returns an empty list in
/// the worst case, it does not raise.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Empty input: text is blank after trimming")]
    EmptyInput,

    #[error("Embedding backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Timed out after {0} ms")]
    Timeout(u64),

    #[error("Vector index unavailable: {0}")]
    VectorIndexUnavailable(String),

    #[error("Embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
