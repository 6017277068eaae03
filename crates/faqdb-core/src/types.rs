//! Domain types shared by the embedding, ranking and search crates.

use serde::{Deserialize, Serialize};

pub type ItemId = String;

/// Kind of an individual search result.
///
/// Media items split into `Image` and `Graph` at result granularity even
/// though a single searcher serves both.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ResultKind {
    Faq,
    Chunk,
    Document,
    Image,
    Graph,
}

/// Granularity at which searchers and snapshot reads operate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Faq,
    Chunk,
    Document,
    Media,
}

/// A pre-authored question/answer pair.
///
/// - `keywords`: semantic keywords extracted at authoring time
/// - `from_semantic_analysis`: provenance flag set when the entry was
///   generated by the analysis pipeline rather than hand-written
/// - `confidence`: optional authoring confidence in (0, 1]
/// - `question_embedding`/`answer_embedding`: stored vectors, absent until
///   the background embed worker has processed the entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub id: ItemId,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub from_semantic_analysis: bool,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub question_embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub answer_embedding: Option<Vec<f32>>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Importance assigned to a chunk during ingestion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

/// Structural role of a chunk within its source document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    Page,
    Heading,
    Other,
}

/// A chunk of an ingested document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkEntry {
    pub id: ItemId,
    pub document_id: ItemId,
    pub content: String,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub chunk_index: usize,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_importance")]
    pub importance: Importance,
    #[serde(default = "default_chunk_kind")]
    pub kind: ChunkKind,
    #[serde(default)]
    pub confidence: Option<f32>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// A whole ingested document, matched on its name/summary embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Graph,
}

/// An image or graph extracted from a document, matched on its caption
/// embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaEntry {
    pub id: ItemId,
    pub kind: MediaKind,
    pub caption: String,
    #[serde(default)]
    pub document_id: Option<ItemId>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Tagged union over the four snapshot record types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceRecord {
    Faq(FaqEntry),
    Chunk(ChunkEntry),
    Document(DocumentEntry),
    Media(MediaEntry),
}

impl SourceRecord {
    pub fn id(&self) -> &str {
        match self {
            SourceRecord::Faq(f) => &f.id,
            SourceRecord::Chunk(c) => &c.id,
            SourceRecord::Document(d) => &d.id,
            SourceRecord::Media(m) => &m.id,
        }
    }

    pub fn source_kind(&self) -> SourceKind {
        match self {
            SourceRecord::Faq(_) => SourceKind::Faq,
            SourceRecord::Chunk(_) => SourceKind::Chunk,
            SourceRecord::Document(_) => SourceKind::Document,
            SourceRecord::Media(_) => SourceKind::Media,
        }
    }
}

/// Which stored field of a FAQ entry an index candidate matched on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Question,
    Answer,
    Content,
}

/// A single ranked hit returned by the orchestrator.
///
/// `similarity` is the raw cosine similarity of the winning match and
/// `score` is derived from it by the documented multiplicative boosts,
/// never an independent value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: ItemId,
    pub kind: ResultKind,
    pub title: String,
    pub body: String,
    pub similarity: f32,
    pub score: f32,
    pub document_id: Option<ItemId>,
}

/// Per-call search options. Defaults mirror the configuration table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    pub limit: usize,
    pub min_similarity: f32,
    pub include_faqs: bool,
    pub include_chunks: bool,
    pub include_documents: bool,
    pub include_images: bool,
    pub include_graphs: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            min_similarity: 0.45,
            include_faqs: true,
            include_chunks: true,
            include_documents: true,
            include_images: true,
            include_graphs: true,
        }
    }
}

impl SearchOptions {
    /// Options restricted to the FAQ source, used by `find_best_match`.
    pub fn faq_only(limit: usize, min_similarity: f32) -> Self {
        Self {
            limit,
            min_similarity,
            include_faqs: true,
            include_chunks: false,
            include_documents: false,
            include_images: false,
            include_graphs: false,
        }
    }
}

/// Fixed named thresholds used by callers of `find_best_match`.
pub const HIGH_CONFIDENCE: f32 = 0.65;
pub const MEDIUM_CONFIDENCE: f32 = 0.45;

/// How confident the caller should be in a best-match similarity:
/// `High` answers directly, `Medium` answers with a hedge, `None` renders
/// the configured no-answer fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    None,
}

impl ConfidenceBand {
    pub fn for_similarity(similarity: f32) -> Self {
        if similarity >= HIGH_CONFIDENCE {
            ConfidenceBand::High
        } else if similarity >= MEDIUM_CONFIDENCE {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::None
        }
    }
}

fn default_active() -> bool {
    true
}

fn default_importance() -> Importance {
    Importance::Low
}

fn default_chunk_kind() -> ChunkKind {
    ChunkKind::Other
}
