//! Domain types shared by the segmenter, index, and citation builder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type DocId = u64;
pub type ChunkId = String;

/// One page of extracted text, as produced by a `TextExtractor`.
///
/// Page numbers are 1-based and arrive in reading order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    pub page_number: u32,
    pub text: String,
}

/// A document registered in the index.
///
/// Created on ingestion, destroyed on explicit removal or a full clear.
/// Immutable once created; re-ingesting the same file yields a second
/// document with a fresh id rather than a merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub display_name: String,
    pub page_count: u32,
    pub ingested_at: DateTime<Utc>,
}

/// A bounded, possibly overlapping slice of document text: the unit of
/// indexing and retrieval.
///
/// Invariants: `start_page <= end_page`, both within the owning document's
/// page range; `text` is non-empty; `vector` has the encoder's dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub doc_id: DocId,
    pub text: String,
    pub start_page: u32,
    pub end_page: u32,
    pub vector: Vec<f32>,
}

/// A chunk paired with its similarity to a query. Transient, never stored.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Page-attributed, query-relevant snippet derived from a retrieved chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    pub doc_id: DocId,
    pub document_name: String,
    pub pages: Vec<u32>,
    pub snippet: String,
}

/// One row of citable search output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub doc_id: DocId,
    pub document_name: String,
    pub pages: Vec<u32>,
    pub snippet: String,
    pub score: f32,
}

/// Counters reported by the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub document_count: usize,
    pub chunk_count: usize,
}
