//! In-memory document index: ingestion, scoped ranked search, removal.
//!
//! The chunk store is the only shared mutable resource. A `RwLock` serializes
//! mutations while `search` and `stats` proceed on read locks; a document
//! becomes visible to search in a single write step, after its segmentation
//! and encoding already happened outside the lock.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{info, warn};

use studyrag_core::config::RetrievalConfig;
use studyrag_core::error::{Error, Result};
use studyrag_core::segmenter::Segmenter;
use studyrag_core::traits::{Embedder, TextExtractor};
use studyrag_core::types::{
    Chunk, DocId, Document, IndexStats, PageText, ScoredChunk, SearchResult,
};
use studyrag_embed::cosine_similarity;

use crate::citation::build_citation;

/// Segmentation and retrieval knobs for one index instance.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub chunk_target_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            chunk_target_size: 600,
            chunk_overlap: 100,
            top_k: 3,
        }
    }
}

impl IndexConfig {
    pub fn from_retrieval(config: &RetrievalConfig) -> Self {
        Self {
            chunk_target_size: config.chunk_target_size,
            chunk_overlap: config.chunk_overlap,
            top_k: config.top_k,
        }
    }
}

/// Optional restrictions applied to one search call.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Restrict scoring to these documents; `None` searches the whole index.
    pub scope: Option<Vec<DocId>>,
    /// Override the index's configured result count.
    pub top_k: Option<usize>,
}

/// A named source handed to batch ingestion.
#[derive(Debug, Clone)]
pub struct IngestSource {
    pub handle: String,
    pub display_name: String,
}

impl IngestSource {
    pub fn new(handle: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            display_name: display_name.into(),
        }
    }
}

/// Outcome of a batch ingestion. A failing document lands in `failures`
/// without aborting the rest of the batch.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub added: Vec<Document>,
    pub failures: Vec<IngestFailure>,
}

#[derive(Debug)]
pub struct IngestFailure {
    pub source: String,
    pub error: Error,
}

#[derive(Debug)]
struct IndexState {
    documents: Vec<Document>,
    // Global insertion order; search ties resolve to the earlier chunk.
    chunks: Vec<Chunk>,
    next_doc_id: DocId,
}

pub struct DocumentIndex {
    state: RwLock<IndexState>,
    embedder: Arc<dyn Embedder>,
    segmenter: Segmenter,
    config: IndexConfig,
}

impl DocumentIndex {
    pub fn new(embedder: Arc<dyn Embedder>, config: IndexConfig) -> Self {
        let segmenter = Segmenter::new(config.chunk_target_size, config.chunk_overlap);
        Self {
            state: RwLock::new(IndexState {
                documents: Vec::new(),
                chunks: Vec::new(),
                next_doc_id: 1,
            }),
            embedder,
            segmenter,
            config,
        }
    }

    /// Registers already-extracted pages as a new document.
    ///
    /// Every call creates an independent document with a fresh id; callers
    /// that re-ingest the same file get a second copy, not a merge. Pages
    /// with nothing indexable produce a document with zero chunks.
    pub fn add_document(&self, display_name: &str, pages: &[PageText]) -> Document {
        let segments = self.segmenter.segment_pages(pages);
        let page_count = pages.iter().map(|p| p.page_number).max().unwrap_or(0);
        let encoded: Vec<(Vec<f32>, _)> = segments
            .into_iter()
            .map(|segment| (self.embedder.embed(&segment.text), segment))
            .collect();
        let chunk_count = encoded.len();

        let mut state = self.state.write();
        let id = state.next_doc_id;
        state.next_doc_id += 1;
        let document = Document {
            id,
            display_name: display_name.to_string(),
            page_count,
            ingested_at: Utc::now(),
        };
        for (chunk_index, (vector, segment)) in encoded.into_iter().enumerate() {
            state.chunks.push(Chunk {
                id: format!("{id}:{chunk_index}"),
                doc_id: id,
                text: segment.text,
                start_page: segment.start_page,
                end_page: segment.end_page,
                vector,
            });
        }
        state.documents.push(document.clone());
        info!(
            document = %document.display_name,
            id,
            chunks = chunk_count,
            "indexed document"
        );
        document
    }

    /// Extracts and indexes one document. An extractor failure maps to
    /// `Error::ExtractionFailed` scoped to this document only.
    pub async fn ingest(
        &self,
        extractor: &dyn TextExtractor,
        handle: &str,
        display_name: &str,
    ) -> Result<Document> {
        let pages = extractor
            .extract_pages(handle)
            .await
            .map_err(|e| Error::ExtractionFailed {
                document: display_name.to_string(),
                reason: e.to_string(),
            })?;
        Ok(self.add_document(display_name, &pages))
    }

    /// Ingests sources one at a time, continuing past per-document failures.
    pub async fn ingest_batch(
        &self,
        extractor: &dyn TextExtractor,
        sources: &[IngestSource],
    ) -> IngestReport {
        let mut report = IngestReport::default();
        for source in sources {
            match self
                .ingest(extractor, &source.handle, &source.display_name)
                .await
            {
                Ok(document) => report.added.push(document),
                Err(error) => {
                    warn!(source = %source.display_name, %error, "skipping document");
                    report.failures.push(IngestFailure {
                        source: source.display_name.clone(),
                        error,
                    });
                }
            }
        }
        report
    }

    /// Removes a document and all of its chunks. Unknown ids are a no-op.
    pub fn remove_document(&self, id: DocId) {
        let mut state = self.state.write();
        state.documents.retain(|d| d.id != id);
        state.chunks.retain(|c| c.doc_id != id);
    }

    /// Drops every document and chunk.
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.documents.clear();
        state.chunks.clear();
    }

    pub fn stats(&self) -> IndexStats {
        let state = self.state.read();
        IndexStats {
            document_count: state.documents.len(),
            chunk_count: state.chunks.len(),
        }
    }

    pub fn documents(&self) -> Vec<Document> {
        self.state.read().documents.clone()
    }

    pub fn document_chunks(&self, id: DocId) -> Vec<Chunk> {
        self.state
            .read()
            .chunks
            .iter()
            .filter(|c| c.doc_id == id)
            .cloned()
            .collect()
    }

    /// Full text of a document in chunk order, overlap included; enough fuel
    /// for topic extraction without keeping the raw pages around.
    pub fn document_text(&self, id: DocId) -> Option<String> {
        let state = self.state.read();
        if !state.documents.iter().any(|d| d.id == id) {
            return None;
        }
        let text = state
            .chunks
            .iter()
            .filter(|c| c.doc_id == id)
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Some(text)
    }

    /// Scores every in-scope chunk against the query and returns the best,
    /// highest score first. Ties keep ingestion order so results are
    /// deterministic. An empty index or scope yields an empty Vec.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<ScoredChunk> {
        let query_vector = self.embedder.embed(query);
        let top_k = options.top_k.unwrap_or(self.config.top_k);

        let state = self.state.read();
        let mut scored: Vec<ScoredChunk> = state
            .chunks
            .iter()
            .filter(|c| {
                options
                    .scope
                    .as_ref()
                    .map_or(true, |scope| scope.contains(&c.doc_id))
            })
            .map(|c| ScoredChunk {
                score: cosine_similarity(&query_vector, &c.vector),
                chunk: c.clone(),
            })
            .collect();
        drop(state);

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        scored
    }

    /// Search plus citation formatting: the citable output rows.
    pub fn search_cited(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        let names: HashMap<DocId, String> = self
            .documents()
            .into_iter()
            .map(|d| (d.id, d.display_name))
            .collect();

        self.search(query, options)
            .into_iter()
            .map(|scored| {
                let name = names
                    .get(&scored.chunk.doc_id)
                    .cloned()
                    .unwrap_or_default();
                let citation = build_citation(&scored.chunk, &name, query);
                SearchResult {
                    doc_id: citation.doc_id,
                    document_name: citation.document_name,
                    pages: citation.pages,
                    snippet: citation.snippet,
                    score: scored.score,
                }
            })
            .collect()
    }
}
