use async_trait::async_trait;

use crate::types::PageText;

/// Supplies page-ordered plain text for an opaque document handle.
///
/// Implementations own their timeout and retry policy. The index only maps
/// a failure to `Error::ExtractionFailed` scoped to the failing document.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_pages(&self, handle: &str) -> anyhow::Result<Vec<PageText>>;
}

/// Maps text to a fixed-length feature vector.
///
/// `embed` is total and deterministic: the same text always yields the same
/// vector, and every vector has exactly `dim` components.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed(&self, text: &str) -> Vec<f32>;
}
