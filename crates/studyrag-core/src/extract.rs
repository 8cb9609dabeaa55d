//! Plain-text document source with form-feed page breaks.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::traits::TextExtractor;
use crate::types::PageText;

/// Reads text files where a form-feed (`\u{c}`) separates pages, the shape
/// `pdftotext`-style converters emit. A file without form-feeds is one page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract_pages(&self, handle: &str) -> anyhow::Result<Vec<PageText>> {
        let raw = tokio::fs::read_to_string(handle).await?;
        Ok(pages_from_text(&raw))
    }
}

/// Splits raw text on form-feed markers into 1-based pages. Blank pages are
/// skipped but keep their position in the numbering.
pub fn pages_from_text(raw: &str) -> Vec<PageText> {
    raw.split('\u{c}')
        .enumerate()
        .filter_map(|(i, page)| {
            let text = page.trim();
            if text.is_empty() {
                return None;
            }
            Some(PageText {
                page_number: u32::try_from(i).unwrap_or(u32::MAX).saturating_add(1),
                text: text.to_string(),
            })
        })
        .collect()
}

/// Lists `.txt` files under `root`, sorted for deterministic ingestion order.
pub fn list_text_files(root: &Path) -> Vec<PathBuf> {
    let mut txt_files = Vec::new();
    for entry in walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("txt") {
            txt_files.push(path.to_path_buf());
        }
    }
    txt_files.sort();
    txt_files
}
