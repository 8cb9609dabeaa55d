//! Query-relevant snippet extraction for retrieved chunks.

use studyrag_core::types::{Chunk, Citation};

const FRAGMENT_MIN_CHARS: usize = 10;
const FALLBACK_SNIPPET_CHARS: usize = 150;
const SNIPPET_CHARS: usize = 200;
const MAX_FRAGMENTS: usize = 3;
// Query tokens must be strictly longer than this to count.
const QUERY_TOKEN_MIN_CHARS: usize = 3;

/// Builds a page-attributed snippet highlighting the query's terms.
///
/// When the query carries no usable tokens, or none of the chunk's
/// fragments mention them, the snippet falls back to the chunk's opening
/// text instead of failing.
pub fn build_citation(chunk: &Chunk, document_name: &str, query: &str) -> Citation {
    let start = chunk.start_page.max(1);
    let end = chunk.end_page.max(start);
    let pages: Vec<u32> = (start..=end).collect();

    let fragments: Vec<&str> = split_fragments(&chunk.text);
    let query_lower = query.to_lowercase();
    let terms: Vec<&str> = query_lower
        .split_whitespace()
        .filter(|w| w.chars().count() > QUERY_TOKEN_MIN_CHARS)
        .collect();

    let snippet = select_snippet(&chunk.text, &fragments, &terms);

    Citation {
        doc_id: chunk.doc_id,
        document_name: document_name.to_string(),
        pages,
        snippet,
    }
}

fn select_snippet(chunk_text: &str, fragments: &[&str], terms: &[&str]) -> String {
    if fragments.is_empty() || terms.is_empty() {
        return truncate(chunk_text, FALLBACK_SNIPPET_CHARS);
    }

    let scored: Vec<(usize, usize)> = fragments
        .iter()
        .enumerate()
        .map(|(i, fragment)| {
            let lower = fragment.to_lowercase();
            let score = terms.iter().filter(|t| lower.contains(**t)).count();
            (i, score)
        })
        .collect();

    if scored.iter().all(|(_, score)| *score == 0) {
        return truncate(chunk_text, FALLBACK_SNIPPET_CHARS);
    }

    let mut ranked = scored;
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let mut picked: Vec<usize> = ranked
        .into_iter()
        .take(MAX_FRAGMENTS)
        .map(|(i, _)| i)
        .collect();
    // Rejoin the winners in their original order.
    picked.sort_unstable();

    let joined = picked
        .iter()
        .map(|&i| fragments[i])
        .collect::<Vec<_>>()
        .join(" ");
    truncate(&joined, SNIPPET_CHARS)
}

/// Sentence-like fragments long enough to stand alone in a snippet.
fn split_fragments(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|f| f.chars().count() > FRAGMENT_MIN_CHARS)
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
