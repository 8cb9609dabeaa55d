//! Sentence-aware text segmentation with overlap and page attribution.
//!
//! Pages are joined into one buffer with their byte spans recorded, and every
//! sentence carries its span in that buffer. A chunk's page range is then a
//! plain offset lookup instead of substring probing against page prefixes.

use tracing::debug;

use crate::types::PageText;

/// A segment of source text destined to become an indexed chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub start_page: u32,
    pub end_page: u32,
}

/// Packs sentences into chunks of roughly `target_size` characters, seeding
/// each chunk with the tail of the previous one so adjacent chunks share
/// context across the boundary.
#[derive(Debug, Clone)]
pub struct Segmenter {
    target_size: usize,
    overlap: usize,
}

#[derive(Debug, Clone, Copy)]
struct PageSpan {
    start: usize,
    end: usize,
    page_number: u32,
}

#[derive(Debug, Clone, Copy)]
struct SentenceSpan {
    start: usize,
    end: usize,
}

impl Segmenter {
    pub fn new(target_size: usize, overlap: usize) -> Self {
        Self {
            target_size,
            overlap,
        }
    }

    /// Splits page-ordered text into overlapping, sentence-packed segments.
    ///
    /// Empty or whitespace-only input yields no segments; callers treat that
    /// as "nothing indexable", not an error. Text shorter than the target
    /// size comes back as exactly one segment.
    pub fn segment_pages(&self, pages: &[PageText]) -> Vec<Segment> {
        let (full, page_spans) = join_pages(pages);
        let sentences = split_sentences(&full);
        if sentences.is_empty() {
            return Vec::new();
        }

        let mut segments = Vec::new();
        let mut buffer = String::new();
        let mut buffer_chars = 0usize;
        let mut span_start = 0usize;
        let mut span_end = 0usize;

        for sentence in &sentences {
            let text = normalize_whitespace(&full[sentence.start..sentence.end]);
            if text.is_empty() {
                continue;
            }
            let text_chars = text.chars().count();

            if !buffer.is_empty() && buffer_chars + 1 + text_chars > self.target_size {
                segments.push(emit(&page_spans, &buffer, span_start, span_end));
                let (seed, seed_start) = overlap_tail(&full, span_end, self.overlap);
                span_start = if seed.is_empty() {
                    sentence.start
                } else {
                    seed_start
                };
                buffer = seed;
                buffer_chars = buffer.chars().count();
            }

            if buffer.is_empty() {
                span_start = sentence.start;
                buffer = text;
                buffer_chars = text_chars;
            } else {
                buffer.push(' ');
                buffer.push_str(&text);
                buffer_chars += 1 + text_chars;
            }
            span_end = sentence.end;
        }

        if !buffer.is_empty() {
            segments.push(emit(&page_spans, &buffer, span_start, span_end));
        }

        debug!(segments = segments.len(), "segmented document");
        segments
    }

    /// Segments free-standing text as a single page.
    pub fn segment_text(&self, text: &str) -> Vec<Segment> {
        let pages = [PageText {
            page_number: 1,
            text: text.to_string(),
        }];
        self.segment_pages(&pages)
    }
}

fn emit(page_spans: &[PageSpan], text: &str, start: usize, end: usize) -> Segment {
    let (start_page, end_page) = page_range(page_spans, start, end);
    Segment {
        text: text.to_string(),
        start_page,
        end_page,
    }
}

fn join_pages(pages: &[PageText]) -> (String, Vec<PageSpan>) {
    let mut full = String::new();
    let mut spans = Vec::with_capacity(pages.len());
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            full.push_str("\n\n");
        }
        let start = full.len();
        full.push_str(&page.text);
        spans.push(PageSpan {
            start,
            end: full.len(),
            page_number: page.page_number,
        });
    }
    (full, spans)
}

/// Maps a byte span of the joined buffer to the pages it overlaps.
/// Spans outside every recorded page default to page 1.
fn page_range(spans: &[PageSpan], start: usize, end: usize) -> (u32, u32) {
    let start_page = spans.iter().find(|s| s.end > start).map(|s| s.page_number);
    let end_page = spans
        .iter()
        .rev()
        .find(|s| s.start < end)
        .map(|s| s.page_number);
    match (start_page, end_page) {
        (Some(a), Some(b)) if a <= b => (a, b),
        (Some(a), _) => (a, a),
        _ => (1, 1),
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Splits text into sentence spans on terminal punctuation followed by
/// whitespace (or end of input). Spans keep their terminators; fragments
/// with no content beyond punctuation and whitespace are dropped.
fn split_sentences(text: &str) -> Vec<SentenceSpan> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let n = chars.len();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < n {
        while i < n && chars[i].1.is_whitespace() {
            i += 1;
        }
        if i >= n {
            break;
        }
        let start = chars[i].0;
        let mut has_content = false;
        let mut end = None;

        while i < n {
            let c = chars[i].1;
            if is_terminator(c) {
                let mut j = i + 1;
                while j < n && is_terminator(chars[j].1) {
                    j += 1;
                }
                if j >= n || chars[j].1.is_whitespace() {
                    end = Some(byte_at(&chars, j, text));
                    i = j;
                    break;
                }
                // Punctuation inside a token, e.g. "3.14" or "e.g.x".
                i = j;
                continue;
            }
            if !c.is_whitespace() {
                has_content = true;
            }
            i += 1;
        }

        let end = end.unwrap_or(text.len());
        if has_content {
            spans.push(SentenceSpan { start, end });
        }
    }
    spans
}

fn byte_at(chars: &[(usize, char)], idx: usize, text: &str) -> usize {
    if idx < chars.len() {
        chars[idx].0
    } else {
        text.len()
    }
}

/// Returns the trailing `overlap` characters before `end`, extended left to
/// the start of the word they fall in, plus the byte offset where the tail
/// begins in the source buffer.
fn overlap_tail(full: &str, end: usize, overlap: usize) -> (String, usize) {
    if overlap == 0 || end == 0 {
        return (String::new(), end);
    }
    let head = &full[..end];
    let mut start = end;
    for (count, (idx, _)) in head.char_indices().rev().enumerate() {
        start = idx;
        if count + 1 >= overlap {
            break;
        }
    }
    let mut word_start = start;
    for (idx, c) in head[..start].char_indices().rev() {
        if c.is_whitespace() {
            break;
        }
        word_start = idx;
    }
    let seed = normalize_whitespace(&head[word_start..end]);
    if seed.is_empty() {
        return (String::new(), end);
    }
    (seed, word_start)
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
