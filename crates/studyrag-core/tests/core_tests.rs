use std::fs;

use studyrag_core::config::RetrievalConfig;
use studyrag_core::error::Error;
use studyrag_core::extract::{list_text_files, pages_from_text, PlainTextExtractor};
use studyrag_core::segmenter::Segmenter;
use studyrag_core::traits::TextExtractor;
use studyrag_core::types::PageText;
use tempfile::TempDir;

fn page(n: u32, text: &str) -> PageText {
    PageText {
        page_number: n,
        text: text.to_string(),
    }
}

#[test]
fn short_text_becomes_one_segment() {
    let segmenter = Segmenter::new(500, 50);
    let segments = segmenter.segment_text("A single short sentence.");
    assert_eq!(segments.len(), 1, "short input is one segment");
    assert_eq!(segments[0].text, "A single short sentence.");
    assert_eq!((segments[0].start_page, segments[0].end_page), (1, 1));
}

#[test]
fn empty_and_punctuation_only_input_yield_nothing() {
    let segmenter = Segmenter::new(500, 50);
    assert!(segmenter.segment_text("").is_empty());
    assert!(segmenter.segment_text("   \n\t  ").is_empty());
    assert!(
        segmenter.segment_text("... . .").is_empty(),
        "fragments without content are dropped"
    );
}

#[test]
fn segments_cover_every_sentence_in_order() {
    let text = "Alpha bravo charlie delta echo. Foxtrot golf hotel india juliet. \
                Kilo lima mike november oscar.";
    let segmenter = Segmenter::new(40, 0);
    let segments = segmenter.segment_text(text);
    assert_eq!(segments.len(), 3, "one segment per sentence at this size");

    let joined = segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    assert_eq!(joined, normalized, "no sentence lost or reordered");
}

#[test]
fn adjacent_segments_share_trailing_context() {
    let text = "Alpha bravo charlie delta echo. Foxtrot golf hotel india juliet. \
                Kilo lima mike november oscar.";
    let segmenter = Segmenter::new(40, 10);
    let segments = segmenter.segment_text(text);
    assert!(segments.len() >= 2);

    for pair in segments.windows(2) {
        let words: Vec<&str> = pair[1].text.split_whitespace().collect();
        let mut prefix = String::new();
        let mut found = false;
        for word in words {
            if prefix.is_empty() {
                prefix.push_str(word);
            } else {
                prefix.push(' ');
                prefix.push_str(word);
            }
            if pair[0].text.ends_with(&prefix) {
                found = true;
            }
        }
        assert!(
            found,
            "segment should start with the previous segment's tail: {:?} -> {:?}",
            pair[0].text, pair[1].text
        );
    }
}

#[test]
fn segment_size_stays_near_target() {
    let text = "Photosynthesis converts light into energy. Plants use chlorophyll. \
                Energy powers cell growth.";
    let segmenter = Segmenter::new(40, 5);
    let segments = segmenter.segment_text(text);
    assert_eq!(segments.len(), 3, "roughly one sentence per segment");
    for segment in &segments {
        assert!(
            segment.text.chars().count() < 90,
            "segment stays within target + overlap + one sentence: {:?}",
            segment.text
        );
    }
}

#[test]
fn multiple_terminators_close_one_sentence() {
    let segmenter = Segmenter::new(10, 0);
    let segments = segmenter.segment_text("Really?! Yes. Hmm...");
    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["Really?!", "Yes.", "Hmm..."]);
}

#[test]
fn page_attribution_follows_source_offsets() {
    let pages = [
        page(1, "This opening sentence is rather long indeed. Alpha sentence two."),
        page(2, "Beta sentence three. Beta sentence four."),
    ];
    let segmenter = Segmenter::new(45, 0);
    let segments = segmenter.segment_pages(&pages);
    assert_eq!(segments.len(), 3);
    assert_eq!((segments[0].start_page, segments[0].end_page), (1, 1));
    assert_eq!(
        (segments[1].start_page, segments[1].end_page),
        (1, 2),
        "a segment drawing from both pages reports the full range"
    );
    assert_eq!((segments[2].start_page, segments[2].end_page), (2, 2));
}

#[test]
fn single_segment_spans_all_pages() {
    let pages = [
        page(1, "Alpha sentence one. Alpha sentence two."),
        page(2, "Beta sentence three. Beta sentence four."),
    ];
    let segmenter = Segmenter::new(500, 50);
    let segments = segmenter.segment_pages(&pages);
    assert_eq!(segments.len(), 1);
    assert_eq!((segments[0].start_page, segments[0].end_page), (1, 2));
}

#[test]
fn pages_from_text_splits_on_form_feed() {
    let raw = "Page one text.\u{c}Page two text.\u{c}\u{c}Page four.";
    let pages = pages_from_text(raw);
    let numbers: Vec<u32> = pages.iter().map(|p| p.page_number).collect();
    assert_eq!(numbers, vec![1, 2, 4], "blank pages keep their position");
    assert_eq!(pages[0].text, "Page one text.");
}

#[test]
fn pages_from_text_without_form_feed_is_one_page() {
    let pages = pages_from_text("Just one page of text.");
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].page_number, 1);
}

#[tokio::test]
async fn plain_text_extractor_reads_pages() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("notes.txt");
    fs::write(&path, "First page here.\u{c}Second page here.").expect("write");

    let extractor = PlainTextExtractor;
    let pages = extractor
        .extract_pages(&path.to_string_lossy())
        .await
        .expect("extract");
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].page_number, 2);
    assert_eq!(pages[1].text, "Second page here.");
}

#[tokio::test]
async fn plain_text_extractor_fails_on_missing_file() {
    let extractor = PlainTextExtractor;
    let result = extractor.extract_pages("/nonexistent/definitely-missing.txt").await;
    assert!(result.is_err(), "missing files surface as extraction errors");
}

#[test]
fn list_text_files_is_sorted_and_filtered() {
    let tmp = TempDir::new().expect("tempdir");
    fs::write(tmp.path().join("b.txt"), "beta").expect("write");
    fs::write(tmp.path().join("a.txt"), "alpha").expect("write");
    fs::write(tmp.path().join("ignored.pdf"), "nope").expect("write");

    let files = list_text_files(tmp.path());
    let names: Vec<String> = files
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .collect();
    assert_eq!(names, vec!["a.txt", "b.txt"]);
}

#[test]
fn retrieval_config_defaults_are_valid() {
    let config = RetrievalConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.vector_dim, 100);
    assert_eq!(config.cache_max_entries, 100);
}

#[test]
fn retrieval_config_rejects_degenerate_values() {
    let mut config = RetrievalConfig::default();
    config.chunk_overlap = config.chunk_target_size;
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

    let mut config = RetrievalConfig::default();
    config.vector_dim = 0;
    assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
}
