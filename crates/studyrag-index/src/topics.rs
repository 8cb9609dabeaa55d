//! Rule-based key-term extraction and study-search query suggestions.
//!
//! No model involved: frequency counting over normalized words, with boosts
//! for known academic vocabulary and longer (more specific) terms. The
//! resulting terms feed the recommendation flow as search queries.

use std::collections::HashMap;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "must", "can", "this", "that", "these", "those",
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my", "your",
    "his", "its", "our", "their", "what", "which", "who", "when", "where", "why", "how",
];

const ACADEMIC_KEYWORDS: &[&str] = &[
    "mathematics", "calculus", "algebra", "geometry", "statistics", "probability", "physics",
    "chemistry", "biology", "programming", "algorithm", "data structure", "machine learning",
    "engineering", "mechanical", "electrical", "civil", "chemical", "software", "circuit",
    "system", "design", "analysis", "simulation", "economics", "finance", "accounting",
    "marketing", "management", "business", "strategy", "entrepreneurship", "leadership",
    "philosophy", "psychology", "sociology", "anthropology", "history", "literature",
    "linguistics", "law", "research", "methodology", "theory", "concept", "principle",
    "framework", "evaluation", "assessment",
];

const MIN_TEXT_CHARS: usize = 100;
const MIN_KEPT_WORDS: usize = 10;
const QUERY_TEMPLATES: &[&str] = &["tutorial", "explained", "lecture"];
const TOPICS_PER_QUERY_BATCH: usize = 5;

/// A key term extracted from document text.
#[derive(Debug, Clone)]
pub struct Topic {
    pub term: String,
    pub frequency: usize,
    pub score: f32,
    pub academic: bool,
}

#[derive(Debug, Clone)]
pub struct TopicOptions {
    pub max_topics: usize,
    pub min_word_length: usize,
    pub min_frequency: usize,
}

impl Default for TopicOptions {
    fn default() -> Self {
        Self {
            max_topics: 15,
            min_word_length: 3,
            min_frequency: 1,
        }
    }
}

/// Extracts the highest-scoring terms from `text`.
///
/// Text below ~100 characters or with fewer than ten usable words yields an
/// empty list; there is not enough signal to rank anything.
pub fn extract_topics(text: &str, options: &TopicOptions) -> Vec<Topic> {
    if text.chars().count() < MIN_TEXT_CHARS {
        return Vec::new();
    }

    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|w| w.chars().count() >= options.min_word_length)
        .filter(|w| !STOP_WORDS.contains(w))
        .filter(|w| !w.chars().all(|c| c.is_ascii_digit()))
        .collect();
    if words.len() < MIN_KEPT_WORDS {
        return Vec::new();
    }

    let mut frequencies: HashMap<&str, usize> = HashMap::new();
    for word in &words {
        *frequencies.entry(*word).or_insert(0) += 1;
    }

    let mut topics: Vec<Topic> = frequencies
        .into_iter()
        .filter(|(word, count)| is_academic(word) || *count >= options.min_frequency.max(2))
        .map(|(word, count)| {
            let academic = is_academic(word);
            Topic {
                score: topic_score(word, count, academic),
                term: word.to_string(),
                frequency: count,
                academic,
            }
        })
        .collect();

    // Tie-break alphabetically so HashMap iteration order never shows.
    topics.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.term.cmp(&b.term))
    });
    topics.truncate(options.max_topics);
    topics
}

/// Turns extracted topics into study-search queries, best first.
///
/// Falls back to queries derived from the document name, then to a generic
/// one, so callers always get something searchable.
pub fn suggest_queries(topics: &[Topic], document_name: &str, max_queries: usize) -> Vec<String> {
    let mut queries: Vec<String> = Vec::new();

    for topic in topics.iter().take(TOPICS_PER_QUERY_BATCH) {
        for template in QUERY_TEMPLATES {
            push_unique(&mut queries, format!("{} {}", topic.term, template));
        }
    }

    let cleaned_name: String = document_name
        .rsplit_once('.')
        .map_or(document_name, |(stem, _)| stem)
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    for word in cleaned_name
        .split_whitespace()
        .filter(|w| w.chars().count() > 3)
        .take(2)
    {
        push_unique(&mut queries, format!("{} tutorial", word.to_lowercase()));
    }

    if queries.is_empty() {
        queries.push("educational tutorial".to_string());
    }
    queries.truncate(max_queries);
    queries
}

fn push_unique(queries: &mut Vec<String>, query: String) {
    if !queries.contains(&query) {
        queries.push(query);
    }
}

fn is_academic(word: &str) -> bool {
    ACADEMIC_KEYWORDS
        .iter()
        .any(|keyword| word.contains(keyword) || keyword.contains(word))
}

fn topic_score(word: &str, frequency: usize, academic: bool) -> f32 {
    let mut score = frequency as f32;
    if academic {
        score *= 2.0;
    }
    let len = word.chars().count();
    if len > 8 {
        score *= 1.5;
    }
    if len > 12 {
        score *= 1.3;
    }
    score
}
