//! Deterministic hash-bucket term-frequency vectors.
//!
//! This is a cheap lexical-overlap signal, not a semantic embedding. Tokens
//! sharing a two-character suffix land in the same bucket, and the first
//! token to claim a bucket keeps it; later collisions are dropped. Ranking
//! behavior downstream is defined against exactly this scheme, so it must
//! not be swapped for a trained model.

use std::collections::HashMap;
use std::hash::Hasher;

use twox_hash::XxHash64;

use studyrag_core::traits::Embedder;

pub const DEFAULT_DIM: usize = 100;

const MIN_TOKEN_LEN: usize = 3;

#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    /// Maps a token to a bucket from a stable hash of its trailing two
    /// characters; tokens sharing a suffix share a bucket.
    fn bucket(&self, token: &str) -> usize {
        let chars: Vec<char> = token.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(2)..].iter().collect();
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(tail.as_bytes());
        usize::try_from(hasher.finish() % self.dim as u64).unwrap_or(0)
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIM)
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split_whitespace()
            .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
            .collect();

        let mut vector = vec![0.0f32; self.dim];
        if tokens.is_empty() {
            return vector;
        }
        let total = tokens.len() as f32;

        // Count term frequency, keeping first-appearance order so bucket
        // claims are deterministic.
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for token in &tokens {
            let entry = counts.entry(*token).or_insert(0);
            if *entry == 0 {
                order.push(*token);
            }
            *entry += 1;
        }

        for token in order {
            let bucket = self.bucket(token);
            if vector[bucket] == 0.0 {
                vector[bucket] = counts[token] as f32 / total;
            }
        }
        vector
    }
}
