use studyrag_core::traits::Embedder;
use studyrag_embed::{cosine_similarity, HashEmbedder};

#[test]
fn embedder_shape_and_determinism() {
    let embedder = HashEmbedder::new(100);
    let v1 = embedder.embed("Plants convert light into chemical energy");
    let v2 = embedder.embed("Plants convert light into chemical energy");

    assert_eq!(v1.len(), 100, "vector dim is fixed");
    assert_eq!(v1, v2, "same text yields the same vector");
    assert!(v1.iter().any(|x| *x > 0.0), "real text produces signal");
}

#[test]
fn short_tokens_are_discarded() {
    let embedder = HashEmbedder::new(100);
    let vector = embedder.embed("a an of to");
    assert!(
        vector.iter().all(|x| *x == 0.0),
        "tokens under three characters never reach a bucket"
    );
    assert_eq!(vector.len(), 100);
}

#[test]
fn frequencies_are_normalized_by_token_count() {
    let embedder = HashEmbedder::new(100);
    // "cell" and "ball" share the "ll" suffix, so they collide; the first
    // appearance claims the bucket with its own frequency.
    let vector = embedder.embed("cell ball cell");
    let nonzero: Vec<f32> = vector.iter().copied().filter(|x| *x > 0.0).collect();
    assert_eq!(nonzero.len(), 1, "colliding suffixes share one bucket");
    assert!(
        (nonzero[0] - 2.0 / 3.0).abs() < 1e-6,
        "first token wins the bucket with its frequency, got {}",
        nonzero[0]
    );
}

#[test]
fn case_is_ignored() {
    let embedder = HashEmbedder::new(100);
    assert_eq!(
        embedder.embed("Chlorophyll Energy"),
        embedder.embed("chlorophyll energy")
    );
}

#[test]
fn cosine_similarity_stays_in_bounds() {
    let embedder = HashEmbedder::new(100);
    let a = embedder.embed("photosynthesis light energy chlorophyll");
    let b = embedder.embed("mitochondria respiration oxygen glucose");

    let sim = cosine_similarity(&a, &b);
    assert!((-1.0..=1.0).contains(&sim), "similarity in [-1, 1]: {sim}");

    let self_sim = cosine_similarity(&a, &a);
    assert!(
        (self_sim - 1.0).abs() < 1e-5,
        "self similarity is 1: {self_sim}"
    );
}

#[test]
fn zero_vectors_score_zero() {
    let zero = vec![0.0f32; 100];
    let other = {
        let mut v = vec![0.0f32; 100];
        v[7] = 0.5;
        v
    };
    assert_eq!(cosine_similarity(&zero, &other), 0.0);
    assert_eq!(cosine_similarity(&zero, &zero), 0.0);
}

#[test]
fn mismatched_lengths_score_zero() {
    assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
}
