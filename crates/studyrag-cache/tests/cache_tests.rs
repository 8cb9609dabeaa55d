use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use studyrag_cache::{CacheConfig, RecommendationCache};

fn small_cache(max_entries: usize) -> RecommendationCache<Vec<String>> {
    RecommendationCache::new(CacheConfig {
        ttl: Duration::from_secs(60),
        max_entries,
    })
}

fn videos(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn set_then_get_round_trips() {
    let cache = small_cache(10);
    cache.set("calculus", "notes.txt", 5, videos(&["intro to calculus"]));

    assert_eq!(
        cache.get("calculus", "notes.txt", 5),
        Some(videos(&["intro to calculus"]))
    );
    assert_eq!(cache.get("calculus", "notes.txt", 3), None, "limit is part of the key");
    assert_eq!(cache.get("calculus", "other.txt", 5), None, "scope is part of the key");
}

#[test]
fn entries_expire_after_ttl() {
    let cache: RecommendationCache<Vec<String>> = RecommendationCache::new(CacheConfig {
        ttl: Duration::from_millis(20),
        max_entries: 10,
    });
    cache.set("physics", "doc", 5, videos(&["forces explained"]));
    assert!(cache.get("physics", "doc", 5).is_some(), "fresh entry hits");

    std::thread::sleep(Duration::from_millis(60));
    assert_eq!(cache.get("physics", "doc", 5), None, "stale entry misses");
    assert_eq!(cache.len(), 0, "stale entry is dropped on read");
}

#[test]
fn capacity_bound_evicts_least_recently_used() {
    let cache = small_cache(3);
    cache.set("q1", "s", 1, videos(&["a"]));
    cache.set("q2", "s", 1, videos(&["b"]));
    cache.set("q3", "s", 1, videos(&["c"]));

    // Touch q1 so q2 becomes the least recently used key.
    assert!(cache.get("q1", "s", 1).is_some());

    cache.set("q4", "s", 1, videos(&["d"]));
    assert_eq!(cache.len(), 3, "cache never exceeds its bound");
    assert_eq!(cache.get("q2", "s", 1), None, "LRU key was evicted");
    assert!(cache.get("q1", "s", 1).is_some());
    assert!(cache.get("q3", "s", 1).is_some());
    assert!(cache.get("q4", "s", 1).is_some());
}

#[test]
fn overwriting_does_not_evict() {
    let cache = small_cache(2);
    cache.set("q1", "s", 1, videos(&["a"]));
    cache.set("q2", "s", 1, videos(&["b"]));
    cache.set("q1", "s", 1, videos(&["a2"]));

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get("q1", "s", 1), Some(videos(&["a2"])));
    assert!(cache.get("q2", "s", 1).is_some(), "overwrite keeps other keys");
}

#[test]
fn clear_empties_everything() {
    let cache = small_cache(5);
    cache.set("q1", "s", 1, videos(&["a"]));
    cache.set("q2", "s", 1, videos(&["b"]));
    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.get("q1", "s", 1), None);
    assert_eq!(cache.stats().len, 0);
}

#[tokio::test]
async fn get_or_fetch_only_calls_lookup_on_miss() {
    let cache = small_cache(5);
    let calls = AtomicUsize::new(0);

    let lookup = || async {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(videos(&["chlorophyll basics"]))
    };
    let first = cache
        .get_or_fetch("chlorophyll", "bio.txt", 5, lookup)
        .await
        .expect("fetch");
    assert_eq!(first, videos(&["chlorophyll basics"]));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let second = cache
        .get_or_fetch("chlorophyll", "bio.txt", 5, || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(videos(&["should not run"]))
        })
        .await
        .expect("fetch");
    assert_eq!(second, videos(&["chlorophyll basics"]), "second call is a hit");
    assert_eq!(calls.load(Ordering::SeqCst), 1, "lookup ran exactly once");
}

#[tokio::test]
async fn get_or_fetch_never_caches_errors() {
    let cache: RecommendationCache<Vec<String>> = small_cache(5);

    let failed = cache
        .get_or_fetch("quantum", "phys.txt", 5, || async {
            Err(anyhow::anyhow!("catalog unavailable"))
        })
        .await;
    assert!(failed.is_err());
    assert!(cache.is_empty(), "errors leave no entry behind");

    let recovered = cache
        .get_or_fetch("quantum", "phys.txt", 5, || async {
            Ok(videos(&["quantum walkthrough"]))
        })
        .await
        .expect("fetch");
    assert_eq!(recovered, videos(&["quantum walkthrough"]));
}
