use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use studyrag_cache::{CacheConfig, RecommendationCache};
use studyrag_core::config::{resolve_with_base, Config, RetrievalConfig};
use studyrag_core::extract::{list_text_files, PlainTextExtractor};
use studyrag_embed::HashEmbedder;
use studyrag_index::topics::{extract_topics, suggest_queries, TopicOptions};
use studyrag_index::{
    DocumentIndex, IndexConfig, IngestFailure, IngestReport, SearchOptions,
};

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <index|search|topics|suggest|stats> [args...]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

fn data_dir(arg: Option<&String>, config: &Config) -> PathBuf {
    let raw = arg.cloned().unwrap_or_else(|| {
        config
            .get("data.txt_dir")
            .unwrap_or_else(|_| "./data/txt".to_string())
    });
    let base = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_with_base(&base, raw)
}

async fn ingest_directory(index: &DocumentIndex, dir: &Path) -> anyhow::Result<IngestReport> {
    let files = list_text_files(dir);
    if files.is_empty() {
        println!("No .txt files found under {}.", dir.display());
        return Ok(IngestReport::default());
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files {msg}")?
            .progress_chars("#>-"),
    );

    let extractor = PlainTextExtractor;
    let mut report = IngestReport::default();
    for path in &files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        pb.set_message(name.clone());
        match index
            .ingest(&extractor, &path.to_string_lossy(), &name)
            .await
        {
            Ok(document) => report.added.push(document),
            Err(error) => report.failures.push(IngestFailure {
                source: name,
                error,
            }),
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    for failure in &report.failures {
        eprintln!("⚠️  Skipped {}: {}", failure.source, failure.error);
    }
    println!(
        "Indexed {} documents ({} skipped)",
        report.added.len(),
        report.failures.len()
    );
    Ok(report)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let retrieval = RetrievalConfig::from_config(&config);
    retrieval.validate()?;

    let embedder = Arc::new(HashEmbedder::new(retrieval.vector_dim));
    let index = DocumentIndex::new(embedder, IndexConfig::from_retrieval(&retrieval));

    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "index" => {
            let dir = data_dir(args.first(), &config);
            println!("Ingesting from {}", dir.display());
            ingest_directory(&index, &dir).await?;
            let stats = index.stats();
            println!(
                "✅ Ingest complete ({} documents, {} chunks)",
                stats.document_count, stats.chunk_count
            );
        }
        "search" => {
            let query = args.first().cloned().unwrap_or_else(|| {
                eprintln!("Usage: studyrag search \"<query>\" [dir] [top_k]");
                std::process::exit(1)
            });
            let dir = data_dir(args.get(1), &config);
            let top_k = args.get(2).and_then(|k| k.parse::<usize>().ok());

            ingest_directory(&index, &dir).await?;
            let results = index.search_cited(
                &query,
                &SearchOptions {
                    scope: None,
                    top_k,
                },
            );
            if results.is_empty() {
                println!("No relevant content found.");
            } else {
                for (rank, result) in results.iter().enumerate() {
                    let pages: Vec<String> =
                        result.pages.iter().map(|p| p.to_string()).collect();
                    println!(
                        "{}. [{:.3}] {} (p. {})",
                        rank + 1,
                        result.score,
                        result.document_name,
                        pages.join(", ")
                    );
                    println!("   {}", result.snippet);
                }
            }
        }
        "topics" => {
            let dir = data_dir(args.first(), &config);
            ingest_directory(&index, &dir).await?;
            for document in index.documents() {
                let Some(text) = index.document_text(document.id) else {
                    continue;
                };
                println!("\n📄 {}", document.display_name);
                let topics = extract_topics(&text, &TopicOptions::default());
                if topics.is_empty() {
                    println!("   (not enough text for topic extraction)");
                    continue;
                }
                for topic in topics.iter().take(8) {
                    println!(
                        "   {:<24} freq={:<3} score={:.2}",
                        topic.term, topic.frequency, topic.score
                    );
                }
            }
        }
        "suggest" => {
            let dir = data_dir(args.first(), &config);
            ingest_directory(&index, &dir).await?;
            // The lookup behind the cache is swappable; here it is a local
            // topic pass standing in for a remote catalog.
            let cache: RecommendationCache<Vec<String>> =
                RecommendationCache::new(CacheConfig {
                    ttl: Duration::from_millis(retrieval.cache_ttl_ms),
                    max_entries: retrieval.cache_max_entries,
                });
            for document in index.documents() {
                let queries = cache
                    .get_or_fetch("study queries", &document.display_name, 8, || async {
                        let text = index.document_text(document.id).unwrap_or_default();
                        let topics = extract_topics(&text, &TopicOptions::default());
                        Ok(suggest_queries(&topics, &document.display_name, 8))
                    })
                    .await?;
                println!("\n🔎 {}", document.display_name);
                for query in queries {
                    println!("   {}", query);
                }
            }
        }
        "stats" => {
            let dir = data_dir(args.first(), &config);
            ingest_directory(&index, &dir).await?;
            println!("{}", serde_json::to_string_pretty(&index.stats())?);
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            std::process::exit(1);
        }
    }
    Ok(())
}
