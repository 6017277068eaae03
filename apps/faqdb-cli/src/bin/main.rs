use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use faqdb_core::config::Config;
use faqdb_core::traits::{IndexCandidate, SnapshotStore, VectorIndex};
use faqdb_core::types::{ConfidenceBand, SearchOptions, SourceKind, SourceRecord};
use faqdb_core::{Error, Result};
use faqdb_embed::{EmbeddingService, HashEmbeddingBackend, RateLimiter};
use faqdb_search::SearchOrchestrator;

/// Snapshot store backed by a JSON file: an array of tagged source records.
struct JsonSnapshotStore {
    records: HashMap<SourceKind, Vec<SourceRecord>>,
}

impl JsonSnapshotStore {
    fn load(path: &PathBuf) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let all: Vec<SourceRecord> = serde_json::from_str(&raw)?;
        let mut records: HashMap<SourceKind, Vec<SourceRecord>> = HashMap::new();
        for record in all {
            records.entry(record.source_kind()).or_default().push(record);
        }
        Ok(Self { records })
    }

    fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl SnapshotStore for JsonSnapshotStore {
    async fn list_active(&self, kind: SourceKind) -> Result<Vec<SourceRecord>> {
        Ok(self.records.get(&kind).cloned().unwrap_or_default())
    }
}

/// Stand-in for a remote vector index when none is configured. The first
/// query per source memoizes the unavailability and every search falls
/// through to the local scan.
struct OfflineIndex;

#[async_trait]
impl VectorIndex for OfflineIndex {
    async fn query(
        &self,
        _kind: SourceKind,
        _embedding: &[f32],
        _threshold: f32,
        _limit: usize,
    ) -> Result<Vec<IndexCandidate>> {
        Err(Error::VectorIndexUnavailable("no remote index configured".into()))
    }
}

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <search|best> \"<query>\" [snapshot.json]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
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
    let (cmd, args) = parse_args();
    let query = args.first().cloned().unwrap_or_else(|| {
        eprintln!("Usage: faqdb-cli {} \"<query>\"", cmd);
        std::process::exit(1)
    });
    let snapshot_path = args.get(1).map(PathBuf::from).unwrap_or_else(|| {
        let path: String =
            config.get("data.snapshot_path").unwrap_or_else(|_| "data/snapshot.json".to_string());
        PathBuf::from(path)
    });

    let search_cfg = config.search();
    search_cfg.validate()?;
    let store = JsonSnapshotStore::load(&snapshot_path)?;
    println!("📂 Loaded {} records from {}", store.len(), snapshot_path.display());

    let backend = Arc::new(HashEmbeddingBackend::new(search_cfg.embedding_dimension));
    let limiter = Arc::new(RateLimiter::new(&config.rate_limits()));
    let embeddings = Arc::new(EmbeddingService::new(backend, limiter, "hash", &search_cfg));
    let engine =
        SearchOrchestrator::new(embeddings, Arc::new(OfflineIndex), Arc::new(store), &search_cfg);

    match cmd.as_str() {
        "search" => {
            let results = engine.search(&query, &SearchOptions::default()).await;
            println!("\n🔍 Found {} results for: \"{}\"", results.len(), query);
            for (i, result) in results.iter().enumerate() {
                println!(
                    "\n  {}. score={:.4}  similarity={:.4}  kind={:?}  id={}",
                    i + 1,
                    result.score,
                    result.similarity,
                    result.kind,
                    result.id
                );
                println!("     📝 {}", result.title);
            }
        }
        "best" => match engine.find_best_match(&query).await {
            Some(best) => {
                let band = ConfidenceBand::for_similarity(best.similarity);
                println!("\n✅ Best match ({:?} confidence, similarity {:.4})", band, best.similarity);
                println!("  Q: {}", best.title);
                println!("  A: {}", best.body);
            }
            None => println!("\n❌ No FAQ answer above the confidence floor for: \"{}\"", query),
        },
        _ => {
            eprintln!("Unknown command: {}", cmd);
            std::process::exit(1);
        }
    }
    Ok(())
}
