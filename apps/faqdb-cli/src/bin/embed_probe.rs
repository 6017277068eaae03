use std::env;
use std::sync::Arc;

use faqdb_core::config::Config;
use faqdb_embed::{EmbeddingService, HashEmbeddingBackend, RateLimiter, Trust};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <text>", args[0]);
        eprintln!("Example: {} '환불은 어떻게 하나요'", args[0]);
        std::process::exit(1);
    }
    let text = &args[1];
    let config = Config::load()?;
    let search_cfg = config.search();
    println!("🧮 faqdb-embed-probe\n====================");
    println!("Text: {}", text);
    println!("Dimension: {}", search_cfg.embedding_dimension);

    let backend = Arc::new(HashEmbeddingBackend::new(search_cfg.embedding_dimension));
    let limiter = Arc::new(RateLimiter::new(&config.rate_limits()));
    let service = EmbeddingService::new(backend, limiter, "hash", &search_cfg);

    let first = service.generate(text).await?;
    let trust = match first.trust {
        Trust::Semantic => "semantic",
        Trust::Degraded => "degraded (hash fallback)",
    };
    println!("\nTrust: {}", trust);
    let norm: f32 = first.vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    println!("L2 norm: {:.6}", norm);
    let head: Vec<String> = first.vector.iter().take(8).map(|x| format!("{:.4}", x)).collect();
    println!("First components: [{}]", head.join(", "));

    // Second call should come back from the cache with identical components.
    let second = service.generate(text).await?;
    println!("Cache round trip identical: {}", first.vector == second.vector);
    Ok(())
}
