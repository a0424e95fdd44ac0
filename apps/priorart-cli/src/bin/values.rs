use std::env;
use std::path::PathBuf;

use priorart_core::config::{expand_path, resolve_with_base, Config};
use priorart_core::corpus::load_passages;
use priorart_hybrid::CorpusIndex;
use priorart_text::Bm25Params;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <metadata_key> [corpus_path]", args[0]);
        eprintln!("Example: {} source dev_data/corpus", args[0]);
        std::process::exit(1);
    }
    let key = &args[1];

    let config = Config::load()?;
    let settings = config.engine_settings();
    let corpus_path = args.get(2).map(PathBuf::from).unwrap_or_else(|| {
        let base = expand_path(config.get("data.base_dir").unwrap_or_else(|_| ".".to_string()));
        let dir: String =
            config.get("data.corpus_path").unwrap_or_else(|_| "dev_data/corpus".to_string());
        resolve_with_base(&base, dir)
    });

    let passages = load_passages(&corpus_path)?;
    let index =
        CorpusIndex::build(passages, Some(settings.embedding.dim), Bm25Params::from(&settings.bm25));

    let values = index.metadata_values(key);
    println!("📊 {} distinct value(s) for '{}' across {} passages", values.len(), key, index.len());
    for value in values {
        println!("  {}", value);
    }
    Ok(())
}
