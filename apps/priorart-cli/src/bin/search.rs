use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use priorart_core::config::{expand_path, resolve_with_base, Config};
use priorart_core::corpus::load_passages;
use priorart_core::types::MetaFilter;
use priorart_enrich::{BoostTermSet, ClaimPipeline, DomainConstraintTable, Vocabulary};
use priorart_hybrid::{extract_quoted_phrases, CorpusIndex, HybridSearchEngine, SearchOptions};
use priorart_text::Bm25Params;
use priorart_vector::embed_provider::embedder_from_settings;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <claim_text> [corpus_path] [options]", args[0]);
        eprintln!("Options:");
        eprintln!("  --alpha <0..1>         lexical/semantic blend weight");
        eprintln!("  --top-k <n>            number of results");
        eprintln!("  --filter <key=v1[,v2]> metadata filter (repeatable)");
        eprintln!(
            "Example: {} 'A method comprising a UE transmitting \"sidelink control information\"'",
            args[0]
        );
        std::process::exit(1);
    }

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let settings = config.engine_settings();

    let claim_text = args[1].clone();
    let mut corpus_path: Option<PathBuf> = None;
    let mut alpha = settings.search.alpha;
    let mut top_k = settings.search.top_k;
    let mut filters: HashMap<String, MetaFilter> = HashMap::new();

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--alpha" => {
                alpha = next_value(&args, &mut i, "--alpha")?.parse()?;
            }
            "--top-k" => {
                top_k = next_value(&args, &mut i, "--top-k")?.parse()?;
            }
            "--filter" => {
                let spec = next_value(&args, &mut i, "--filter")?;
                let (key, filter) = parse_filter(&spec)?;
                filters.insert(key, filter);
            }
            _ if !args[i].starts_with('-') => corpus_path = Some(PathBuf::from(&args[i])),
            other => {
                eprintln!("Unknown option: {}", other);
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let corpus_path = corpus_path.unwrap_or_else(|| {
        let base = expand_path(config.get("data.base_dir").unwrap_or_else(|_| ".".to_string()));
        let dir: String =
            config.get("data.corpus_path").unwrap_or_else(|_| "dev_data/corpus".to_string());
        resolve_with_base(&base, dir)
    });

    println!("🔍 priorart-search\n==================");
    println!("Corpus: {}", corpus_path.display());

    let pipeline = build_pipeline(&config, settings.enrich.clone());
    let quoted_phrases = extract_quoted_phrases(&claim_text);
    let query = pipeline.process(&claim_text);

    println!("\n📝 Enriched query: {}", query.text);
    if !query.constraints.is_empty() {
        let terms: Vec<&str> = query.constraints.iter().map(String::as_str).collect();
        println!("🔒 Domain constraints: {}", terms.join(", "));
    }
    if !quoted_phrases.is_empty() {
        println!("💬 Quoted phrases: {}", quoted_phrases.join(" | "));
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message("Loading corpus...");
    let passages = load_passages(&corpus_path)?;
    spinner.set_message(format!("Indexing {} passages...", passages.len()));
    let index =
        CorpusIndex::build(passages, Some(settings.embedding.dim), Bm25Params::from(&settings.bm25));
    spinner.finish_and_clear();
    println!("📊 Indexed {} passages (dim={})", index.len(), index.dim());

    let embedder = embedder_from_settings(&settings.embedding, None);
    let engine = HybridSearchEngine::new(index, embedder);

    let opts = SearchOptions { top_k, alpha, filters, quoted_phrases };
    let response = engine.search(&query, &opts);

    if let Some(note) = &response.degradation {
        println!("\n⚠️  Degraded: {}", note);
    }
    println!("\n🔍 Found {} results (alpha={:.2})", response.results.len(), alpha);
    for (i, result) in response.results.iter().enumerate() {
        let title = result.passage.metadata.get("title").map(String::as_str).unwrap_or("<untitled>");
        println!(
            "\n  {}. fused={:.4}  bm25={:.4}  cosine={:.4}  {}",
            i + 1,
            result.fused_score,
            result.lexical_score,
            result.semantic_score,
            title
        );
        println!("     📝 {}", snippet(&result.passage.text));
    }
    Ok(())
}

fn build_pipeline(config: &Config, settings: priorart_core::config::EnrichSettings) -> ClaimPipeline {
    let vocab_path: Option<String> = config.get("data.vocab_file").ok();
    let overrides_path: Option<String> = config.get("data.vocab_overrides_file").ok();
    let vocab = Vocabulary::from_files(
        vocab_path.map(PathBuf::from).as_deref(),
        overrides_path.map(PathBuf::from).as_deref(),
    );
    let constraints = match config.get::<String>("data.constraints_file") {
        Ok(path) => DomainConstraintTable::from_file(&PathBuf::from(path)),
        Err(_) => DomainConstraintTable::builtin(),
    };
    ClaimPipeline::new(vocab, constraints, BoostTermSet::builtin(), settings)
}

fn next_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> anyhow::Result<&'a str> {
    *i += 1;
    args.get(*i).map(String::as_str).ok_or_else(|| anyhow::anyhow!("{} requires a value", flag))
}

/// `key=value` selects one value, `key=v1,v2` any of a list.
fn parse_filter(spec: &str) -> anyhow::Result<(String, MetaFilter)> {
    let (key, raw) = spec
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("filter must look like key=value, got '{}'", spec))?;
    let values: Vec<String> =
        raw.split(',').map(str::trim).filter(|v| !v.is_empty()).map(str::to_string).collect();
    let filter = match values.len() {
        0 | 1 => MetaFilter::One(values.into_iter().next().unwrap_or_default()),
        _ => MetaFilter::Any(values),
    };
    Ok((key.to_string(), filter))
}

fn snippet(text: &str) -> String {
    const MAX: usize = 160;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX).collect();
        format!("{}...", cut.trim_end())
    }
}
