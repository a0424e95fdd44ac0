use std::env;
use std::path::PathBuf;

use priorart_core::config::Config;
use priorart_enrich::{BoostTermSet, ClaimPipeline, DomainConstraintTable, Vocabulary};
use priorart_hybrid::extract_quoted_phrases;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <claim_text>", args[0]);
        eprintln!("Example: {} 'A method comprising a UE configured to transmit SCI'", args[0]);
        std::process::exit(1);
    }
    let claim_text = &args[1];

    let config = Config::load()?;
    let settings = config.engine_settings();

    let vocab = Vocabulary::from_files(
        config.get::<String>("data.vocab_file").ok().map(PathBuf::from).as_deref(),
        config.get::<String>("data.vocab_overrides_file").ok().map(PathBuf::from).as_deref(),
    );
    let constraints = match config.get::<String>("data.constraints_file") {
        Ok(path) => DomainConstraintTable::from_file(&PathBuf::from(path)),
        Err(_) => DomainConstraintTable::builtin(),
    };
    let pipeline =
        ClaimPipeline::new(vocab, constraints, BoostTermSet::builtin(), settings.enrich);

    println!("📝 priorart-enrich-query\n========================");
    println!("Claim: {}", claim_text);

    let query = pipeline.process(claim_text);
    println!("\n✨ Enriched: {}", query.text);

    if query.constraints.is_empty() {
        println!("🔒 Domain constraints: none");
    } else {
        let terms: Vec<&str> = query.constraints.iter().map(String::as_str).collect();
        println!("🔒 Domain constraints: {}", terms.join(", "));
    }

    let phrases = extract_quoted_phrases(claim_text);
    if !phrases.is_empty() {
        println!("💬 Quoted phrases: {}", phrases.join(" | "));
    }
    Ok(())
}
