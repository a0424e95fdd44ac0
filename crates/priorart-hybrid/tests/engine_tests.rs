use std::collections::HashMap;

use priorart_core::traits::QueryEmbedder;
use priorart_core::types::{EnrichedQuery, MetaFilter, Passage};
use priorart_hybrid::{
    extract_quoted_phrases, CorpusIndex, HybridSearchEngine, SearchOptions,
};
use priorart_text::Bm25Params;
use priorart_vector::embed_provider::StubEmbedder;

const DIM: usize = 32;

fn passage(text: &str, meta: &[(&str, &str)]) -> Passage {
    let stub = StubEmbedder::new(DIM);
    Passage {
        text: text.to_string(),
        metadata: meta.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        embedding: stub.embed_text(text),
    }
}

fn corpus() -> Vec<Passage> {
    vec![
        passage(
            "Discussion on NR sidelink resource allocation mode 2. The PSCCH carries the SCI.",
            &[("title", "Sidelink Resource Allocation"), ("source", "Qualcomm"), ("type", "TDoc"), ("status", "Draft")],
        ),
        passage(
            "V2X services require low latency at all times. PC5 is used for device-to-device communication.",
            &[("title", "NR V2X Enhancements"), ("source", "Huawei"), ("type", "TDoc"), ("status", "Agreed")],
        ),
        passage(
            "Beam failure recovery introduces a new timer for detection on the serving cell.",
            &[("title", "BFR Timer"), ("source", "Nokia"), ("type", "CR"), ("status", "Agreed")],
        ),
    ]
}

fn engine_with(passages: Vec<Passage>) -> HybridSearchEngine {
    let index = CorpusIndex::build(passages, Some(DIM), Bm25Params::default());
    HybridSearchEngine::new(index, Box::new(StubEmbedder::new(DIM)))
}

fn engine() -> HybridSearchEngine {
    engine_with(corpus())
}

fn query(text: &str) -> EnrichedQuery {
    EnrichedQuery::from_text(text)
}

#[test]
fn alpha_zero_ranks_literal_terms_first() {
    let response = engine().search(
        &query("beam failure recovery timer"),
        &SearchOptions { alpha: 0.0, ..Default::default() },
    );
    assert!(!response.results.is_empty());
    let top = &response.results[0];
    assert_eq!(top.passage.metadata["title"], "BFR Timer");
    assert!(top.lexical_score > 0.0);
}

#[test]
fn metadata_filter_is_a_hard_gate() {
    let mut filters = HashMap::new();
    filters.insert("source".to_string(), MetaFilter::One("Qualcomm".to_string()));
    let response = engine().search(
        &query("sidelink v2x beam"),
        &SearchOptions { filters, ..Default::default() },
    );
    assert!(!response.results.is_empty());
    for result in &response.results {
        assert_eq!(result.passage.metadata["source"], "Qualcomm");
    }
}

#[test]
fn list_filter_accepts_membership() {
    let mut filters = HashMap::new();
    filters.insert(
        "status".to_string(),
        MetaFilter::Any(vec!["Agreed".to_string(), "Approved".to_string()]),
    );
    let response = engine().search(
        &query("sidelink v2x beam timer"),
        &SearchOptions { filters, ..Default::default() },
    );
    assert_eq!(response.results.len(), 2);
    for result in &response.results {
        assert_eq!(result.passage.metadata["status"], "Agreed");
    }
}

#[test]
fn empty_filter_values_are_noops() {
    let mut filters = HashMap::new();
    filters.insert("source".to_string(), MetaFilter::One(String::new()));
    filters.insert("status".to_string(), MetaFilter::Any(vec![]));
    let response =
        engine().search(&query("sidelink v2x beam"), &SearchOptions { filters, ..Default::default() });
    assert_eq!(response.results.len(), 3);
}

#[test]
fn missing_metadata_key_excludes_the_passage() {
    let mut filters = HashMap::new();
    filters.insert("release".to_string(), MetaFilter::One("Rel-16".to_string()));
    let response =
        engine().search(&query("sidelink"), &SearchOptions { filters, ..Default::default() });
    assert!(response.results.is_empty());
}

#[test]
fn constraint_gate_requires_at_least_one_term() {
    let mut q = query("communication");
    q.constraints = ["sidelink", "v2x", "pc5"].into_iter().map(str::to_string).collect();

    let response = engine().search(&q, &SearchOptions::default());
    assert!(!response.results.is_empty());
    for result in &response.results {
        let text = result.passage.text.to_lowercase();
        assert!(
            q.constraints.iter().any(|t| text.contains(t.as_str())),
            "constraint gate leaked: {}",
            result.passage.text
        );
    }
    // The beam-failure passage mentions none of the constraint terms.
    assert!(response.results.iter().all(|r| r.passage.metadata["title"] != "BFR Timer"));
}

#[test]
fn unmatched_constraints_empty_the_result_set() {
    let mut q = query("sidelink");
    q.constraints.insert("zorblefrax".to_string());
    let response = engine().search(&q, &SearchOptions::default());
    assert!(response.results.is_empty());
}

#[test]
fn quoted_phrase_boost_dominates_alpha() {
    // Pure-semantic weighting would not favour the PC5 passage for this
    // query; the verbatim phrase bonus must override that.
    let response = engine().search(
        &query("latency"),
        &SearchOptions {
            alpha: 1.0,
            quoted_phrases: vec!["device-to-device communication".to_string()],
            ..Default::default()
        },
    );
    assert!(!response.results.is_empty());
    let top = &response.results[0];
    assert_eq!(top.passage.metadata["title"], "NR V2X Enhancements");
    assert!(top.fused_score > 1.0, "phrase bonus must push the fused score past 1.0");
}

#[test]
fn phrase_boost_never_resurrects_excluded_passages() {
    let mut filters = HashMap::new();
    filters.insert("source".to_string(), MetaFilter::One("Nokia".to_string()));
    let response = engine().search(
        &query("device-to-device"),
        &SearchOptions {
            filters,
            quoted_phrases: vec!["device-to-device communication".to_string()],
            ..Default::default()
        },
    );
    for result in &response.results {
        assert_eq!(result.passage.metadata["source"], "Nokia");
    }
}

#[test]
fn excluded_passage_never_appears_even_with_top_raw_score() {
    // The sidelink passage is the best raw match for this query but is
    // filtered out by source.
    let mut filters = HashMap::new();
    filters.insert("source".to_string(), MetaFilter::Any(vec![
        "Huawei".to_string(),
        "Nokia".to_string(),
    ]));
    let response = engine().search(
        &query("sidelink resource allocation PSCCH SCI"),
        &SearchOptions { alpha: 0.0, filters, ..Default::default() },
    );
    assert!(!response.results.is_empty());
    for result in &response.results {
        assert_ne!(result.passage.metadata["source"], "Qualcomm");
    }
}

#[test]
fn score_components_are_exposed_and_bounded() {
    let response = engine().search(&query("sidelink v2x"), &SearchOptions::default());
    for result in &response.results {
        assert!((0.0..=1.0).contains(&result.lexical_score));
        assert!((0.0..=1.0).contains(&result.semantic_score));
        assert!((0.0..=1.0).contains(&result.fused_score));
    }
}

#[test]
fn top_k_truncates_and_exclusions_shrink_below_top_k() {
    let engine = engine();
    let all = engine.search(&query("sidelink v2x beam"), &SearchOptions::default());
    assert_eq!(all.results.len(), 3);

    let one = engine.search(
        &query("sidelink v2x beam"),
        &SearchOptions { top_k: 1, ..Default::default() },
    );
    assert_eq!(one.results.len(), 1);

    // top_k larger than the surviving set still respects exclusions.
    let mut q = query("sidelink");
    q.constraints.insert("sidelink".to_string());
    let gated = engine.search(&q, &SearchOptions { top_k: 50, ..Default::default() });
    assert_eq!(gated.results.len(), 1);
}

#[test]
fn empty_corpus_yields_empty_results_not_error() {
    let engine = engine_with(vec![]);
    let response = engine.search(&query("anything"), &SearchOptions::default());
    assert!(response.results.is_empty());
    assert!(response.degradation.is_none());
}

#[test]
fn empty_query_is_well_defined() {
    let response = engine().search(&query(""), &SearchOptions::default());
    // No lexical signal; semantic side sees a zero vector from the stub's
    // empty token stream, so everything scores zero but nothing crashes.
    assert!(response.results.len() <= 3);
}

struct FailingEmbedder;

impl QueryEmbedder for FailingEmbedder {
    fn dim(&self) -> usize {
        DIM
    }
    fn embed_query(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
        anyhow::bail!("provider unavailable")
    }
}

#[test]
fn embedding_failure_degrades_to_lexical_only() {
    let index = CorpusIndex::build(corpus(), Some(DIM), Bm25Params::default());
    let engine = HybridSearchEngine::new(index, Box::new(FailingEmbedder));

    let response = engine.search(
        &query("beam failure recovery"),
        &SearchOptions { alpha: 0.5, ..Default::default() },
    );
    assert!(response.degradation.is_some());
    assert!(!response.results.is_empty());
    assert_eq!(response.results[0].passage.metadata["title"], "BFR Timer");
    for result in &response.results {
        assert_eq!(result.semantic_score, 0.0);
    }
}

struct WrongDimEmbedder;

impl QueryEmbedder for WrongDimEmbedder {
    fn dim(&self) -> usize {
        8
    }
    fn embed_query(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
        Ok(vec![0.1; 8])
    }
}

#[test]
fn query_dimension_mismatch_degrades_instead_of_failing() {
    let index = CorpusIndex::build(corpus(), Some(DIM), Bm25Params::default());
    let engine = HybridSearchEngine::new(index, Box::new(WrongDimEmbedder));
    let response = engine.search(&query("sidelink"), &SearchOptions::default());
    assert!(response.degradation.is_some());
    assert!(!response.results.is_empty());
}

#[test]
fn mismatched_passage_embeddings_are_rejected_at_load() {
    let mut passages = corpus();
    passages.push(Passage {
        text: "corrupted embedding row".to_string(),
        metadata: HashMap::new(),
        embedding: vec![0.5; DIM + 3],
    });
    let index = CorpusIndex::build(passages, Some(DIM), Bm25Params::default());
    assert_eq!(index.len(), 3);
}

struct ZeroDimEmbedder;

impl QueryEmbedder for ZeroDimEmbedder {
    fn dim(&self) -> usize {
        0
    }
    fn embed_query(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
        Ok(vec![])
    }
}

#[test]
fn zero_dimension_corpus_degrades_to_lexical_only() {
    // Empty embeddings give a dim-0 semantic index that yields no scores at
    // all; the engine must pad to lexical-only instead of indexing past the
    // short score vector.
    let passages = vec![
        Passage {
            text: "beam failure recovery timer".to_string(),
            metadata: HashMap::new(),
            embedding: vec![],
        },
        Passage {
            text: "sidelink resource allocation".to_string(),
            metadata: HashMap::new(),
            embedding: vec![],
        },
    ];
    let index = CorpusIndex::build(passages, None, Bm25Params::default());
    assert_eq!(index.len(), 2);

    let engine = HybridSearchEngine::new(index, Box::new(ZeroDimEmbedder));
    let response = engine.search(&query("beam failure"), &SearchOptions::default());

    assert!(response.degradation.is_some());
    assert_eq!(response.results.len(), 2);
    assert!(response.results.iter().all(|r| r.semantic_score == 0.0));
    assert_eq!(response.results[0].passage.text, "beam failure recovery timer");
}

#[test]
fn search_is_deterministic() {
    let engine = engine();
    let opts = SearchOptions { alpha: 0.4, ..Default::default() };
    let q = query("sidelink v2x beam failure");
    let a = engine.search(&q, &opts);
    let b = engine.search(&q, &opts);
    let titles = |r: &priorart_hybrid::SearchResponse| {
        r.results.iter().map(|s| s.passage.metadata["title"].clone()).collect::<Vec<_>>()
    };
    assert_eq!(titles(&a), titles(&b));
    for (x, y) in a.results.iter().zip(&b.results) {
        assert_eq!(x.fused_score, y.fused_score);
    }
}

#[test]
fn reindex_swaps_the_snapshot_atomically() {
    let engine = engine();
    assert_eq!(engine.corpus_len(), 3);

    let replacement = vec![passage("a fresh corpus about handover", &[("title", "Handover")])];
    engine.reindex(CorpusIndex::build(replacement, Some(DIM), Bm25Params::default()));

    assert_eq!(engine.corpus_len(), 1);
    let response = engine.search(&query("handover"), &SearchOptions::default());
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].passage.metadata["title"], "Handover");
}

#[test]
fn metadata_values_are_sorted_and_distinct() {
    let engine = engine();
    assert_eq!(engine.metadata_values("status"), vec!["Agreed", "Draft"]);
    assert_eq!(engine.metadata_values("type"), vec!["CR", "TDoc"]);
    assert!(engine.metadata_values("nonexistent").is_empty());
}

#[test]
fn quoted_phrase_extraction() {
    assert_eq!(
        extract_quoted_phrases(r#"find "Beam Failure Recovery" in "NR V2X" docs"#),
        vec!["beam failure recovery".to_string(), "nr v2x".to_string()]
    );
    assert!(extract_quoted_phrases("no quotes here").is_empty());
    assert!(extract_quoted_phrases(r#"dangling "quote"#).is_empty());
    assert!(extract_quoted_phrases(r#"empty "" pair"#).is_empty());
}

#[test]
fn enriched_pipeline_composes_with_the_engine() {
    use priorart_core::config::EnrichSettings;
    use priorart_enrich::{BoostTermSet, ClaimPipeline, DomainConstraintTable, Vocabulary};

    let mut base = HashMap::new();
    base.insert("UE".to_string(), "User Equipment".to_string());
    let pipeline = ClaimPipeline::new(
        Vocabulary::merged(base, HashMap::new()),
        DomainConstraintTable::builtin(),
        BoostTermSet::builtin(),
        EnrichSettings::default(),
    );

    let q = pipeline
        .process("A method comprising a UE configured to use sidelink transmission.");
    let response = engine().search(&q, &SearchOptions { alpha: 0.2, ..Default::default() });

    // The sidelink constraint keeps the BFR passage out, and boost
    // repetition favours the sidelink passage lexically.
    assert!(!response.results.is_empty());
    for result in &response.results {
        assert_ne!(result.passage.metadata["title"], "BFR Timer");
    }
    assert_eq!(response.results[0].passage.metadata["title"], "Sidelink Resource Allocation");
}
