//! End-to-end lookup tests through fake fetchers
//!
//! Drives the engine boundary with substitute `PlanFetcher`
//! implementations: a counting fetcher to prove rejected input causes
//! zero network activity, a scripted fetcher with canned per-service
//! bodies, and failure injection for partial-outage behavior.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use external_vocab::dispatch::{DispatchConfig, KIND_DISCIPLINE, KIND_KEYWORD};
use external_vocab::fetch::PlanFetcher;
use external_vocab::{skos_registry, FetchFailure, FetchOutcome, QueryPlan, VocabLookupEngine};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Counts calls and answers every plan with an empty result set.
struct CountingFetcher {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PlanFetcher for CountingFetcher {
    async fn fetch_all(&self, plans: Vec<QueryPlan>) -> Vec<FetchOutcome> {
        self.calls.fetch_add(plans.len(), Ordering::SeqCst);
        plans
            .into_iter()
            .map(|p| FetchOutcome::success(p.service, 200, r#"{"results":[]}"#.to_string()))
            .collect()
    }
}

/// Answers each service with a canned body; services missing from the
/// script settle as timeouts.
struct ScriptedFetcher {
    bodies: HashMap<String, String>,
}

impl ScriptedFetcher {
    fn new(bodies: &[(&str, &str)]) -> Self {
        Self {
            bodies: bodies
                .iter()
                .map(|(service, body)| (service.to_string(), body.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl PlanFetcher for ScriptedFetcher {
    async fn fetch_all(&self, plans: Vec<QueryPlan>) -> Vec<FetchOutcome> {
        plans
            .into_iter()
            .map(|plan| match self.bodies.get(&plan.service) {
                Some(body) => FetchOutcome::success(plan.service, 200, body.clone()),
                None => FetchOutcome::failure(
                    plan.service,
                    FetchFailure::Timeout(Duration::from_millis(10)),
                ),
            })
            .collect()
    }
}

fn engine_with(fetcher: Arc<dyn PlanFetcher>) -> VocabLookupEngine {
    let config = DispatchConfig::finto_defaults();
    let registry = skos_registry(&config);
    VocabLookupEngine::with_fetcher(config, registry, fetcher).unwrap()
}

#[tokio::test]
async fn short_term_makes_no_network_calls() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let engine = engine_with(Arc::new(CountingFetcher {
        calls: calls.clone(),
    }));

    let suggestions = engine.suggest(KIND_KEYWORD, Some("cl"), "en").await;

    assert!(suggestions.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_kind_makes_no_network_calls() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let engine = engine_with(Arc::new(CountingFetcher {
        calls: calls.clone(),
    }));

    let suggestions = engine.suggest("submissionAgency", Some("climate"), "en").await;

    assert!(suggestions.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unsupported_locale_makes_no_network_calls() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let engine = engine_with(Arc::new(CountingFetcher {
        calls: calls.clone(),
    }));

    let suggestions = engine.suggest(KIND_KEYWORD, Some("climate"), "de").await;

    assert!(suggestions.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn absent_term_makes_no_network_calls() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let engine = engine_with(Arc::new(CountingFetcher {
        calls: calls.clone(),
    }));

    let suggestions = engine.suggest(KIND_KEYWORD, None, "en").await;

    assert!(suggestions.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn duplicate_entries_collapse_to_one_suggestion() {
    init_tracing();
    let engine = engine_with(Arc::new(ScriptedFetcher::new(&[(
        "finto-koko",
        r#"{"results":[
            {"prefLabel":"Climate change","uri":"http://x/123"},
            {"prefLabel":"Climate change","uri":"http://x/123"}
        ]}"#,
    )])));

    let suggestions = engine.suggest(KIND_KEYWORD, Some("climate"), "en").await;

    assert_eq!(suggestions.len(), 1);
    let s = &suggestions[0];
    assert_eq!(s.term, "Climate change");
    assert_eq!(s.label, "Climate change [ http://x/123 ]");
    assert_eq!(s.identifier.as_deref(), Some("http://x/123"));
    assert_eq!(s.service, "finto-koko");
}

#[tokio::test]
async fn one_timed_out_service_does_not_affect_the_other() {
    init_tracing();
    // Discipline fans out to okm-tieteenala and yso; only okm answers.
    let okm_body = r#"{"results":[
        {"prefLabel":"fysiikka","uri":"http://okm/114"},
        {"prefLabel":"avaruustiede","uri":"http://okm/115"}
    ]}"#;
    let engine = engine_with(Arc::new(ScriptedFetcher::new(&[(
        "finto-okm-tieteenala",
        okm_body,
    )])));

    let suggestions = engine.suggest(KIND_DISCIPLINE, Some("fys"), "fi").await;

    assert_eq!(suggestions.len(), 2);
    assert!(suggestions.iter().all(|s| s.service == "finto-okm-tieteenala"));

    // The healthy service alone produces the same result.
    let healthy_only = engine_with(Arc::new(ScriptedFetcher::new(&[
        ("finto-okm-tieteenala", okm_body),
        ("finto-yso", r#"{"results":[]}"#),
    ])));
    let baseline = healthy_only.suggest(KIND_DISCIPLINE, Some("fys"), "fi").await;
    assert_eq!(suggestions, baseline);
}

#[tokio::test]
async fn cross_service_identifier_collisions_keep_first_service() {
    init_tracing();
    let engine = engine_with(Arc::new(ScriptedFetcher::new(&[
        (
            "finto-okm-tieteenala",
            r#"{"results":[{"prefLabel":"fysiikka","uri":"http://shared/1"}]}"#,
        ),
        (
            "finto-yso",
            r#"{"results":[
                {"prefLabel":"fysiikka","uri":"http://shared/1"},
                {"prefLabel":"tähtitiede","uri":"http://yso/2"}
            ]}"#,
        ),
    ])));

    let suggestions = engine.suggest(KIND_DISCIPLINE, Some("fys"), "fi").await;

    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].service, "finto-okm-tieteenala");
    assert_eq!(suggestions[1].term, "tähtitiede");
}

#[tokio::test]
async fn identical_queries_yield_identical_ordered_results() {
    init_tracing();
    let engine = engine_with(Arc::new(ScriptedFetcher::new(&[
        (
            "finto-okm-tieteenala",
            r#"{"results":[{"prefLabel":"fysiikka","uri":"http://okm/114"}]}"#,
        ),
        (
            "finto-yso",
            r#"{"results":[{"prefLabel":"fysikaalinen","uri":"http://yso/9"}]}"#,
        ),
    ])));

    let first = engine.suggest(KIND_DISCIPLINE, Some("fys"), "fi").await;
    let second = engine.suggest(KIND_DISCIPLINE, Some("fys"), "fi").await;

    assert_eq!(first, second);
    assert_eq!(first[0].service, "finto-okm-tieteenala");
    assert_eq!(first[1].service, "finto-yso");
}

#[tokio::test]
async fn all_services_down_yields_empty_not_error() {
    init_tracing();
    let engine = engine_with(Arc::new(ScriptedFetcher::new(&[])));

    let suggestions = engine.suggest(KIND_DISCIPLINE, Some("fysiikka"), "fi").await;

    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn markup_in_term_is_sanitized_before_dispatch() {
    init_tracing();
    let calls = Arc::new(AtomicUsize::new(0));
    let engine = engine_with(Arc::new(CountingFetcher {
        calls: calls.clone(),
    }));

    // Tags stripped away leave "cl", below the minimum length.
    let suggestions = engine
        .suggest(KIND_KEYWORD, Some("<em>c</em>l"), "en")
        .await;

    assert!(suggestions.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
