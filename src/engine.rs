//! Vocabulary lookup engine
//!
//! The public boundary of the crate. Wires sanitizer, dispatch router,
//! concurrent fetcher, normalizer registry, and aggregator into one
//! lookup call. The only fallible operation is construction, which
//! validates the dispatch table; `suggest` itself never errors — every
//! per-request failure degrades to fewer or zero suggestions.

use std::sync::Arc;

use crate::aggregate::aggregate;
use crate::dispatch::{DispatchConfig, DispatchRouter};
use crate::error::ConfigError;
use crate::fetch::{HttpFetcher, PlanFetcher};
use crate::normalize::skos::SkosNormalizer;
use crate::normalize::{NormalizerRegistry, ResponseNormalizer};
use crate::sanitize::TermSanitizer;
use crate::types::{Suggestion, TermQuery};

/// Concurrent multi-service term lookup engine.
pub struct VocabLookupEngine {
    sanitizer: TermSanitizer,
    router: DispatchRouter,
    fetcher: Arc<dyn PlanFetcher>,
    normalizers: NormalizerRegistry,
}

impl VocabLookupEngine {
    /// Build an engine over the production HTTP fetcher.
    ///
    /// Fails fast on a misconfigured dispatch table, including any plan
    /// whose service has no normalizer in the registry.
    pub fn new(config: DispatchConfig, normalizers: NormalizerRegistry) -> Result<Self, ConfigError> {
        let fetcher = Arc::new(HttpFetcher::new()?);
        Self::with_fetcher(config, normalizers, fetcher)
    }

    /// Build an engine over a caller-supplied fetcher.
    pub fn with_fetcher(
        config: DispatchConfig,
        normalizers: NormalizerRegistry,
        fetcher: Arc<dyn PlanFetcher>,
    ) -> Result<Self, ConfigError> {
        let router = DispatchRouter::new(&config, &normalizers)?;
        Ok(Self {
            sanitizer: TermSanitizer::new(),
            router,
            fetcher,
            normalizers,
        })
    }

    /// Default wiring against the Finto SKOS REST API.
    pub fn finto() -> Result<Self, ConfigError> {
        let config = DispatchConfig::finto_defaults();
        let normalizers = skos_registry(&config);
        Self::new(config, normalizers)
    }

    /// Look up suggestions for a partial term.
    ///
    /// An empty list covers "no matches", "kind/locale not supported",
    /// "term too short", and "every service failed" alike; failures are
    /// reported through logging, never the return value.
    pub async fn suggest(&self, kind: &str, term: Option<&str>, locale: &str) -> Vec<Suggestion> {
        let sanitized_term = self.sanitizer.sanitize(term);
        let query = TermQuery {
            raw_term: term.unwrap_or("").to_string(),
            sanitized_term,
            locale: locale.to_string(),
            kind: kind.to_string(),
        };

        let plans = self.router.route(&query);
        if plans.is_empty() {
            return vec![];
        }

        tracing::debug!(
            kind = %query.kind,
            term = %query.sanitized_term,
            locale = %query.locale,
            plan_count = plans.len(),
            "dispatching vocabulary lookup"
        );

        let outcomes = self.fetcher.fetch_all(plans).await;

        let mut per_service = Vec::with_capacity(outcomes.len());
        for outcome in &outcomes {
            let suggestions = match outcome.success_body() {
                Some(body) => self.normalizers.normalize(&outcome.service, body),
                // Failed outcomes were already logged by the fetcher.
                None => vec![],
            };
            per_service.push((outcome.service.clone(), suggestions));
        }

        aggregate(per_service)
    }
}

/// Register the SKOS normalizer under every service name the dispatch
/// table references. Finto-backed vocabularies all share one response
/// shape, so one normalizer instance serves them all.
pub fn skos_registry(config: &DispatchConfig) -> NormalizerRegistry {
    let mut registry = NormalizerRegistry::new();
    let skos: Arc<dyn ResponseNormalizer> = Arc::new(SkosNormalizer);
    for service in config.service_names() {
        registry.register(service, skos.clone());
    }
    registry
}
