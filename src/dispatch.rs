//! Vocabulary dispatch routing
//!
//! Maps (vocabulary kind, locale) to the query plans that should be
//! dispatched for a lookup. The table is declared as plain serde data
//! (`DispatchConfig`), compiled once at startup into a validated
//! `DispatchRouter`, and consulted per request with no I/O: routing is
//! a pure decision function that either yields plans or an empty list.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::normalize::NormalizerRegistry;
use crate::types::{QueryPlan, TermQuery};

const DEFAULT_MIN_TERM_LEN: usize = 3;
const DEFAULT_MAX_HITS: usize = 50;
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const FINTO_SEARCH_ENDPOINT: &str = "https://api.finto.fi/rest/v1/search";

// Vocabulary kind names follow the host's controlled vocab symbolics.
pub const KIND_KEYWORD: &str = "submissionKeyword";
pub const KIND_DISCIPLINE: &str = "submissionDiscipline";

fn default_min_term_len() -> usize {
    DEFAULT_MIN_TERM_LEN
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_max_hits() -> usize {
    DEFAULT_MAX_HITS
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Declarative dispatch table: which kinds are supported, in which
/// locales, and which remote calls serve each kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Sanitized terms shorter than this never produce a plan
    #[serde(default = "default_min_term_len")]
    pub min_term_len: usize,
    pub kinds: Vec<KindRule>,
}

/// One vocabulary kind and the plans that serve it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindRule {
    pub kind: String,
    /// Locales the vocabularies behind this kind actually cover
    pub locales: Vec<String>,
    pub plans: Vec<PlanTemplate>,
}

/// Static description of one remote call, before the term is known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTemplate {
    /// Service identity; must have a normalizer registered under this name
    pub service: String,
    #[serde(default = "default_method")]
    pub method: String,
    pub endpoint: String,
    /// Vocabulary identifier passed to the service (e.g. "koko")
    pub vocab: String,
    #[serde(default = "default_max_hits")]
    pub max_hits: usize,
    /// Extra service-specific query parameters
    #[serde(default)]
    pub params: BTreeMap<String, String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl DispatchConfig {
    /// Default table for the Finto SKOS REST API: keywords search the
    /// KOKO ontology cloud, disciplines fan out to the OKM discipline
    /// classification and YSO in parallel.
    pub fn finto_defaults() -> Self {
        let allowed = vec!["fi".to_string(), "sv".to_string(), "en".to_string()];
        Self {
            min_term_len: DEFAULT_MIN_TERM_LEN,
            kinds: vec![
                KindRule {
                    kind: KIND_KEYWORD.to_string(),
                    locales: allowed.clone(),
                    plans: vec![PlanTemplate {
                        service: "finto-koko".to_string(),
                        method: default_method(),
                        endpoint: FINTO_SEARCH_ENDPOINT.to_string(),
                        vocab: "koko".to_string(),
                        max_hits: DEFAULT_MAX_HITS,
                        params: BTreeMap::new(),
                        timeout_ms: DEFAULT_TIMEOUT_MS,
                    }],
                },
                KindRule {
                    kind: KIND_DISCIPLINE.to_string(),
                    locales: allowed,
                    plans: vec![
                        PlanTemplate {
                            service: "finto-okm-tieteenala".to_string(),
                            method: default_method(),
                            endpoint: FINTO_SEARCH_ENDPOINT.to_string(),
                            vocab: "okm-tieteenala".to_string(),
                            max_hits: DEFAULT_MAX_HITS,
                            params: BTreeMap::new(),
                            timeout_ms: DEFAULT_TIMEOUT_MS,
                        },
                        PlanTemplate {
                            service: "finto-yso".to_string(),
                            method: default_method(),
                            endpoint: FINTO_SEARCH_ENDPOINT.to_string(),
                            vocab: "yso".to_string(),
                            max_hits: DEFAULT_MAX_HITS,
                            params: BTreeMap::new(),
                            timeout_ms: DEFAULT_TIMEOUT_MS,
                        },
                    ],
                },
            ],
        }
    }

    /// Parse a dispatch table from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a dispatch table from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dispatch config {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("Failed to parse dispatch config {}", path.display()))
    }

    /// All service names referenced by the table, in registration order.
    pub fn service_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for rule in &self.kinds {
            for plan in &rule.plans {
                if !names.contains(&plan.service.as_str()) {
                    names.push(plan.service.as_str());
                }
            }
        }
        names
    }
}

#[derive(Debug)]
struct CompiledPlan {
    service: String,
    method: Method,
    endpoint: Url,
    vocab: String,
    max_hits: usize,
    params: BTreeMap<String, String>,
    timeout: Duration,
}

#[derive(Debug)]
struct CompiledRule {
    locales: HashSet<String>,
    plans: Vec<CompiledPlan>,
}

/// Validated, compiled dispatch table.
#[derive(Debug)]
pub struct DispatchRouter {
    min_term_len: usize,
    rules: HashMap<String, CompiledRule>,
}

impl DispatchRouter {
    /// Compile a dispatch table, failing fast on any misconfiguration:
    /// unparseable endpoint or method, a kind with no plans or locales,
    /// or a plan whose service has no registered normalizer.
    pub fn new(config: &DispatchConfig, registry: &NormalizerRegistry) -> Result<Self, ConfigError> {
        let mut rules = HashMap::new();
        for rule in &config.kinds {
            if rule.plans.is_empty() {
                return Err(ConfigError::EmptyKind(rule.kind.clone()));
            }
            if rule.locales.is_empty() {
                return Err(ConfigError::NoLocales(rule.kind.clone()));
            }
            let mut plans = Vec::with_capacity(rule.plans.len());
            for template in &rule.plans {
                if !registry.contains(&template.service) {
                    return Err(ConfigError::MissingNormalizer {
                        kind: rule.kind.clone(),
                        service: template.service.clone(),
                    });
                }
                let endpoint =
                    Url::parse(&template.endpoint).map_err(|source| ConfigError::InvalidEndpoint {
                        service: template.service.clone(),
                        source,
                    })?;
                let method = Method::from_bytes(template.method.as_bytes()).map_err(|_| {
                    ConfigError::InvalidMethod {
                        service: template.service.clone(),
                        method: template.method.clone(),
                    }
                })?;
                plans.push(CompiledPlan {
                    service: template.service.clone(),
                    method,
                    endpoint,
                    vocab: template.vocab.clone(),
                    max_hits: template.max_hits,
                    params: template.params.clone(),
                    timeout: Duration::from_millis(template.timeout_ms),
                });
            }
            rules.insert(
                rule.kind.clone(),
                CompiledRule {
                    locales: rule.locales.iter().cloned().collect(),
                    plans,
                },
            );
        }
        Ok(Self {
            min_term_len: config.min_term_len,
            rules,
        })
    }

    /// Select the plans for one lookup. Pure: no side effects, no I/O.
    ///
    /// Returns an empty list when the kind is unknown, the locale is not
    /// in the kind's allowed set, or the sanitized term is too short.
    pub fn route(&self, query: &TermQuery) -> Vec<QueryPlan> {
        if query.sanitized_term.chars().count() < self.min_term_len {
            tracing::debug!(
                kind = %query.kind,
                term = %query.sanitized_term,
                "term below minimum length, not dispatching"
            );
            return vec![];
        }
        let Some(rule) = self.rules.get(&query.kind) else {
            tracing::debug!(kind = %query.kind, "no dispatch rule for vocabulary kind");
            return vec![];
        };
        if !rule.locales.contains(&query.locale) {
            tracing::debug!(
                kind = %query.kind,
                locale = %query.locale,
                "locale not covered for vocabulary kind"
            );
            return vec![];
        }
        rule.plans
            .iter()
            .map(|plan| plan.build(&query.sanitized_term, &query.locale))
            .collect()
    }
}

impl CompiledPlan {
    /// Instantiate the template for a concrete term and locale. The
    /// search term gets a trailing wildcard so partial input matches.
    fn build(&self, term: &str, locale: &str) -> QueryPlan {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("vocab", &self.vocab);
            pairs.append_pair("query", &format!("{term}*"));
            pairs.append_pair("lang", locale);
            pairs.append_pair("maxhits", &self.max_hits.to_string());
            for (key, value) in &self.params {
                pairs.append_pair(key, value);
            }
        }
        QueryPlan {
            service: self.service.clone(),
            method: self.method.clone(),
            url,
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            timeout: self.timeout,
        }
    }
}
