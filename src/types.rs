//! Core data types for the vocabulary lookup pipeline
//!
//! Everything here is request-scoped: a `TermQuery` is built once per
//! incoming lookup, the `QueryPlan`s derived from it are owned by the
//! fetch call that executes them, and `FetchOutcome`s are consumed by
//! normalization and then dropped. Nothing is cached across requests.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// One incoming lookup, immutable after sanitization.
#[derive(Debug, Clone)]
pub struct TermQuery {
    /// Term exactly as the user typed it
    pub raw_term: String,
    /// Term after tag/control-character stripping and whitespace collapse
    pub sanitized_term: String,
    /// Language code the host resolved for the field (e.g. "fi", "en")
    pub locale: String,
    /// Controlled-vocabulary field being completed (e.g. "submissionKeyword")
    pub kind: String,
}

/// An immutable description of one outbound request to one service.
///
/// Built by the dispatch router from static configuration plus the
/// sanitized term and locale. The URL is fully formed, query string
/// included, by the time a plan exists.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    /// Service identity, used to look up the normalizer for the response
    pub service: String,
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    /// Per-plan timeout; a slow service only delays its own outcome
    pub timeout: Duration,
}

/// Why a plan settled without a usable body.
#[derive(Debug, Clone, Error)]
pub enum FetchFailure {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("fetch task failed to complete: {0}")]
    TaskJoin(String),
}

/// Terminal state of one `QueryPlan`, success or failure.
///
/// A failed outcome is final for the request; there is no retry layer.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub service: String,
    /// HTTP status, when the transport got that far
    pub status: Option<u16>,
    /// Raw response body, present only on success
    pub body: Option<String>,
    pub failure: Option<FetchFailure>,
}

impl FetchOutcome {
    pub fn success(service: impl Into<String>, status: u16, body: String) -> Self {
        Self {
            service: service.into(),
            status: Some(status),
            body: Some(body),
            failure: None,
        }
    }

    pub fn failure(service: impl Into<String>, failure: FetchFailure) -> Self {
        let status = match &failure {
            FetchFailure::Status(code) => Some(*code),
            _ => None,
        };
        Self {
            service: service.into(),
            status,
            body: None,
            failure: Some(failure),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    /// Body for normalization; `None` for any failed outcome.
    pub fn success_body(&self) -> Option<&str> {
        if self.succeeded() {
            self.body.as_deref()
        } else {
            None
        }
    }
}

/// A normalized candidate term handed back across the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The term itself; always non-empty
    pub term: String,
    /// Display label, `"<term> [ <identifier> ]"` when an identifier is shown
    pub label: String,
    /// Canonical resource identifier (e.g. a SKOS concept URI); the
    /// deduplication key when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Which service produced this suggestion
    pub service: String,
    /// Service-specific extras (vocabulary id, language, alternate label)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, String>,
}
