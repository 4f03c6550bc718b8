//! Response normalization
//!
//! Each remote service returns its own JSON shape; a `ResponseNormalizer`
//! turns one service's raw success body into common `Suggestion` records.
//! Normalizers are registered under service names at startup and looked
//! up by key per response. Normalization is infallible: a body that
//! cannot be understood yields zero suggestions, never an error.

pub mod skos;

use std::collections::HashMap;
use std::sync::Arc;

use crate::types::Suggestion;

/// Converts one service's raw response body into suggestions.
///
/// Only invoked for successful fetch outcomes. Implementations must
/// drop entries that cannot yield a non-empty term, deduplicate by the
/// service's native unique key within the response, and stamp the given
/// service name on every suggestion.
pub trait ResponseNormalizer: Send + Sync {
    fn normalize(&self, service: &str, raw_body: &str) -> Vec<Suggestion>;
}

/// Service name → normalizer lookup, populated at startup.
#[derive(Default)]
pub struct NormalizerRegistry {
    normalizers: HashMap<String, Arc<dyn ResponseNormalizer>>,
}

impl NormalizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, service: impl Into<String>, normalizer: Arc<dyn ResponseNormalizer>) {
        self.normalizers.insert(service.into(), normalizer);
    }

    pub fn contains(&self, service: &str) -> bool {
        self.normalizers.contains_key(service)
    }

    /// Normalize a success body for the named service.
    ///
    /// Router compilation guarantees every dispatched service has a
    /// normalizer; an unknown name here still degrades to zero
    /// suggestions rather than panicking.
    pub fn normalize(&self, service: &str, raw_body: &str) -> Vec<Suggestion> {
        match self.normalizers.get(service) {
            Some(normalizer) => normalizer.normalize(service, raw_body),
            None => {
                tracing::warn!(service = %service, "no normalizer for service, dropping response");
                vec![]
            }
        }
    }
}
