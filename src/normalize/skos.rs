//! Normalization for SKOS search responses (Finto shape)
//!
//! The Finto REST API returns `{"results": [{"prefLabel": …, "uri": …,
//! "vocab": …, "lang": …}, …]}`. One normalizer instance serves every
//! Finto-backed vocabulary; the service identity is passed per call.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use super::ResponseNormalizer;
use crate::types::Suggestion;

/// Extra fields copied onto `Suggestion.extra` when present and string-valued.
const EXTRA_KEYS: [&str; 3] = ["vocab", "lang", "altLabel"];

/// Normalizer for SKOS concept search results.
pub struct SkosNormalizer;

impl ResponseNormalizer for SkosNormalizer {
    fn normalize(&self, service: &str, raw_body: &str) -> Vec<Suggestion> {
        let value: Value = match serde_json::from_str(raw_body) {
            Ok(v) => v,
            Err(error) => {
                tracing::debug!(service = %service, error = %error, "response is not JSON");
                return vec![];
            }
        };

        // Anything without a top-level results array is "no results".
        let Some(results) = value.get("results").and_then(|r| r.as_array()) else {
            return vec![];
        };

        let mut seen_uris = HashSet::new();
        let mut seen_terms = HashSet::new();
        let mut suggestions = Vec::new();

        for entry in results {
            let term = entry
                .get("prefLabel")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .trim();
            if term.is_empty() {
                continue;
            }

            let uri = entry
                .get("uri")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .trim();

            // Within-response dedup: by concept URI when there is one,
            // by exact term otherwise. First occurrence wins.
            if uri.is_empty() {
                if !seen_terms.insert(term.to_string()) {
                    continue;
                }
            } else if !seen_uris.insert(uri.to_string()) {
                continue;
            }

            let label = if is_concept_uri(uri) {
                format!("{term} [ {uri} ]")
            } else {
                term.to_string()
            };

            let mut extra = HashMap::new();
            for key in EXTRA_KEYS {
                if let Some(text) = entry.get(key).and_then(|v| v.as_str()) {
                    extra.insert(key.to_string(), text.to_string());
                }
            }

            suggestions.push(Suggestion {
                term: term.to_string(),
                label,
                identifier: if uri.is_empty() {
                    None
                } else {
                    Some(uri.to_string())
                },
                service: service.to_string(),
                extra,
            });
        }

        suggestions
    }
}

/// Finto concept URIs are plain http(s) resource URIs.
fn is_concept_uri(uri: &str) -> bool {
    uri.starts_with("http://") || uri.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(body: &str) -> Vec<Suggestion> {
        SkosNormalizer.normalize("finto-koko", body)
    }

    #[test]
    fn test_single_entry_gets_bracketed_label() {
        let body = r#"{"results":[{"prefLabel":"Climate change","uri":"http://x/123"}]}"#;
        let suggestions = normalize(body);
        assert_eq!(suggestions.len(), 1);
        let s = &suggestions[0];
        assert_eq!(s.term, "Climate change");
        assert_eq!(s.label, "Climate change [ http://x/123 ]");
        assert_eq!(s.identifier.as_deref(), Some("http://x/123"));
        assert_eq!(s.service, "finto-koko");
    }

    #[test]
    fn test_duplicate_uris_keep_first_occurrence() {
        let body = r#"{"results":[
            {"prefLabel":"Climate change","uri":"http://x/123"},
            {"prefLabel":"Climate change","uri":"http://x/123"}
        ]}"#;
        let suggestions = normalize(body);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].term, "Climate change");
    }

    #[test]
    fn test_entries_without_term_are_dropped() {
        let body = r#"{"results":[
            {"uri":"http://x/1"},
            {"prefLabel":"","uri":"http://x/2"},
            {"prefLabel":"Glaciers","uri":"http://x/3"}
        ]}"#;
        let suggestions = normalize(body);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].term, "Glaciers");
    }

    #[test]
    fn test_missing_uri_falls_back_to_plain_label() {
        let body = r#"{"results":[{"prefLabel":"Climate"}]}"#;
        let suggestions = normalize(body);
        assert_eq!(suggestions[0].label, "Climate");
        assert_eq!(suggestions[0].identifier, None);
    }

    #[test]
    fn test_non_http_uri_not_shown_in_label_but_kept_as_identifier() {
        let body = r#"{"results":[{"prefLabel":"Climate","uri":"urn:uuid:1234"}]}"#;
        let suggestions = normalize(body);
        assert_eq!(suggestions[0].label, "Climate");
        assert_eq!(suggestions[0].identifier.as_deref(), Some("urn:uuid:1234"));
    }

    #[test]
    fn test_duplicate_terms_without_uri_deduplicated() {
        let body = r#"{"results":[
            {"prefLabel":"Climate"},
            {"prefLabel":"Climate"},
            {"prefLabel":"Weather"}
        ]}"#;
        let suggestions = normalize(body);
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn test_extra_fields_copied_when_present() {
        let body = r#"{"results":[
            {"prefLabel":"ilmastonmuutos","uri":"http://x/9","vocab":"koko","lang":"fi"}
        ]}"#;
        let suggestions = normalize(body);
        assert_eq!(suggestions[0].extra.get("vocab").map(String::as_str), Some("koko"));
        assert_eq!(suggestions[0].extra.get("lang").map(String::as_str), Some("fi"));
        assert!(suggestions[0].extra.get("altLabel").is_none());
    }

    #[test]
    fn test_unknown_shapes_normalize_to_empty() {
        assert!(normalize("").is_empty());
        assert!(normalize("not json at all").is_empty());
        assert!(normalize("{}").is_empty());
        assert!(normalize(r#"{"results":"nope"}"#).is_empty());
        assert!(normalize(r#"{"items":[{"prefLabel":"x"}]}"#).is_empty());
        assert!(normalize(r#"[1,2,3]"#).is_empty());
    }
}
