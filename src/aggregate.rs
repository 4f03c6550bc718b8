//! Cross-service suggestion aggregation
//!
//! Merges per-service suggestion lists in plan registration order and
//! drops repeats of any non-empty identifier already emitted. Within-
//! service duplicates were already removed during normalization, so the
//! pass here only arbitrates between services.

use std::collections::HashSet;

use crate::types::Suggestion;

/// Merge normalized per-service lists into the final ordered result.
///
/// Input order is the order the router registered the plans, which makes
/// the output deterministic regardless of fetch completion timing. A
/// suggestion with a non-empty identifier equal to one already emitted
/// is dropped; suggestions without an identifier are never deduplicated
/// against each other here.
pub fn aggregate(per_service: Vec<(String, Vec<Suggestion>)>) -> Vec<Suggestion> {
    let mut seen_identifiers = HashSet::new();
    let mut merged = Vec::new();
    for (_service, suggestions) in per_service {
        for suggestion in suggestions {
            if let Some(identifier) = suggestion.identifier.as_deref() {
                if !identifier.is_empty() && !seen_identifiers.insert(identifier.to_string()) {
                    continue;
                }
            }
            merged.push(suggestion);
        }
    }
    merged
}
