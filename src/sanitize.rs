//! Term sanitization
//!
//! Cleans raw user input into a safe query string before it reaches the
//! dispatch table or a remote API. Sanitization never fails and enforces
//! no length policy of its own, so it is equally usable for validation
//! and display contexts; the minimum-length cutoff lives in the router.

use regex::Regex;

/// Strips markup and control characters and collapses whitespace.
///
/// Compiles its patterns once; construct it at startup and reuse it.
pub struct TermSanitizer {
    tag_re: Regex,
}

impl TermSanitizer {
    pub fn new() -> Self {
        Self {
            tag_re: Regex::new(r"<[^>]*>").unwrap(),
        }
    }

    /// Clean a raw term. Absent input maps to an empty string.
    ///
    /// Markup tags and control characters are removed, all whitespace
    /// runs (including newlines) collapse to single spaces, and the
    /// result is trimmed to a single line.
    pub fn sanitize(&self, raw: Option<&str>) -> String {
        let raw = raw.unwrap_or("");
        let stripped = self.tag_re.replace_all(raw, "");
        // Tabs and newlines are control characters too; keep them here
        // so the whitespace collapse below turns them into separators.
        let cleaned: String = stripped
            .chars()
            .filter(|c| !c.is_control() || c.is_whitespace())
            .collect();
        cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for TermSanitizer {
    fn default() -> Self {
        Self::new()
    }
}
