//! Query text normalization.
//!
//! Used wherever query text becomes a lookup key (popular-query cache) and
//! for tokenizing preprint dumps. Lower-cases, replaces each punctuation
//! character with a space, trims, and collapses runs of spaces.
//!
//! Hyphens and parentheses are not treated as punctuation, so `sars-cov-2`
//! stays one token.

const PUNCTUATION: &str = "!\"#$%&'*+,./:;<=>?@[\\]^_`{|}~";

/// Normalize free-text query for use as a cache key.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    let replaced: String = query
        .to_lowercase()
        .chars()
        .map(|c| if PUNCTUATION.contains(c) { ' ' } else { c })
        .collect();

    let mut out = String::with_capacity(replaced.len());
    for part in replaced.trim().split(' ').filter(|p| !p.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}

/// Normalize then split on any whitespace, so line breaks and tabs
/// separate tokens even though the normalized key keeps them.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    normalize_query(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
