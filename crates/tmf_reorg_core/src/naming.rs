//! Schema name segmentation for fuzzy matching.
//!
//! # Responsibility
//! - Split concatenated capitalised names into words.
//! - Produce candidate names from the longest leading-word run down to one word.
//!
//! # Invariants
//! - Candidates are yielded longest first and never include an empty name.

use once_cell::sync::Lazy;
use regex::Regex;

/// File suffix carried by every JSON Schema file in the trees.
pub const SCHEMA_SUFFIX: &str = ".schema.json";

// A word starts at any letter and runs until the next uppercase letter.
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z][^A-Z]*").expect("valid word regex"));

/// Removes a trailing `.schema.json` from `file_name` when present.
pub fn strip_schema_suffix(file_name: &str) -> &str {
    file_name.strip_suffix(SCHEMA_SUFFIX).unwrap_or(file_name)
}

/// Splits `name` on capital-letter boundaries.
///
/// `"ResourceCreateEvent"` becomes `["Resource", "Create", "Event"]`.
pub fn split_words(name: &str) -> Vec<&str> {
    WORD_RE.find_iter(name).map(|m| m.as_str()).collect()
}

/// Joined word prefixes, from all words down to the first word alone.
pub fn candidate_prefixes(words: &[&str]) -> Vec<String> {
    (1..=words.len())
        .rev()
        .map(|len| words[..len].concat())
        .collect()
}
