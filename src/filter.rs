//! Keyword filtering of candidates.

use crate::Candidate;

/// Removes candidates whose title contains any keyword.
///
/// Only the raw title is checked; tag labels such as `[中字]` are not part
/// of it.
///
/// Keywords are literal, case-sensitive substrings; empty ones are
/// ignored. Order is preserved.
pub fn filter_candidates(candidates: Vec<Candidate>, error_keywords: &[String]) -> Vec<Candidate> {
    let keywords: Vec<&str> = error_keywords
        .iter()
        .map(String::as_str)
        .filter(|k| !k.is_empty())
        .collect();

    if keywords.is_empty() {
        return candidates;
    }

    candidates
        .into_iter()
        .filter(|c| !keywords.iter().any(|k| c.title.contains(k)))
        .collect()
}
