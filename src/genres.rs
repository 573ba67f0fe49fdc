//! Genre field normalization
//!
//! The catalog encodes genres as a stringified list, e.g. `"['Action', 'Indie']"`.
//! This module turns that into a clean ordered list of labels. The first label
//! is the record's *primary genre*; records whose list is empty have no primary
//! genre and are excluded from primary-genre rankings.

/// Parse a raw genres string into an ordered list of trimmed labels.
///
/// Strips the list-literal punctuation (enclosing brackets, quote characters),
/// splits on commas, trims each token, and drops empty tokens. Label order
/// matches the raw encoding order. An empty or null-ish input yields an empty
/// list.
pub fn parse_genre_list(raw: &str) -> Vec<String> {
    raw.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|token| token.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// First label of a parsed genre list, if any.
pub fn primary_genre(genres: &[String]) -> Option<&str> {
    genres.first().map(String::as_str)
}
