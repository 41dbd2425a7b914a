//! Comparison-operator normalization shared by every clause builder.

/// Canonicalize a comparison operator token.
///
/// Upper-cases the input, then rewrites the `!`-prefixed negation shorthands
/// to their two-word SQL forms. Anything else passes through upper-cased
/// with no whitelist; the host engine decides what it accepts.
#[must_use]
pub fn normalize_compare(operator: &str) -> String {
    let operator = operator.to_uppercase();

    match operator.as_str() {
        "!IN" => "NOT IN".to_string(),
        "!LIKE" => "NOT LIKE".to_string(),
        "!BETWEEN" => "NOT BETWEEN".to_string(),
        "!EXISTS" => "NOT EXISTS".to_string(),
        "!REGEXP" => "NOT REGEXP".to_string(),
        _ => operator,
    }
}

/// Canonicalize a meta cast type token (`char`, `numeric`, ...).
#[must_use]
pub fn normalize_cast(cast: &str) -> String {
    cast.to_uppercase()
}
