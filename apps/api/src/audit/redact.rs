//! PII redaction for audit prompts.
//!
//! Prompts are stored verbatim otherwise, so anything personally
//! identifying must be stripped before an entry is persisted.

use std::sync::LazyLock;

use regex::Regex;

/// Redaction patterns applied in order. Order matters: the dashed phone
/// pattern must run before the card pattern would see the same digits.
static PII_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        // Email addresses
        (r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b", "[EMAIL]"),
        // Phone numbers, dashed/dotted and parenthesized forms
        (r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b", "[PHONE]"),
        (r"\(\d{3}\)\s*\d{3}[-.]?\d{4}\b", "[PHONE]"),
        // API keys and tokens
        (r"sk-[a-zA-Z0-9]{48}", "[API_KEY]"),
        (r"Bearer\s+[a-zA-Z0-9_-]+", "Bearer [TOKEN]"),
        // Credit card numbers
        (r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b", "[CARD]"),
        // SSN
        (r"\b\d{3}-\d{2}-\d{4}\b", "[SSN]"),
    ]
    .iter()
    .map(|(pattern, marker)| {
        (
            Regex::new(pattern).expect("invalid PII pattern"),
            *marker,
        )
    })
    .collect()
});

/// Markers whose presence means a prompt has already been through redaction.
const REDACTION_MARKERS: &[&str] = &["[EMAIL]", "[PHONE]", "[API_KEY]"];

/// Strips emails, phone numbers, API keys, tokens, card numbers, and SSNs.
pub fn redact_pii(text: &str) -> String {
    PII_PATTERNS
        .iter()
        .fold(text.to_string(), |acc, (pattern, marker)| {
            pattern.replace_all(&acc, *marker).into_owned()
        })
}

/// True when the text already carries redaction markers, so a second pass
/// can be skipped.
pub fn looks_redacted(text: &str) -> bool {
    REDACTION_MARKERS.iter().any(|marker| text.contains(marker))
}
