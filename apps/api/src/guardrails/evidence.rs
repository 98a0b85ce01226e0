//! Evidence tracing — every substantive content line must carry an adjacent
//! evidence annotation, and every annotation must point at a real profile
//! entry. The two checks are independent passes over the document and their
//! violations are never deduplicated against each other.

use std::sync::LazyLock;

use regex::Regex;

use crate::guardrails::profile::{resolve_reference, CanonicalProfile};
use crate::guardrails::Violation;

/// Keywords that mark a paragraph as a factual claim requiring evidence.
/// Prose without these is assumed non-substantive and exempt.
const IMPACT_KEYWORDS: &[&str] = &[
    "led",
    "achieved",
    "reduced",
    "enabled",
    "implemented",
    "developed",
    "managed",
    "created",
    "experience",
    "skill",
];

/// The annotation syntax agreed with the document generator.
const EVIDENCE_MARKER: &str = "<!-- evidence:";

static EVIDENCE_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!-- evidence:([^>]+) -->").expect("invalid evidence pattern"));

static INNER_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(?:li|p)>(.*?)</(?:li|p)>").expect("invalid inner text pattern"));

/// Runs both evidence passes over one artifact, appending violations in line
/// order: first the presence pass, then the reference-validity pass.
pub fn check_evidence_tracing(
    artifact: &str,
    content: &str,
    profile: &CanonicalProfile,
    violations: &mut Vec<Violation>,
) {
    let lines: Vec<&str> = content.split('\n').collect();

    // Presence: a substantive line needs an annotation on the same line or
    // the immediately preceding one.
    for (i, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if !is_substantive(trimmed) {
            continue;
        }

        let has_evidence = trimmed.contains(EVIDENCE_MARKER)
            || (i > 0 && lines[i - 1].contains(EVIDENCE_MARKER));
        if has_evidence {
            continue;
        }

        let preview = clip(inner_text(trimmed), 50);
        violations.push(Violation {
            artifact: artifact.to_string(),
            line: Some(i as u32 + 1),
            reason: format!("Missing evidence comment for substantive content: '{preview}...'"),
        });
    }

    // Validity: every annotation anywhere in the document must resolve,
    // whether or not any substantive line needed it.
    for (i, line) in lines.iter().enumerate() {
        for caps in EVIDENCE_ANNOTATION.captures_iter(line) {
            let reference = &caps[1];
            if !resolve_reference(reference, profile) {
                violations.push(Violation {
                    artifact: artifact.to_string(),
                    line: Some(i as u32 + 1),
                    reason: format!(
                        "Evidence comment references invalid profile entry: '{reference}'"
                    ),
                });
            }
        }
    }
}

fn is_substantive(line: &str) -> bool {
    if line.contains("<li>") {
        return true;
    }
    if !line.contains("<p>") {
        return false;
    }
    let lowered = line.to_lowercase();
    IMPACT_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

/// Extracts the inner text of a bullet or paragraph; falls back to the raw
/// line when the markup does not close on the same line.
fn inner_text(line: &str) -> &str {
    INNER_TEXT
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(line)
}

fn clip(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CanonicalProfile {
        serde_json::from_str(
            r#"{
                "skills": ["Python"],
                "roles": [{"title": "Engineer", "company": "Acme", "start": "2020", "end": "2022"}]
            }"#,
        )
        .unwrap()
    }

    fn run(content: &str) -> Vec<Violation> {
        let mut violations = Vec::new();
        check_evidence_tracing("cv.html", content, &profile(), &mut violations);
        violations
    }

    #[test]
    fn test_vacuous_pass_on_plain_markup() {
        let content = "<html>\n<h1>Jane Doe</h1>\n<p>Based in Berlin.</p>\n</html>";
        assert!(run(content).is_empty());
    }

    #[test]
    fn test_bullet_without_evidence_is_flagged() {
        let violations = run("<li>Led backend rewrite</li>");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, Some(1));
        assert!(violations[0].reason.contains("Missing evidence comment"));
        assert!(violations[0].reason.contains("Led backend rewrite"));
    }

    #[test]
    fn test_bullet_with_same_line_evidence_passes() {
        let content = "<li>Led backend rewrite</li> <!-- evidence:roles[0] -->";
        assert!(run(content).is_empty());
    }

    #[test]
    fn test_bullet_with_preceding_line_evidence_passes() {
        let content = "<!-- evidence:roles[0] -->\n<li>Led backend rewrite</li>";
        assert!(run(content).is_empty());
    }

    #[test]
    fn test_paragraph_needs_impact_keyword_to_be_substantive() {
        // No impact keyword: exempt even without evidence.
        assert!(run("<p>Based in Berlin since last year.</p>").is_empty());
        // Impact keyword: requires evidence.
        let violations = run("<p>Implemented the payment pipeline.</p>");
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_invalid_reference_is_flagged_even_when_unneeded() {
        // The annotation sits next to nothing substantive, but is still checked.
        let violations = run("<h2>Skills</h2>\n<!-- evidence:skills[5] -->");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, Some(2));
        assert!(violations[0].reason.contains("skills[5]"));
    }

    #[test]
    fn test_presence_and_validity_violations_are_independent() {
        let content = "<li>Led the migration</li>\n<!-- evidence:achievements[0] -->\n<p>ok</p>";
        let violations = run(content);
        // Line 1: missing evidence. Line 2: reference into an absent key.
        assert_eq!(violations.len(), 2);
        assert!(violations[0].reason.contains("Missing evidence comment"));
        assert!(violations[1].reason.contains("invalid profile entry"));
    }

    #[test]
    fn test_preview_is_clipped_to_fifty_chars() {
        let long = "x".repeat(80);
        let violations = run(&format!("<li>{long}</li>"));
        assert_eq!(violations.len(), 1);
        assert!(violations[0].reason.contains(&"x".repeat(50)));
        assert!(!violations[0].reason.contains(&"x".repeat(51)));
    }

    #[test]
    fn test_unclosed_bullet_falls_back_to_raw_line() {
        let violations = run("<li>Led the rewrite");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].reason.contains("<li>Led the rewrite"));
    }

    #[test]
    fn test_line_numbers_are_one_based() {
        let content = "<html>\n<ul>\n<li>Managed a team</li>\n</ul>";
        let violations = run(content);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, Some(3));
    }

    #[test]
    fn test_valid_reference_emits_nothing() {
        let content = "<!-- evidence:skills[0] -->\n<li>Python experience</li>";
        assert!(run(content).is_empty());
    }
}
