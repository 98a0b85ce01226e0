//! Date/title audit — a document asserting employment dates for a known role
//! must agree with the date range the profile records for that role.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::guardrails::profile::CanonicalProfile;
use crate::guardrails::Violation;

/// Date-like token patterns, in precedence order: bare year, MM/YYYY,
/// month-name YYYY. The same token can match more than one pattern; each
/// match is checked independently.
static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b(20\d{2})\b",
        r"\b(\d{1,2}/20\d{2})\b",
        r"(?i)\b((?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]* 20\d{2})\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid date pattern"))
    .collect()
});

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20\d{2}").expect("invalid year pattern"));

/// Scans each non-comment line for known role titles; any date tokens on a
/// line mentioning a title are checked against that role's recorded range.
///
/// The check is two-tier: first the matched date string verbatim inside the
/// recorded `start`/`end`, then just its 4-digit year. Only when both tiers
/// miss is a violation emitted. This tolerates formatting differences like
/// "Jan 2021" against a recorded start of "2021-01".
pub fn check_dates_and_titles(
    artifact: &str,
    content: &str,
    profile: &CanonicalProfile,
    violations: &mut Vec<Violation>,
) {
    // title (lowercased) -> recorded range; a later role with the same title
    // overwrites an earlier one. Roles with empty titles are not auditable.
    let mut role_ranges: BTreeMap<String, (&str, &str)> = BTreeMap::new();
    for role in profile.roles.as_deref().unwrap_or(&[]) {
        let title = role.title.to_lowercase();
        if !title.is_empty() {
            role_ranges.insert(title, (role.start.as_str(), role.end.as_str()));
        }
    }
    if role_ranges.is_empty() {
        return;
    }

    for (i, line) in content.split('\n').enumerate() {
        if line.trim().starts_with("<!--") {
            continue;
        }
        let line_lower = line.to_lowercase();

        for (title, (start, end)) in &role_ranges {
            if !line_lower.contains(title.as_str()) {
                continue;
            }

            for pattern in DATE_PATTERNS.iter() {
                for caps in pattern.captures_iter(line) {
                    let mentioned = &caps[1];
                    if start.contains(mentioned) || end.contains(mentioned) {
                        continue;
                    }
                    let year_matches = YEAR
                        .find(mentioned)
                        .map(|year| {
                            start.contains(year.as_str()) || end.contains(year.as_str())
                        })
                        .unwrap_or(false);
                    if !year_matches {
                        violations.push(Violation {
                            artifact: artifact.to_string(),
                            line: Some(i as u32 + 1),
                            reason: format!(
                                "Date mismatch: '{mentioned}' mentioned for role '{title}', \
                                 but profile shows {start} - {end}"
                            ),
                        });
                    }
                }
            }
        }
    }
}
