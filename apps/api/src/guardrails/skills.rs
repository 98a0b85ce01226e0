//! Skill verification — bans claims of skills or technologies that do not
//! appear in the profile's declared skill list.

use std::sync::LazyLock;

use regex::Regex;

use crate::guardrails::profile::CanonicalProfile;
use crate::guardrails::Violation;

/// Cue patterns capturing capitalized technology-like phrases. Ordered; kept
/// as a literal table so behavior stays byte-for-byte reviewable.
static SKILL_CUE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:experience|proficient|skilled|expertise) (?:in|with) ([A-Z][A-Za-z0-9+\-. ]+)",
        r"(?:using|leveraging|utilizing) ([A-Z][A-Za-z0-9+\-. ]+)",
        r"([A-Z][A-Za-z0-9+\-. ]+) (?:development|engineering|implementation)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid skill cue pattern"))
    .collect()
});

const SKILL_STOPWORDS: &[&str] = &["the", "and", "with", "for", "from"];

/// Scans prose lines for skill mentions and flags any that no profile skill
/// covers. Matching is symmetric substring containment, case-insensitive:
/// "Python programming" passes against a profile skill "Python", and vice
/// versa.
pub fn check_unverified_skills(
    artifact: &str,
    content: &str,
    profile: &CanonicalProfile,
    violations: &mut Vec<Violation>,
) {
    let profile_skills: Vec<String> = profile
        .skills
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(|skill| skill.to_lowercase())
        .collect();

    for (i, line) in content.split('\n').enumerate() {
        // Markup and comments are the evidence tracer's territory.
        let trimmed = line.trim();
        if trimmed.starts_with("<!--") || trimmed.starts_with('<') {
            continue;
        }

        for pattern in SKILL_CUE_PATTERNS.iter() {
            for caps in pattern.captures_iter(line) {
                let mentioned = caps[1].trim();
                if mentioned.len() < 3 {
                    continue;
                }
                let mentioned_lower = mentioned.to_lowercase();
                if SKILL_STOPWORDS.contains(&mentioned_lower.as_str()) {
                    continue;
                }

                let verified = profile_skills.iter().any(|profile_skill| {
                    mentioned_lower.contains(profile_skill.as_str())
                        || profile_skill.contains(&mentioned_lower)
                });
                if !verified {
                    violations.push(Violation {
                        artifact: artifact.to_string(),
                        line: Some(i as u32 + 1),
                        reason: format!(
                            "Unverified skill mentioned: '{mentioned}' not found in profile"
                        ),
                    });
                }
            }
        }
    }
}
