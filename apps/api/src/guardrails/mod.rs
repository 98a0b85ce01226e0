//! Artifact guardrails — the gate between generated application documents
//! and the review workflow.
//!
//! Three independent passes share one profile lookup: evidence tracing,
//! skill verification, and date/title auditing. A failed check is data (a
//! `Violation`), never an error — the validator's job is to enumerate every
//! problem, not stop at the first one. The only full-batch abort is a
//! profile that cannot be loaded.

pub mod dates;
pub mod evidence;
pub mod handlers;
pub mod profile;
pub mod skills;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use self::profile::load_profile;

/// A single check failure. Violations are only ever appended, never merged
/// or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub artifact: String,
    /// 1-based line number; `None` for file-level failures.
    pub line: Option<u32>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub violations: Vec<Violation>,
    /// Reserved for remediation hints; currently never populated.
    pub suggestions: Vec<String>,
}

/// Validates artifacts against the canonical profile.
///
/// Pure, synchronous, and stateless: the profile is read fresh on every
/// call, a missing or unreadable artifact records one violation and the
/// batch continues, and identical inputs always produce identical results.
pub fn validate_artifacts(profile_path: &Path, artifact_paths: &[PathBuf]) -> ValidationResult {
    let mut violations: Vec<Violation> = Vec::new();
    let suggestions: Vec<String> = Vec::new();

    let profile = match load_profile(profile_path) {
        Ok(profile) => profile,
        Err(err) => {
            violations.push(Violation {
                artifact: "profile".to_string(),
                line: None,
                reason: err.to_string(),
            });
            return ValidationResult {
                passed: false,
                violations,
                suggestions,
            };
        }
    };

    for artifact_path in artifact_paths {
        let artifact = artifact_path.display().to_string();

        if !artifact_path.exists() {
            violations.push(Violation {
                artifact,
                line: None,
                reason: format!("Artifact not found at {}", artifact_path.display()),
            });
            continue;
        }

        let content = match std::fs::read_to_string(artifact_path) {
            Ok(content) => content,
            Err(err) => {
                violations.push(Violation {
                    artifact,
                    line: None,
                    reason: format!("Failed to read artifact: {err}"),
                });
                continue;
            }
        };

        evidence::check_evidence_tracing(&artifact, &content, &profile, &mut violations);
        skills::check_unverified_skills(&artifact, &content, &profile, &mut violations);
        dates::check_dates_and_titles(&artifact, &content, &profile, &mut violations);
    }

    let passed = violations.is_empty();
    ValidationResult {
        passed,
        violations,
        suggestions,
    }
}
