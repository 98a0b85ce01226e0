//! Canonical profile — the user-verified ground truth that generated
//! artifacts are checked against. The validator never mutates it.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One employment role. Any field may be an empty string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

/// The canonical profile record, parsed once per validation call.
///
/// Fields are optional on purpose: a key absent from the source JSON stays
/// `None`, and every evidence reference to it resolves false.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CanonicalProfile {
    #[serde(default)]
    pub contact: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub roles: Option<Vec<Role>>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub education: Option<Vec<String>>,
    #[serde(default)]
    pub achievements: Option<Vec<String>>,
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile not found at {0}")]
    NotFound(String),

    #[error("Failed to load profile: {0}")]
    Unreadable(#[source] std::io::Error),

    #[error("Failed to load profile: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Loads and parses the canonical profile. Failure here aborts the whole
/// validation call — the caller must not read any artifact afterwards.
pub fn load_profile(path: &Path) -> Result<CanonicalProfile, ProfileError> {
    if !path.exists() {
        return Err(ProfileError::NotFound(path.display().to_string()));
    }
    let raw = std::fs::read_to_string(path).map_err(ProfileError::Unreadable)?;
    serde_json::from_str(&raw).map_err(ProfileError::Malformed)
}

/// Grammar for evidence references: `key` or `key[index]`.
static REFERENCE_GRAMMAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-z_]+)(?:\[(\d+)\])?$").expect("invalid reference grammar"));

/// Checks whether an evidence reference points at a real profile entry.
///
/// A bare key resolves true when the key is present. An indexed key resolves
/// true only for a present sequence field with the index in bounds. Indexing
/// the `contact` mapping is never valid, not even `contact[0]`.
pub fn resolve_reference(reference: &str, profile: &CanonicalProfile) -> bool {
    let Some(caps) = REFERENCE_GRAMMAR.captures(reference) else {
        return false;
    };

    let index = match caps.get(2) {
        None => None,
        Some(m) => match m.as_str().parse::<usize>() {
            Ok(i) => Some(i),
            Err(_) => return false,
        },
    };

    match &caps[1] {
        "contact" => match (&profile.contact, index) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(_), Some(_)) => false,
        },
        "roles" => sequence_reference(profile.roles.as_ref().map(Vec::len), index),
        "skills" => sequence_reference(profile.skills.as_ref().map(Vec::len), index),
        "education" => sequence_reference(profile.education.as_ref().map(Vec::len), index),
        "achievements" => sequence_reference(profile.achievements.as_ref().map(Vec::len), index),
        _ => false,
    }
}

fn sequence_reference(len: Option<usize>, index: Option<usize>) -> bool {
    match (len, index) {
        (None, _) => false,
        (Some(_), None) => true,
        (Some(len), Some(index)) => index < len,
    }
}
