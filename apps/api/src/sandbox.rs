//! Path containment for request-supplied workspace paths.
//!
//! Callers address artifacts by paths relative to the workspace home.
//! Resolution is lexical: `..` components are folded without touching the
//! filesystem, because a validated artifact may legitimately not exist yet —
//! a missing file must surface as a violation, not a resolution error.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("Path escapes workspace home: {0}")]
    Escape(String),
}

/// Resolves a request-supplied path against the workspace home.
///
/// Relative paths are joined onto `home`; absolute paths must already lie
/// inside it. Any path that climbs above `home` is rejected.
pub fn resolve_within_home(home: &Path, raw: &str) -> Result<PathBuf, SandboxError> {
    let candidate = Path::new(raw);
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        home.join(candidate)
    };

    let normalized = normalize(&joined).ok_or_else(|| SandboxError::Escape(raw.to_string()))?;

    if normalized.starts_with(home) {
        Ok(normalized)
    } else {
        Err(SandboxError::Escape(raw.to_string()))
    }
}

/// Folds `.` and `..` components lexically. Returns `None` when `..` would
/// climb above the filesystem root.
fn normalize(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            other => out.push(other),
        }
    }
    Some(out)
}
