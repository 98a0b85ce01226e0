use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::guardrails::{validate_artifacts, ValidationResult};
use crate::sandbox::resolve_within_home;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    /// Artifact paths relative to the workspace home.
    pub artifact_paths: Vec<String>,
    /// When true (the default), a failing report becomes an HTTP 400 so the
    /// caller's pipeline stops. When false, the report is returned as-is and
    /// the caller decides.
    #[serde(default = "default_fail_on_violations")]
    pub fail_on_violations: bool,
}

fn default_fail_on_violations() -> bool {
    true
}

/// POST /api/v1/validate
pub async fn handle_validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Result<Json<ValidationResult>, AppError> {
    let mut artifact_paths = Vec::with_capacity(req.artifact_paths.len());
    for raw in &req.artifact_paths {
        artifact_paths.push(resolve_within_home(&state.config.home, raw)?);
    }

    let result = validate_artifacts(&state.config.profile_path(), &artifact_paths);

    if req.fail_on_violations && !result.passed {
        return Err(AppError::Validation(format!(
            "Validation failed with {} violations",
            result.violations.len()
        )));
    }

    info!(
        "Validation complete: {} violations, passed={}",
        result.violations.len(),
        result.passed
    );

    Ok(Json(result))
}
