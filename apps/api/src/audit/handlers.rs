use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::warn;

use crate::audit::models::{
    AuditRun, CreateRunRequest, CreateRunResponse, LogAuditRequest, RunSummary,
};
use crate::audit::store::sha256_file_hex;
use crate::errors::AppError;
use crate::sandbox::resolve_within_home;
use crate::state::AppState;

#[derive(Serialize)]
pub struct LogEntryResponse {
    pub status: String,
    pub entry_id: String,
    pub run_id: String,
}

#[derive(Serialize)]
pub struct RunListResponse {
    pub runs: Vec<RunSummary>,
    pub total: usize,
}

/// POST /api/v1/audit/runs
pub async fn handle_create_run(
    State(state): State<AppState>,
    Json(req): Json<CreateRunRequest>,
) -> Result<Json<CreateRunResponse>, AppError> {
    let run = state.audit.create_run(req.trigger, req.job_ids)?;
    Ok(Json(CreateRunResponse {
        run_id: run.run_id,
        created_at: run.created_at,
    }))
}

/// POST /api/v1/audit/log
pub async fn handle_log_entry(
    State(state): State<AppState>,
    Json(mut req): Json<LogAuditRequest>,
) -> Result<Json<LogEntryResponse>, AppError> {
    // Fill in missing artifact hashes from the workspace copies. A path that
    // escapes the sandbox or no longer exists keeps an empty hash.
    for artifact in req.artifacts.iter_mut().filter(|a| a.hash.is_empty()) {
        match resolve_within_home(&state.config.home, &artifact.path) {
            Ok(resolved) => artifact.hash = sha256_file_hex(&resolved),
            Err(err) => warn!("Skipping hash for artifact {}: {err}", artifact.path),
        }
    }

    let entry = state.audit.append_entry(req)?;
    Ok(Json(LogEntryResponse {
        status: "logged".to_string(),
        entry_id: entry.entry_id,
        run_id: entry.run_id,
    }))
}

/// GET /api/v1/audit/runs
pub async fn handle_list_runs(
    State(state): State<AppState>,
) -> Result<Json<RunListResponse>, AppError> {
    let runs = state.audit.list_runs()?;
    let total = runs.len();
    Ok(Json(RunListResponse { runs, total }))
}

/// GET /api/v1/audit/runs/:run_id
pub async fn handle_get_run(
    State(state): State<AppState>,
    Path(run_id): Path<String>,
) -> Result<Json<AuditRun>, AppError> {
    Ok(Json(state.audit.load_run(&run_id)?))
}
