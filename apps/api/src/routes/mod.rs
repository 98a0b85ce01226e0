pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::audit::handlers as audit_handlers;
use crate::guardrails::handlers as guardrail_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Guardrail validation
        .route(
            "/api/v1/validate",
            post(guardrail_handlers::handle_validate),
        )
        // Audit trail
        .route(
            "/api/v1/audit/runs",
            post(audit_handlers::handle_create_run).get(audit_handlers::handle_list_runs),
        )
        .route(
            "/api/v1/audit/runs/:run_id",
            get(audit_handlers::handle_get_run),
        )
        .route("/api/v1/audit/log", post(audit_handlers::handle_log_entry))
        .with_state(state)
}
