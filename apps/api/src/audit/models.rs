use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Pipeline operation being audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationType {
    Prepare,
    Rank,
    BuildCv,
    BuildCover,
    BuildSupplemental,
    Validate,
    Apply,
    Notify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Success,
    Failed,
    Partial,
}

/// Record of a tool call made during an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    /// ISO timestamp of the call.
    pub timestamp: String,
    #[serde(default)]
    pub input_hash: String,
    #[serde(default)]
    pub output_hash: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub error: String,
}

/// Record of an artifact file produced by an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub path: String,
    /// cv, cover_letter, supplemental, screenshot, evidence
    #[serde(rename = "type")]
    pub artifact_type: String,
    /// SHA-256 hex digest of the file contents; empty when the file was
    /// missing at hash time.
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub size_bytes: u64,
}

/// Single audit entry for one operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entry_id: String,
    pub run_id: String,
    pub operation: OperationType,
    pub timestamp_start: String,
    #[serde(default)]
    pub timestamp_end: String,
    /// Prompt text with PII already removed.
    #[serde(default)]
    pub prompt_redacted: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default)]
    pub artifacts: Vec<ArtifactRecord>,
    pub status: EntryStatus,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Complete audit trail for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRun {
    pub run_id: String,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: String,
    /// What triggered this run: USER, SCHEDULED, API.
    pub trigger: String,
    #[serde(default)]
    pub job_ids: Vec<String>,
    #[serde(default)]
    pub entries: Vec<AuditEntry>,
    #[serde(default)]
    pub total_operations: usize,
    #[serde(default)]
    pub successful_operations: usize,
    #[serde(default)]
    pub failed_operations: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreateRunRequest {
    pub trigger: String,
    #[serde(default)]
    pub job_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateRunResponse {
    pub run_id: String,
    pub created_at: String,
}

#[derive(Debug, Deserialize)]
pub struct LogAuditRequest {
    pub run_id: String,
    pub operation: OperationType,
    pub timestamp_start: String,
    #[serde(default)]
    pub timestamp_end: String,
    #[serde(default)]
    pub prompt_redacted: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default)]
    pub artifacts: Vec<ArtifactRecord>,
    pub status: EntryStatus,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Summary row for the run listing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub created_at: String,
    pub trigger: String,
    pub total_operations: usize,
    pub successful_operations: usize,
    pub failed_operations: usize,
    pub job_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_type_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&OperationType::BuildCv).unwrap(),
            r#""BUILD_CV""#
        );
        let op: OperationType = serde_json::from_str(r#""VALIDATE""#).unwrap();
        assert_eq!(op, OperationType::Validate);
    }

    #[test]
    fn test_log_request_minimal_body() {
        let req: LogAuditRequest = serde_json::from_str(
            r#"{
                "run_id": "run_x",
                "operation": "VALIDATE",
                "timestamp_start": "2026-08-07T12:00:00Z",
                "status": "SUCCESS"
            }"#,
        )
        .unwrap();
        assert!(req.tool_calls.is_empty());
        assert!(req.artifacts.is_empty());
        assert!(req.metadata.is_empty());
        assert_eq!(req.status, EntryStatus::Success);
    }

    #[test]
    fn test_artifact_record_type_field_name() {
        let rec: ArtifactRecord =
            serde_json::from_str(r#"{"path": "jobs/acme/cv.html", "type": "cv"}"#).unwrap();
        assert_eq!(rec.artifact_type, "cv");
        assert_eq!(rec.hash, "");
    }
}
