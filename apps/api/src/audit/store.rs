//! File-per-run persistence for audit trails.
//!
//! Each run lives in `<audit dir>/<run_id>.json` and is rewritten whole on
//! every append. Run ids embed a UTC timestamp so lexical filename order is
//! creation order.

use std::path::PathBuf;

use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use crate::audit::models::{AuditEntry, AuditRun, EntryStatus, LogAuditRequest, RunSummary};
use crate::audit::redact::{looks_redacted, redact_pii};
use crate::errors::AppError;

#[derive(Clone)]
pub struct AuditStore {
    dir: PathBuf,
}

impl AuditStore {
    pub fn new(dir: PathBuf) -> std::io::Result<Self> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn create_run(&self, trigger: String, job_ids: Vec<String>) -> Result<AuditRun, AppError> {
        let run = AuditRun {
            run_id: mint_id("run"),
            created_at: Utc::now().to_rfc3339(),
            completed_at: String::new(),
            trigger,
            job_ids,
            entries: Vec::new(),
            total_operations: 0,
            successful_operations: 0,
            failed_operations: 0,
        };
        self.save_run(&run)?;
        info!("Created audit run {}", run.run_id);
        Ok(run)
    }

    pub fn load_run(&self, run_id: &str) -> Result<AuditRun, AppError> {
        // Run ids double as filenames; anything else is a lookup miss, not a
        // path to resolve.
        if !is_well_formed_id(run_id) {
            return Err(AppError::NotFound(format!("Run {run_id} not found")));
        }
        let path = self.dir.join(format!("{run_id}.json"));
        if !path.exists() {
            return Err(AppError::NotFound(format!("Run {run_id} not found")));
        }
        let raw = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save_run(&self, run: &AuditRun) -> Result<(), AppError> {
        let path = self.dir.join(format!("{}.json", run.run_id));
        std::fs::write(&path, serde_json::to_string_pretty(run)?)?;
        Ok(())
    }

    /// Appends an entry to an existing run and refreshes the run counters.
    pub fn append_entry(&self, request: LogAuditRequest) -> Result<AuditEntry, AppError> {
        let mut run = self.load_run(&request.run_id)?;

        let prompt_redacted = if request.prompt_redacted.is_empty()
            || looks_redacted(&request.prompt_redacted)
        {
            request.prompt_redacted
        } else {
            redact_pii(&request.prompt_redacted)
        };

        let entry = AuditEntry {
            entry_id: mint_id("entry"),
            run_id: request.run_id,
            operation: request.operation,
            timestamp_start: request.timestamp_start,
            timestamp_end: if request.timestamp_end.is_empty() {
                Utc::now().to_rfc3339()
            } else {
                request.timestamp_end
            },
            prompt_redacted,
            tool_calls: request.tool_calls,
            artifacts: request.artifacts,
            status: request.status,
            error_message: request.error_message,
            metadata: request.metadata,
        };

        run.entries.push(entry.clone());
        run.total_operations = run.entries.len();
        run.successful_operations = run
            .entries
            .iter()
            .filter(|e| e.status == EntryStatus::Success)
            .count();
        run.failed_operations = run
            .entries
            .iter()
            .filter(|e| e.status == EntryStatus::Failed)
            .count();
        if run.completed_at.is_empty() {
            run.completed_at = Utc::now().to_rfc3339();
        }

        self.save_run(&run)?;
        info!("Logged {:?} entry {} to run {}", entry.operation, entry.entry_id, entry.run_id);
        Ok(entry)
    }

    /// Lists run summaries, newest first. Unreadable files are skipped with
    /// a warning rather than failing the listing.
    pub fn list_runs(&self) -> Result<Vec<RunSummary>, AppError> {
        let mut names: Vec<String> = Vec::new();
        for dir_entry in std::fs::read_dir(&self.dir)? {
            let name = dir_entry?.file_name().to_string_lossy().into_owned();
            if name.starts_with("run_") && name.ends_with(".json") {
                names.push(name);
            }
        }
        names.sort();
        names.reverse();

        let mut summaries = Vec::with_capacity(names.len());
        for name in names {
            let path = self.dir.join(&name);
            let run: AuditRun = match std::fs::read_to_string(&path)
                .map_err(AppError::from)
                .and_then(|raw| serde_json::from_str(&raw).map_err(AppError::from))
            {
                Ok(run) => run,
                Err(err) => {
                    warn!("Failed to load {}: {err}", path.display());
                    continue;
                }
            };
            summaries.push(RunSummary {
                run_id: run.run_id,
                created_at: run.created_at,
                trigger: run.trigger,
                total_operations: run.total_operations,
                successful_operations: run.successful_operations,
                failed_operations: run.failed_operations,
                job_ids: run.job_ids,
            });
        }
        Ok(summaries)
    }
}

/// `<prefix>_<UTC yyyymmddThhmmssZ>_<8 hex chars>`
fn mint_id(prefix: &str) -> String {
    let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
    let nonce = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{stamp}_{}", &nonce[..8])
}

fn is_well_formed_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// SHA-256 hex digest of a file's contents; empty string when the file is
/// missing or unreadable (matches the hash recorded for a vanished artifact).
pub fn sha256_file_hex(path: &std::path::Path) -> String {
    match std::fs::read(path) {
        Ok(bytes) => {
            let mut hasher = Sha256::new();
            hasher.update(&bytes);
            format!("{:x}", hasher.finalize())
        }
        Err(err) => {
            warn!("Could not hash {}: {err}", path.display());
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::models::{EntryStatus, OperationType};
    use serde_json::Map;

    fn store() -> (tempfile::TempDir, AuditStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AuditStore::new(dir.path().join("audit")).unwrap();
        (dir, store)
    }

    fn log_request(run_id: &str, status: EntryStatus) -> LogAuditRequest {
        LogAuditRequest {
            run_id: run_id.to_string(),
            operation: OperationType::Validate,
            timestamp_start: "2026-08-07T12:00:00Z".to_string(),
            timestamp_end: String::new(),
            prompt_redacted: String::new(),
            tool_calls: Vec::new(),
            artifacts: Vec::new(),
            status,
            error_message: String::new(),
            metadata: Map::new(),
        }
    }

    #[test]
    fn test_create_and_load_round_trip() {
        let (_dir, store) = store();
        let run = store
            .create_run("USER".to_string(), vec!["job-1".to_string()])
            .unwrap();
        assert!(run.run_id.starts_with("run_"));

        let loaded = store.load_run(&run.run_id).unwrap();
        assert_eq!(loaded.trigger, "USER");
        assert_eq!(loaded.job_ids, vec!["job-1".to_string()]);
        assert_eq!(loaded.total_operations, 0);
    }

    #[test]
    fn test_unknown_run_is_not_found() {
        let (_dir, store) = store();
        let err = store.load_run("run_20260807T000000Z_deadbeef").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_hostile_run_id_is_not_found() {
        let (_dir, store) = store();
        assert!(matches!(
            store.load_run("../../etc/passwd").unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn test_append_updates_counters() {
        let (_dir, store) = store();
        let run = store.create_run("API".to_string(), Vec::new()).unwrap();

        store
            .append_entry(log_request(&run.run_id, EntryStatus::Success))
            .unwrap();
        store
            .append_entry(log_request(&run.run_id, EntryStatus::Failed))
            .unwrap();
        store
            .append_entry(log_request(&run.run_id, EntryStatus::Partial))
            .unwrap();

        let loaded = store.load_run(&run.run_id).unwrap();
        assert_eq!(loaded.total_operations, 3);
        assert_eq!(loaded.successful_operations, 1);
        assert_eq!(loaded.failed_operations, 1);
        assert!(!loaded.completed_at.is_empty());
    }

    #[test]
    fn test_append_redacts_unredacted_prompt() {
        let (_dir, store) = store();
        let run = store.create_run("API".to_string(), Vec::new()).unwrap();

        let mut request = log_request(&run.run_id, EntryStatus::Success);
        request.prompt_redacted = "email jane@example.com please".to_string();
        let entry = store.append_entry(request).unwrap();
        assert_eq!(entry.prompt_redacted, "email [EMAIL] please");

        // Already-redacted prompts pass through untouched.
        let mut request = log_request(&run.run_id, EntryStatus::Success);
        request.prompt_redacted = "email [EMAIL] please".to_string();
        let entry = store.append_entry(request).unwrap();
        assert_eq!(entry.prompt_redacted, "email [EMAIL] please");
    }

    #[test]
    fn test_append_to_unknown_run_fails() {
        let (_dir, store) = store();
        let err = store
            .append_entry(log_request("run_20260807T000000Z_deadbeef", EntryStatus::Success))
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_list_runs_skips_corrupt_files() {
        let (dir, store) = store();
        store.create_run("USER".to_string(), Vec::new()).unwrap();
        store.create_run("API".to_string(), Vec::new()).unwrap();
        std::fs::write(
            dir.path().join("audit").join("run_corrupt.json"),
            "{broken",
        )
        .unwrap();

        let summaries = store.list_runs().unwrap();
        assert_eq!(summaries.len(), 2);
    }

    #[test]
    fn test_sha256_of_missing_file_is_empty() {
        assert_eq!(sha256_file_hex(std::path::Path::new("/nonexistent")), "");
    }

    #[test]
    fn test_sha256_known_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact.html");
        std::fs::write(&path, "abc").unwrap();
        assert_eq!(
            sha256_file_hex(&path),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
