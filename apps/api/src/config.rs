use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the sandboxed workspace. Every request-supplied path must
    /// resolve inside this directory.
    pub home: PathBuf,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            home: PathBuf::from(require_env("WARDEN_HOME")?),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Canonical profile location inside the workspace.
    pub fn profile_path(&self) -> PathBuf {
        self.home.join("profile").join("canonical_profile.json")
    }

    /// Audit run storage directory.
    pub fn audit_dir(&self) -> PathBuf {
        self.home.join("audit")
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
