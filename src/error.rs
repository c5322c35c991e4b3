//! Error types for fatal run failures and per-file metadata loading.
//!
//! Only `AppmetaError` aborts a run. `YamlLoadError` is caught per entry and
//! turned into a recorded finding by the lint runner.

use std::path::PathBuf;

/// Conditions that stop validation before or during the directory scan.
#[derive(Debug, thiserror::Error)]
pub enum AppmetaError {
    #[error("apps/ directory not found at {}", .path.display())]
    AppsDirMissing { path: PathBuf },

    #[error("failed to list {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AppmetaError {
    /// Process exit status for a fatal error. Distinct from the
    /// "findings contain errors" status.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Why a single `app.yaml` could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum YamlLoadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Syntax(#[from] serde_yaml::Error),

    #[error("top-level value must be a mapping, found {0}")]
    NotAMapping(&'static str),
}
