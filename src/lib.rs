//! appmeta core library.
//!
//! This crate exposes programmatic APIs for validating the `app.yaml`
//! metadata of every application under a repository's `apps/` directory.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `lint`: Directory scan producing a report of errors and warnings.
//! - `checks`: The rule set applied to one parsed `app.yaml`.
//! - `models`: Findings, reports, and the metadata document model.
//! - `output`: Human/JSON printers.
//! - `error`: Fatal and per-file error types.
//! - `utils`: Supporting helpers.
pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod lint;
pub mod models;
pub mod output;
pub mod utils;

pub use error::AppmetaError;
pub use lint::run_lint;
pub use models::{Finding, Report, Severity};
