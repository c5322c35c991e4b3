//! Output rendering for lint reports.
//!
//! Supports `human` (default) and `json` outputs. Human output lists errors,
//! then warnings, then one summary line; the JSON form carries the same
//! findings plus a top-level summary.

use crate::config::OutputMode;
use crate::error::AppmetaError;
use crate::models::{Finding, Report};
use crate::utils;
use serde_json::json;
use serde_json::Value as JsonVal;

/// Print a lint report in the requested format.
pub fn print_lint(report: &Report, output: OutputMode) {
    match output {
        OutputMode::Json => println!("{}", compose_lint_json(report)),
        OutputMode::Human => {
            let color = utils::use_colors(false);
            print!("{}", render_human(report, color));
        }
    }
}

/// Print a fatal error that stopped the run before any report existed.
pub fn print_fatal(err: &AppmetaError, output: OutputMode) {
    match output {
        OutputMode::Json => println!("{}", compose_fatal_json(err)),
        OutputMode::Human => {
            let color = utils::use_colors(false);
            println!("{} {}", utils::error_prefix(color), err);
        }
    }
}

/// Human report: one line per error, one per warning, then the summary.
pub fn render_human(report: &Report, color: bool) -> String {
    let mut out = String::new();
    for f in report.errors.iter().chain(report.warnings.iter()) {
        out.push_str(&render_finding(f, color));
        out.push('\n');
    }
    out.push_str(&summary_line(report));
    out.push('\n');
    out
}

fn render_finding(f: &Finding, color: bool) -> String {
    format!(
        "{} {}: {}",
        utils::severity_prefix(f.severity, color),
        f.app,
        f.message
    )
}

pub fn summary_line(report: &Report) -> String {
    let s = report.summary();
    format!(
        "Validation complete: {} errors, {} warnings.",
        s.errors, s.warnings
    )
}

/// Compose lint JSON object (pure) for testing/snapshot purposes.
pub fn compose_lint_json(report: &Report) -> JsonVal {
    json!({
        "errors": report.errors,
        "warnings": report.warnings,
        "summary": report.summary(),
    })
}

pub fn compose_fatal_json(err: &AppmetaError) -> JsonVal {
    json!({
        "fatal": err.to_string(),
        "exitCode": err.exit_code(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> Report {
        let mut r = Report::default();
        r.apps = 2;
        r.push(Finding::warning("Bar", "name-mismatch", "name 'bar' differs from directory name"));
        r.push(Finding::error("Bar", "kustomize-path", "kustomize app requires 'path'"));
        r.push(Finding::warning("empty", "missing-app-yaml", "missing app.yaml (skipped)"));
        r
    }

    #[test]
    fn test_render_human_errors_then_warnings() {
        let text = render_human(&sample(), false);
        assert_eq!(
            text,
            "ERROR: Bar: kustomize app requires 'path'\n\
             WARN: Bar: name 'bar' differs from directory name\n\
             WARN: empty: missing app.yaml (skipped)\n\
             Validation complete: 1 errors, 2 warnings.\n"
        );
    }

    #[test]
    fn test_render_human_empty_report() {
        assert_eq!(
            render_human(&Report::default(), false),
            "Validation complete: 0 errors, 0 warnings.\n"
        );
    }

    #[test]
    fn test_compose_lint_json_shape() {
        let out = compose_lint_json(&sample());
        assert_eq!(out["summary"]["errors"], 1);
        assert_eq!(out["summary"]["warnings"], 2);
        assert_eq!(out["summary"]["apps"], 2);
        assert_eq!(out["errors"][0]["app"], "Bar");
        assert_eq!(out["errors"][0]["severity"], "error");
        assert_eq!(out["errors"][0]["rule"], "kustomize-path");
        assert_eq!(out["warnings"][1]["severity"], "warning");
    }

    #[test]
    fn test_compose_fatal_json() {
        let err = AppmetaError::AppsDirMissing {
            path: PathBuf::from("/r/apps"),
        };
        let out = compose_fatal_json(&err);
        assert_eq!(out["fatal"], "apps/ directory not found at /r/apps");
        assert_eq!(out["exitCode"], 2);
    }
}
