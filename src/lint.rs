//! Lint runner over the apps directory.
//!
//! Produces a `Report` with errors and warnings in directory order. Only a
//! missing or unreadable apps root is fatal; every per-entry problem,
//! including an unparsable `app.yaml`, becomes a finding.

use crate::checks::run_checks;
use crate::error::AppmetaError;
use crate::models::metadata::AppMetadata;
use crate::models::{Finding, Report};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Metadata file expected in every application directory.
pub const METADATA_FILE: &str = "app.yaml";

/// Validate every application directory under `repo_root/apps_dir`.
///
/// Referenced `path` values are resolved against `repo_root`.
pub fn run_lint(repo_root: &Path, apps_dir: &Path) -> Result<Report, AppmetaError> {
    let apps_root = repo_root.join(apps_dir);
    if !apps_root.is_dir() {
        return Err(AppmetaError::AppsDirMissing { path: apps_root });
    }

    let mut report = Report::default();
    for (name, dir) in list_app_dirs(&apps_root)? {
        debug!(app = %name, dir = %dir.display(), "checking application");
        report.apps += 1;
        lint_app(repo_root, &name, &dir, &mut report);
    }

    let summary = report.summary();
    info!(
        apps = summary.apps,
        errors = summary.errors,
        warnings = summary.warnings,
        "validation finished"
    );
    Ok(report)
}

/// Immediate subdirectories of `apps_root`, sorted by name, hidden ones
/// excluded.
pub fn list_app_dirs(apps_root: &Path) -> Result<Vec<(String, PathBuf)>, AppmetaError> {
    let read_dir = fs::read_dir(apps_root).map_err(|source| AppmetaError::ReadDir {
        path: apps_root.to_path_buf(),
        source,
    })?;
    let mut dirs = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(dir = %apps_root.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        // follows symlinks, so a linked app directory is still checked
        if !path.is_dir() {
            continue;
        }
        dirs.push((name, path));
    }
    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(dirs)
}

/// Load and check one application directory, appending to `report`.
fn lint_app(repo_root: &Path, name: &str, dir: &Path, report: &mut Report) {
    let meta_path = dir.join(METADATA_FILE);
    if !meta_path.exists() {
        report.push(Finding::warning(
            name,
            "missing-app-yaml",
            format!("missing {} (skipped)", METADATA_FILE),
        ));
        return;
    }
    let meta = match AppMetadata::load(&meta_path) {
        Ok(m) => m,
        Err(e) => {
            debug!(app = %name, error = %e, "metadata did not load");
            report.push(Finding::error(
                name,
                "parse-app-yaml",
                format!("failed to parse {}: {}", METADATA_FILE, e),
            ));
            return;
        }
    };
    debug!(app = %name, kind = meta.app_type().as_str(), "metadata loaded");
    report.extend(run_checks(repo_root, name, &meta));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_app(root: &Path, dir: &str, yaml: Option<&str>) {
        let d = root.join("apps").join(dir);
        fs::create_dir_all(&d).unwrap();
        if let Some(y) = yaml {
            fs::write(d.join(METADATA_FILE), y).unwrap();
        }
    }

    #[test]
    fn test_missing_apps_root_is_fatal() {
        let dir = tempdir().unwrap();
        let err = run_lint(dir.path(), Path::new("apps")).unwrap_err();
        match err {
            AppmetaError::AppsDirMissing { path } => assert_eq!(path, dir.path().join("apps")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_apps_root_that_is_a_file_is_fatal() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("apps"), "").unwrap();
        assert!(matches!(
            run_lint(dir.path(), Path::new("apps")),
            Err(AppmetaError::AppsDirMissing { .. })
        ));
    }

    #[test]
    fn test_listing_sorted_skips_hidden_and_files() {
        let dir = tempdir().unwrap();
        let apps = dir.path().join("apps");
        for d in ["zeta", "alpha", ".hidden", "Beta"] {
            fs::create_dir_all(apps.join(d)).unwrap();
        }
        fs::write(apps.join("README.md"), "# apps").unwrap();
        let names: Vec<String> = list_app_dirs(&apps)
            .unwrap()
            .into_iter()
            .map(|(n, _)| n)
            .collect();
        assert_eq!(names, vec!["Beta", "alpha", "zeta"]);
    }

    #[test]
    fn test_missing_metadata_is_single_warning() {
        let dir = tempdir().unwrap();
        write_app(dir.path(), "empty", None);
        let report = run_lint(dir.path(), Path::new("apps")).unwrap();
        assert!(report.errors.is_empty());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(
            report.warnings[0].to_string(),
            "WARN: empty: missing app.yaml (skipped)"
        );
        assert_eq!(report.apps, 1);
    }

    #[test]
    fn test_parse_failure_does_not_stop_scan() {
        let dir = tempdir().unwrap();
        write_app(dir.path(), "broken", Some("name: [oops\n"));
        write_app(dir.path(), "list", Some("- a\n"));
        write_app(dir.path(), "ok", Some("name: ok\ntype: helm\nrepoURL: r\nchart: c\nversion: v\n"));
        let report = run_lint(dir.path(), Path::new("apps")).unwrap();
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0]
            .to_string()
            .starts_with("ERROR: broken: failed to parse app.yaml: "));
        assert_eq!(
            report.errors[1].to_string(),
            "ERROR: list: failed to parse app.yaml: top-level value must be a mapping, found a sequence"
        );
        assert_eq!(report.for_app("ok").count(), 0);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_paths_resolve_against_repo_root() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("apps/foo/base")).unwrap();
        write_app(dir.path(), "foo", Some("name: foo\npath: apps/foo/base\n"));
        let report = run_lint(dir.path(), Path::new("apps")).unwrap();
        assert_eq!(report, Report { apps: 1, ..Report::default() });
    }

    #[test]
    fn test_custom_apps_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("deploy/apps/one")).unwrap();
        let report = run_lint(dir.path(), Path::new("deploy/apps")).unwrap();
        assert_eq!(report.warnings.len(), 1);
    }
}
