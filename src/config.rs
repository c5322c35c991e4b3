//! Configuration discovery and effective settings resolution.
//!
//! appmeta reads `appmeta.toml|yaml|yml` from the repository root and merges
//! it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - repository root: current working directory
//! - `apps_dir`: `apps`
//! - `output`: `human`
//!
//! Overrides precedence: CLI > config file > defaults.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_APPS_DIR: &str = "apps";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Report rendering mode.
pub enum OutputMode {
    #[default]
    Human,
    Json,
}

impl OutputMode {
    /// `json` selects JSON; anything else falls back to human output.
    pub fn from_name(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("json") {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
/// Root configuration loaded from `appmeta.toml|yaml`.
pub struct AppmetaConfig {
    #[serde(default, alias = "appsDir")]
    pub apps_dir: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub apps_dir: PathBuf,
    pub output: OutputMode,
}

/// Load `AppmetaConfig` from `appmeta.toml` or `appmeta.yaml|yml` if present.
///
/// A file that cannot be read or parsed is reported and ignored.
pub fn load_config(root: &Path) -> Option<AppmetaConfig> {
    let toml_path = root.join("appmeta.toml");
    if toml_path.exists() {
        let s = read_config(&toml_path)?;
        return match toml::from_str::<AppmetaConfig>(&s) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                warn!(file = %toml_path.display(), error = %e, "ignoring invalid config");
                None
            }
        };
    }
    for yml in ["appmeta.yaml", "appmeta.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = read_config(&p)?;
            return match serde_yaml::from_str::<AppmetaConfig>(&s) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    warn!(file = %p.display(), error = %e, "ignoring invalid config");
                    None
                }
            };
        }
    }
    None
}

fn read_config(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!(file = %path.display(), error = %e, "ignoring unreadable config");
            None
        }
    }
}

/// Absolute repository root: `cli_root` (relative to the working directory)
/// or the working directory itself.
pub fn resolve_repo_root(cli_root: Option<&str>) -> PathBuf {
    let cwd = std::env::current_dir().ok();
    let root = match (cli_root, cwd) {
        (None, Some(cwd)) => cwd,
        (None, None) => PathBuf::from("."),
        (Some(r), Some(cwd)) => cwd.join(r),
        (Some(r), None) => PathBuf::from(r),
    };
    // drop interior `.` components so messages show clean paths
    root.components().collect()
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_apps_dir: Option<&str>,
    cli_output: Option<&str>,
) -> Effective {
    let repo_root = resolve_repo_root(cli_repo_root);
    let cfg = load_config(&repo_root).unwrap_or_default();

    let apps_dir = cli_apps_dir
        .map(|s| s.to_string())
        .or(cfg.apps_dir)
        .unwrap_or_else(|| DEFAULT_APPS_DIR.to_string());

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .map(|s| OutputMode::from_name(&s))
        .unwrap_or_default();

    Effective {
        repo_root,
        apps_dir: PathBuf::from(apps_dir),
        output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_config() {
        let dir = tempdir().unwrap();
        let eff = resolve_effective(dir.path().to_str(), None, None);
        assert_eq!(eff.repo_root, dir.path());
        assert_eq!(eff.apps_dir, PathBuf::from("apps"));
        assert_eq!(eff.output, OutputMode::Human);
    }

    #[test]
    fn test_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("appmeta.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
apps_dir = "deploy/apps"
output = "json"
    "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None);
        assert_eq!(eff.apps_dir, PathBuf::from("deploy/apps"));
        assert_eq!(eff.output, OutputMode::Json);
    }

    #[test]
    fn test_load_yaml_with_camel_case_alias() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("appmeta.yml"), "appsDir: clusters/apps\n").unwrap();
        let cfg = load_config(root).unwrap();
        assert_eq!(cfg.apps_dir.as_deref(), Some("clusters/apps"));
        assert_eq!(cfg.output, None);
    }

    #[test]
    fn test_cli_overrides_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("appmeta.toml"), "apps_dir = \"x\"\noutput = \"json\"\n").unwrap();
        let eff = resolve_effective(root.to_str(), Some("y"), Some("human"));
        assert_eq!(eff.apps_dir, PathBuf::from("y"));
        assert_eq!(eff.output, OutputMode::Human);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("appmeta.toml"), "apps_dir = [not toml").unwrap();
        assert!(load_config(root).is_none());
        let eff = resolve_effective(root.to_str(), None, None);
        assert_eq!(eff.apps_dir, PathBuf::from("apps"));
    }

    #[test]
    fn test_output_mode_names() {
        assert_eq!(OutputMode::from_name("json"), OutputMode::Json);
        assert_eq!(OutputMode::from_name("JSON"), OutputMode::Json);
        assert_eq!(OutputMode::from_name("human"), OutputMode::Human);
        assert_eq!(OutputMode::from_name("xml"), OutputMode::Human);
    }

    #[test]
    fn test_repo_root_drops_cur_dir_components() {
        let dir = tempdir().unwrap();
        let with_dot = dir.path().join(".");
        let root = resolve_repo_root(with_dot.to_str());
        assert_eq!(root, dir.path());
    }
}
