//! Rule set applied to one parsed `app.yaml`.
//!
//! Each rule appends findings to the output vector; rules never abort each
//! other, so one entry can report several problems in a single run.

use crate::models::metadata::{display_value, AppMetadata, AppType};
use crate::models::Finding;
use regex::Regex;
use serde_yaml::Value;
use std::path::Path;
use std::sync::OnceLock;

/// Keys every application must declare.
pub const REQUIRED_COMMON: &[&str] = &["name"];
/// Keys a helm application must declare, in reporting order.
pub const HELM_REQUIRED: &[&str] = &["repoURL", "chart", "version"];
/// Keys that must hold a boolean-like value when present.
pub const BOOLEAN_KEYS: &[&str] = &["createNamespace", "enabled"];

const DNS_LABEL: &str = r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$";

fn dns_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DNS_LABEL).expect("DNS label pattern is valid"))
}

/// Run every rule against `meta` for the entry named `app`.
///
/// `root` is the directory referenced `path` values are resolved against.
pub fn run_checks(root: &Path, app: &str, meta: &AppMetadata) -> Vec<Finding> {
    let mut out = Vec::new();
    check_required(app, meta, &mut out);
    check_name_matches_dir(app, meta, &mut out);
    match meta.app_type() {
        AppType::Helm => check_helm(root, app, meta, &mut out),
        AppType::Kustomize => check_kustomize(root, app, meta, &mut out),
    }
    check_wave(app, meta, &mut out);
    check_booleans(app, meta, &mut out);
    check_name_format(app, meta, &mut out);
    out
}

fn check_required(app: &str, meta: &AppMetadata, out: &mut Vec<Finding>) {
    for key in REQUIRED_COMMON {
        if !meta.contains(key) {
            out.push(Finding::error(
                app,
                "required-key",
                format!("missing required key '{}'", key),
            ));
        }
    }
}

// Overrides are allowed, so a differing name is only a warning.
fn check_name_matches_dir(app: &str, meta: &AppMetadata, out: &mut Vec<Finding>) {
    if let Some(name) = meta.text("name") {
        if name != app {
            out.push(Finding::warning(
                app,
                "name-mismatch",
                format!("name '{}' differs from directory name", name),
            ));
        }
    }
}

fn check_helm(root: &Path, app: &str, meta: &AppMetadata, out: &mut Vec<Finding>) {
    let missing: Vec<&str> = HELM_REQUIRED
        .iter()
        .copied()
        .filter(|k| !meta.contains(k))
        .collect();
    if !missing.is_empty() {
        out.push(Finding::error(
            app,
            "helm-keys",
            format!("helm app missing keys: {}", missing.join(", ")),
        ));
    }
    // A chart may stand alone; `path` is only checked when given.
    if let Some(path) = meta.text("path") {
        if !root.join(&path).exists() {
            out.push(Finding::error(
                app,
                "path-missing",
                format!("path '{}' does not exist", path),
            ));
        }
    }
}

fn check_kustomize(root: &Path, app: &str, meta: &AppMetadata, out: &mut Vec<Finding>) {
    match meta.text("path") {
        None => out.push(Finding::error(
            app,
            "kustomize-path",
            "kustomize app requires 'path'",
        )),
        Some(path) => {
            if !root.join(&path).is_dir() {
                out.push(Finding::error(
                    app,
                    "path-not-dir",
                    format!("path '{}' not a directory", path),
                ));
            }
        }
    }
}

// Resolved integers pass as-is; anything else is judged on its source text.
fn check_wave(app: &str, meta: &AppMetadata, out: &mut Vec<Finding>) {
    let Some(value) = meta.get("wave") else {
        return;
    };
    if is_integer_value(value) {
        return;
    }
    let written = meta
        .wave_as_written()
        .map(str::to_string)
        .unwrap_or_else(|| display_value(value));
    if !is_integer_literal(written.trim()) {
        out.push(Finding::error(
            app,
            "wave-integer",
            format!("wave '{}' not an integer", written),
        ));
    }
}

fn is_integer_value(v: &Value) -> bool {
    match v {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::Tagged(t) => is_integer_value(&t.value),
        _ => false,
    }
}

fn check_booleans(app: &str, meta: &AppMetadata, out: &mut Vec<Finding>) {
    for key in BOOLEAN_KEYS {
        if let Some(v) = meta.get(key) {
            if !is_booly(v) {
                out.push(Finding::error(
                    app,
                    "boolean",
                    format!("{} must be boolean (true/false)", key),
                ));
            }
        }
    }
}

fn check_name_format(app: &str, meta: &AppMetadata, out: &mut Vec<Finding>) {
    if let Some(name) = meta.text("name") {
        if !is_dns_label(&name) {
            out.push(Finding::warning(
                app,
                "name-format",
                format!("name '{}' not RFC1123 label compliant", name),
            ));
        }
    }
}

/// Native booleans, or the strings `true`/`false` in any letter case.
pub fn is_booly(v: &Value) -> bool {
    match v {
        Value::Bool(_) => true,
        Value::String(s) => s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false"),
        Value::Tagged(t) => is_booly(&t.value),
        _ => false,
    }
}

/// Lowercase alphanumerics and hyphens, alphanumeric at both ends.
pub fn is_dns_label(name: &str) -> bool {
    dns_label_re().is_match(name)
}

/// Decimal integer syntax: optional sign, digits, and single underscores
/// between digits (`-3`, `+12`, `1_000`).
pub fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    if digits.is_empty() {
        return false;
    }
    let mut prev_digit = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => prev_digit = true,
            '_' if prev_digit => prev_digit = false,
            _ => return false,
        }
    }
    prev_digit
}
