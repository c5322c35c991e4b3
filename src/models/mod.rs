//! Shared data models for findings, reports, and application metadata.

pub mod metadata;

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Severity of a finding. Only errors affect the exit status.
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Line prefix used in human output.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "ERROR:",
            Severity::Warning => "WARN:",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single error or warning recorded against one application entry.
pub struct Finding {
    pub app: String,
    pub severity: Severity,
    pub rule: &'static str,
    pub message: String,
}

impl Finding {
    pub fn error(app: &str, rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            app: app.to_string(),
            severity: Severity::Error,
            rule,
            message: message.into(),
        }
    }

    pub fn warning(app: &str, rule: &'static str, message: impl Into<String>) -> Self {
        Self {
            app: app.to_string(),
            severity: Severity::Warning,
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity.label(), self.app, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// Aggregated counts used by printers.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub apps: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Findings of one run, split by severity. Each list keeps insertion order.
pub struct Report {
    pub errors: Vec<Finding>,
    pub warnings: Vec<Finding>,
    #[serde(skip)]
    pub apps: usize,
}

impl Report {
    /// Append a finding to the list matching its severity.
    pub fn push(&mut self, finding: Finding) {
        match finding.severity {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        for f in findings {
            self.push(f);
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn summary(&self) -> Summary {
        Summary {
            errors: self.errors.len(),
            warnings: self.warnings.len(),
            apps: self.apps,
        }
    }

    /// `1` when any error was recorded, else `0`.
    pub fn exit_code(&self) -> i32 {
        if self.has_errors() {
            1
        } else {
            0
        }
    }

    /// Findings recorded for one application, errors first.
    pub fn for_app<'a>(&'a self, app: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .filter(move |f| f.app == app)
    }
}
