//! Small shared helpers: colored line prefixes and logging setup.

use crate::models::Severity;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

/// Colors are used for human output on a terminal unless `NO_COLOR` is set.
pub fn use_colors(json: bool) -> bool {
    !json && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// `ERROR:` / `WARN:` prefix, optionally colored.
pub fn severity_prefix(sev: Severity, color: bool) -> String {
    let label = sev.label();
    if !color {
        return label.to_string();
    }
    match sev {
        Severity::Error => label.red().bold().to_string(),
        Severity::Warning => label.yellow().bold().to_string(),
    }
}

pub fn error_prefix(color: bool) -> String {
    severity_prefix(Severity::Error, color)
}

/// Install the stderr tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` picks warn/info/debug.
pub fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_prefixes() {
        assert_eq!(severity_prefix(Severity::Error, false), "ERROR:");
        assert_eq!(severity_prefix(Severity::Warning, false), "WARN:");
        assert_eq!(error_prefix(false), "ERROR:");
    }

    #[test]
    fn test_colored_prefix_keeps_label() {
        let p = severity_prefix(Severity::Warning, true);
        assert!(p.contains("WARN:"));
        assert_ne!(p, "WARN:");
    }

    #[test]
    fn test_json_never_colored() {
        assert!(!use_colors(true));
    }
}
