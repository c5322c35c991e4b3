//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "appmeta",
    version,
    about = "Validate per-application app.yaml metadata",
    long_about = "appmeta — lint apps/<name>/app.yaml files for required keys, helm/kustomize requirements, referenced paths, and value types.\n\nRunning without a subcommand is the same as `appmeta lint`.\nConfiguration precedence: CLI > appmeta.toml > defaults.",
    after_help = "Examples:\n  appmeta\n  appmeta lint --repo-root ../gitops\n  appmeta lint --apps-dir clusters/prod/apps --output json"
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase log verbosity on stderr (-v info, -vv debug)"
    )]
    pub verbose: u8,
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(
        about = "Show version",
        long_about = "Print the current appmeta version."
    )]
    Version,
    /// Validate app metadata
    #[command(
        about = "Validate app metadata",
        long_about = "Check every apps/<name>/app.yaml. Exits 1 when errors are found and 2 when the apps directory is missing.",
        after_help = "Examples:\n  appmeta lint\n  appmeta lint --output json"
    )]
    Lint {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Apps directory relative to the root (default: apps)")]
        apps_dir: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
}

impl Commands {
    /// The command run when none is given.
    pub fn default_lint() -> Self {
        Commands::Lint {
            repo_root: None,
            apps_dir: None,
            output: None,
        }
    }
}
