//! appmeta CLI binary entry point.
//! Resolves configuration, runs the validator, and maps the outcome to an
//! exit status.

use appmeta::cli::{Cli, Commands};
use appmeta::{config, lint, output, utils};
use clap::Parser;

fn main() {
    let cli = Cli::parse();
    utils::init_logging(cli.verbose);
    let code = match cli.cmd.unwrap_or_else(Commands::default_lint) {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            0
        }
        Commands::Lint {
            repo_root,
            apps_dir,
            output,
        } => {
            let eff = config::resolve_effective(
                repo_root.as_deref(),
                apps_dir.as_deref(),
                output.as_deref(),
            );
            match lint::run_lint(&eff.repo_root, &eff.apps_dir) {
                Ok(report) => {
                    output::print_lint(&report, eff.output);
                    report.exit_code()
                }
                Err(e) => {
                    output::print_fatal(&e, eff.output);
                    e.exit_code()
                }
            }
        }
    };
    std::process::exit(code);
}
