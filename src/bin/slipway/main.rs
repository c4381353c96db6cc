//! slipway CLI - drives CMake through configure, build and test

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod build;
mod cli;

use cli::{Cli, MessageFormat};
use slipway::util::diagnostic::Diagnostic;
use slipway::util::shell::Shell;
use slipway::util::BuildError;

/// Overrides the log filter, e.g. `SLIPWAY_LOG=slipway=trace`.
const LOG_ENV: &str = "SLIPWAY_LOG";

fn main() {
    // Parse CLI; invalid options exit here, before any process runs
    let cli = Cli::parse();

    // Set up logging
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter(cli.verbose, cli.quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let shell = Shell::from_flags(
        cli.quiet,
        cli.verbose,
        cli.color,
        cli.message_format == MessageFormat::Json,
    );

    if let Err(e) = build::execute(cli, &shell) {
        let code = report(&e, &shell);
        std::process::exit(code);
    }
}

/// Log filter used when `SLIPWAY_LOG` is unset.
fn default_log_filter(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "slipway=debug"
    } else if quiet {
        "slipway=error"
    } else {
        "slipway=info"
    }
}

/// Print a fatal error and pick the exit status.
fn report(err: &anyhow::Error, shell: &Shell) -> i32 {
    match err.downcast_ref::<BuildError>() {
        Some(build_err) => {
            shell.diagnostic(&build_err.to_diagnostic());
            build_err.exit_code()
        }
        None => {
            shell.diagnostic(&Diagnostic::error(format!("{:#}", err)));
            1
        }
    }
}
