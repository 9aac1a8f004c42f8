//! docport: document collection transfer CLI

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use docport::cli::{Cli, TerminalPrompter};
use docport::commands;
use docport::error::{exit_code_for, Abort};
use docport::utils::print_error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut prompter = TerminalPrompter::default();
    match commands::run(&cli, &mut prompter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<Abort>() {
                Some(Abort::Cancelled) => print_error("Operation canceled."),
                _ => print_error(&format!("{:#}", err)),
            }
            tracing::debug!(error = ?err, "command failed");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

/// Log to stderr; RUST_LOG wins over -v
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("docport={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
