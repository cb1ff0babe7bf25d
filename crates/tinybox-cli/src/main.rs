//! # tbx — Tinybox CLI
//!
//! Minimal single-shot container runtime: run one command in one
//! isolated environment and exit.

mod commands;

use std::process::ExitCode;

use clap::Parser;

use crate::commands::Cli;

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match commands::execute(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            commands::to_exit_code(tinybox_common::constants::EXIT_SETUP_FAILURE)
        }
    }
}
