//! CLI command definitions and dispatch.

pub mod build;
pub mod init;
pub mod pull;
pub mod run;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

/// Tinybox — minimal single-shot container runtime.
#[derive(Parser, Debug)]
#[command(name = "tbx", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a command inside an isolated environment built from an image.
    Run(run::RunArgs),
    /// Fetch an image archive via the external pull script.
    Pull(pull::PullArgs),
    /// Build an image archive from a build file (not implemented).
    Build(build::BuildArgs),
    /// Internal: isolated-setup mode for the re-executed child.
    #[command(name = "__init", hide = true)]
    Init(init::InitArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails before an exit code
/// can be determined.
pub fn execute(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.command {
        Command::Run(args) => run::execute(args),
        Command::Pull(args) => pull::execute(args),
        Command::Build(args) => build::execute(&args),
        Command::Init(args) => Ok(init::execute(args)),
    }
}

/// Clamps an `i32` process code into an [`ExitCode`].
#[must_use]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn to_exit_code(code: i32) -> ExitCode {
    ExitCode::from((code & 0xff) as u8)
}
