//! `tbx __init` — hidden isolated-setup mode.
//!
//! Phase two of the namespace-entry protocol: the parent re-executes this
//! binary with the sentinel subcommand after requesting new namespaces,
//! so everything here already runs inside them. Never invoked by users.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

/// Arguments for the hidden `__init` subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Extraction directory to use as the new root.
    #[arg(long)]
    pub rootfs: PathBuf,

    /// Hostname to set inside the UTS namespace.
    #[arg(long)]
    pub hostname: String,

    /// Command and arguments to supervise, after `--`.
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

/// Executes the isolated setup and supervises the command.
///
/// Errors are reported here and encoded in the exit code so the parent
/// can propagate them without a second channel.
#[allow(clippy::print_stderr, clippy::needless_pass_by_value)]
pub fn execute(args: InitArgs) -> ExitCode {
    let result =
        tinybox_runtime::init::run_isolated_setup(&args.rootfs, &args.hostname, &args.command);
    if let Err(e) = &result {
        eprintln!("Error: {e}");
    }
    super::to_exit_code(tinybox_runtime::init::exit_code_for(&result))
}
