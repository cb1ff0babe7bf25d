//! `tbx pull` — fetch an image archive via the external pull script.
//!
//! The runtime does not implement fetching; it delegates to a script
//! that must leave `<images>/<image>/<image>.tar.gz` behind.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use tinybox_common::types::ImageName;

/// Arguments for the `pull` command.
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Image to fetch.
    pub image: String,

    /// Fetch script to delegate to (defaults to `$TINYBOX_HOME/pull.sh`).
    #[arg(long)]
    pub script: Option<PathBuf>,
}

/// Executes the `pull` command.
///
/// # Errors
///
/// Returns an error if the script is missing, cannot be started, or
/// exits nonzero.
pub fn execute(args: PullArgs) -> anyhow::Result<ExitCode> {
    let script = args
        .script
        .unwrap_or_else(tinybox_common::constants::default_pull_script);
    tinybox_image::pull::pull_image(&ImageName::new(&args.image), &script)?;
    Ok(ExitCode::SUCCESS)
}
