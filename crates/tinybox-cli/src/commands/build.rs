//! `tbx build` — stub collaborator for image building.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

/// Arguments for the `build` command.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Tag for the resulting image.
    #[arg(long)]
    pub tag: String,

    /// Path to the build file.
    #[arg(long)]
    pub path: PathBuf,
}

/// Executes the `build` command.
///
/// # Errors
///
/// Always: building is out of scope for this runtime. Any tool that
/// produces `<images>/<tag>/<tag>.tar.gz` plus a `<tag>-cmd` sidecar
/// yields an image `tbx run` can consume.
pub fn execute(args: &BuildArgs) -> anyhow::Result<ExitCode> {
    anyhow::bail!(
        "`build` is not implemented; create {}/{}.tar.gz (plus a {}-cmd sidecar) \
         with any archiving tool and `tbx run {}` will consume it",
        args.tag,
        args.tag,
        args.tag,
        args.tag
    )
}
