//! `tbx run` — run a command inside an isolated environment.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, ValueEnum};
use tinybox_common::config::RuntimeConfig;
use tinybox_common::types::{ImageName, IsolationMode};
use tinybox_image::layout::ImageLayout;
use tinybox_runtime::container::Container;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Image to build the root filesystem from.
    pub image: String,

    /// Command and arguments. Defaults to the image's recorded command
    /// from the `<image>-cmd` sidecar file.
    #[arg(trailing_var_arg = true)]
    pub command: Vec<String>,

    /// Isolation policy for this run.
    #[arg(long, value_enum, default_value_t = IsolationArg::Namespaced)]
    pub isolation: IsolationArg,

    /// Images root directory (defaults to `$TINYBOX_HOME/images`).
    #[arg(long)]
    pub images_dir: Option<PathBuf>,

    /// Hostname assigned inside the container.
    #[arg(long)]
    pub hostname: Option<String>,
}

/// CLI-facing isolation selector.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationArg {
    /// New mount/PID/UTS namespaces plus chroot (requires privileges).
    Namespaced,
    /// Chroot only, with manual root restoration (requires privileges).
    Chroot,
    /// No isolation; direct execution for unprivileged local testing.
    None,
}

impl From<IsolationArg> for IsolationMode {
    fn from(arg: IsolationArg) -> Self {
        match arg {
            IsolationArg::Namespaced => Self::Namespaced,
            IsolationArg::Chroot => Self::Chroot,
            IsolationArg::None => Self::None,
        }
    }
}

/// Executes the `run` command.
///
/// The supervised command's own exit code becomes the process exit code;
/// typed runtime errors map to the shell-convention codes (125/126/127).
///
/// # Errors
///
/// Never returns `Err` for run failures — they are reported and encoded
/// in the exit code so the shell sees the same result it would from the
/// command itself.
#[allow(clippy::print_stderr, clippy::unnecessary_wraps)]
pub fn execute(args: RunArgs) -> anyhow::Result<ExitCode> {
    let mut config = RuntimeConfig::default();
    if let Some(dir) = args.images_dir {
        config.images_dir = dir;
    }
    if let Some(hostname) = args.hostname {
        config.hostname = hostname;
    }
    config.isolation = args.isolation.into();

    let image = ImageName::new(&args.image);
    let layout = ImageLayout::new(config.images_dir.clone());

    let spec = match layout.resolve_spec(&image, &args.command) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("Error: {e}");
            return Ok(super::to_exit_code(e.exit_code()));
        }
    };

    match Container::new(config, spec).run() {
        Ok(status) => {
            if !status.success() {
                eprintln!("Container command {status}");
            }
            Ok(super::to_exit_code(status.exit_code()))
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(super::to_exit_code(e.exit_code()))
        }
    }
}
