//! Process supervision: launch the target command, forward standard
//! streams, and translate its termination into a [`RunStatus`].
//!
//! A nonzero exit is the command's own result and is never treated as a
//! runtime error; launch-level OS failures are classified into typed,
//! actionable errors instead of raw errno strings.

use std::path::Path;
use std::process::{Command, ExitStatus};

use tinybox_common::error::{Result, TinyboxError};
use tinybox_common::types::RunStatus;

/// Environment marker exported to every supervised command.
#[must_use]
pub fn container_env() -> Vec<(String, String)> {
    vec![(
        tinybox_common::constants::CONTAINER_ENV_MARKER.to_owned(),
        "true".to_owned(),
    )]
}

/// Runs `command` with inherited standard streams and waits for it.
///
/// `env` entries are added on top of the inherited environment; `cwd`
/// overrides the working directory when given.
///
/// # Errors
///
/// - [`TinyboxError::Input`] if the command line is empty.
/// - [`TinyboxError::CommandNotFound`] if the executable does not exist.
/// - [`TinyboxError::Execution`] for launch-level OS failures, including
///   foreign-architecture binaries (`ENOEXEC`).
pub fn supervise(
    command: &[String],
    env: &[(String, String)],
    cwd: Option<&Path>,
) -> Result<RunStatus> {
    let (program, args) = command.split_first().ok_or_else(|| TinyboxError::Input {
        message: "empty command line".to_owned(),
    })?;

    let mut cmd = Command::new(program);
    let _ = cmd.args(args);
    for (key, value) in env {
        let _ = cmd.env(key, value);
    }
    if let Some(dir) = cwd {
        let _ = cmd.current_dir(dir);
    }

    tracing::info!(command = %command.join(" "), "supervising command");

    match cmd.status() {
        Ok(status) => {
            let run_status = status_of(status);
            tracing::info!(status = %run_status, "command finished");
            Ok(run_status)
        }
        Err(e) => Err(classify_launch_error(program, &e)),
    }
}

/// Maps an [`ExitStatus`] into the runtime's [`RunStatus`].
#[must_use]
pub fn status_of(status: ExitStatus) -> RunStatus {
    use std::os::unix::process::ExitStatusExt;

    status.code().map_or_else(
        || RunStatus::Signaled(status.signal().unwrap_or(0)),
        RunStatus::Exited,
    )
}

fn classify_launch_error(program: &str, error: &std::io::Error) -> TinyboxError {
    if error.kind() == std::io::ErrorKind::NotFound {
        return TinyboxError::CommandNotFound {
            command: program.to_owned(),
        };
    }
    if error.raw_os_error() == Some(libc::ENOEXEC) {
        return TinyboxError::Execution {
            command: program.to_owned(),
            message: "exec format error: the binary targets a different CPU architecture \
                      than this host; rebuild the image for this platform"
                .to_owned(),
        };
    }
    if error.kind() == std::io::ErrorKind::PermissionDenied {
        return TinyboxError::Execution {
            command: program.to_owned(),
            message: "permission denied: the file is not marked executable".to_owned(),
        };
    }
    TinyboxError::Execution {
        command: program.to_owned(),
        message: error.to_string(),
    }
}
