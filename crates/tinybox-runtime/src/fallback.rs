//! Unisolated execution for platforms or callers without namespace and
//! chroot privileges.
//!
//! Skips namespaces, mounts, chroot, and cgroups entirely: the command
//! is resolved inside the extraction directory and executed directly with
//! a simulated container environment. This path offers **no isolation
//! guarantee** — the process sees the host filesystem and process table.
//! It exists purely so the tool stays runnable for local testing off the
//! target kernel.

use std::path::{Path, PathBuf};

use tinybox_common::error::{Result, TinyboxError};
use tinybox_common::types::RunStatus;

/// Resolves a command path against the extracted root: absolute paths are
/// re-anchored below `rootfs`, relative ones joined to it.
#[must_use]
pub fn resolve_in_root(rootfs: &Path, program: &str) -> PathBuf {
    let trimmed = program.strip_prefix('/').unwrap_or(program);
    rootfs.join(trimmed)
}

/// Runs the command directly inside the extraction directory.
///
/// The environment carries the `CONTAINER` marker plus `HOME` and `PATH`
/// adjusted to point into the extracted tree, simulating the containerized
/// view as far as plain environment variables can.
///
/// # Errors
///
/// Returns [`TinyboxError::CommandNotFound`] if the resolved path does
/// not exist inside the extracted root, or the supervisor's launch errors
/// (including the actionable architecture-mismatch message).
pub fn run_unisolated(rootfs: &Path, command: &[String]) -> Result<RunStatus> {
    let (program, args) = command.split_first().ok_or_else(|| TinyboxError::Input {
        message: "empty command line".to_owned(),
    })?;

    let resolved = resolve_in_root(rootfs, program);
    if !resolved.exists() {
        return Err(TinyboxError::CommandNotFound {
            command: resolved.display().to_string(),
        });
    }

    tracing::warn!(
        rootfs = %rootfs.display(),
        "running without isolation: no namespace, chroot, or cgroup guarantees"
    );

    let mut env = crate::supervisor::container_env();
    env.push((
        "HOME".to_owned(),
        rootfs.join("home").display().to_string(),
    ));
    let host_path = std::env::var("PATH").unwrap_or_default();
    env.push((
        "PATH".to_owned(),
        format!("{}:{host_path}", rootfs.join("bin").display()),
    ));

    let mut full_command = vec![resolved.display().to_string()];
    full_command.extend(args.iter().cloned());
    crate::supervisor::supervise(&full_command, &env, Some(rootfs))
}
