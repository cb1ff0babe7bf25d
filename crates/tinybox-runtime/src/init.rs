//! Isolated-setup mode: phase two of the namespace-entry protocol.
//!
//! Runs in the re-executed child, already inside the new mount, PID, and
//! UTS namespaces. The mount namespace is a throwaway: root restoration
//! is unnecessary because the namespace and its mounts vanish when this
//! process exits. Setup order is load-bearing — propagation must be cut
//! before anything is mounted, and `/proc` must be mounted before the
//! root switch so it lands inside the new root.

use std::path::{Path, PathBuf};

use tinybox_common::error::Result;
use tinybox_common::types::RunStatus;

/// Prepares the container filesystem and supervises the command.
///
/// Steps: make the inherited mount table private, set the container
/// hostname, mount a private `/proc` under the new root, chroot into it,
/// then run the command. The `/proc` mount is detached afterwards on
/// both the success and failure paths.
///
/// # Errors
///
/// Any setup failure ([`Mount`](tinybox_common::error::TinyboxError::Mount),
/// [`Chroot`](tinybox_common::error::TinyboxError::Chroot), namespace or
/// supervision errors) is returned to the caller, which turns it into
/// this process's exit code.
pub fn run_isolated_setup(rootfs: &Path, hostname: &str, command: &[String]) -> Result<RunStatus> {
    tinybox_core::namespace::mount::make_mounts_private()?;
    tinybox_core::namespace::uts::set_hostname(hostname)?;

    let proc_outside = tinybox_core::filesystem::mount::mount_proc(rootfs)?;

    let mut chrooted = false;
    let result = (|| {
        tinybox_core::filesystem::chroot::enter_root(rootfs)?;
        chrooted = true;
        crate::supervisor::supervise(command, &crate::supervisor::container_env(), None)
    })();

    // Teardown, reverse order. After the chroot the mount is visible at
    // /proc; before it, at its original path under the extraction dir.
    let proc_target = if chrooted {
        PathBuf::from("/proc")
    } else {
        proc_outside
    };
    if let Err(e) = tinybox_core::filesystem::mount::unmount_proc(&proc_target) {
        tracing::warn!(error = %e, "failed to unmount private /proc");
    }

    result
}

/// Translates the setup result into this process's exit code.
///
/// The supervised command's own status passes through unchanged; typed
/// errors map to the shell-convention codes so the parent can propagate
/// them.
#[must_use]
pub fn exit_code_for(result: &Result<RunStatus>) -> i32 {
    match result {
        Ok(status) => status.exit_code(),
        Err(e) => e.exit_code(),
    }
}
