//! Mount utilities for container filesystem setup.
//!
//! A private `/proc` must be mounted under the new root before the
//! supervised command starts, so process-enumerating tools (`ps`, `top`)
//! see the container's PID namespace rather than nothing at all.

use std::path::{Path, PathBuf};

use tinybox_common::error::{Result, TinyboxError};

/// Mounts a fresh procfs at `<rootfs>/proc`, creating the directory if
/// the image does not ship one.
///
/// # Errors
///
/// Returns [`TinyboxError::Mount`] if the directory cannot be created or
/// the `mount(2)` call fails. This is fatal for the run.
#[cfg(target_os = "linux")]
pub fn mount_proc(rootfs: &Path) -> Result<PathBuf> {
    use nix::mount::{MsFlags, mount};

    let target = rootfs.join("proc");
    std::fs::create_dir_all(&target).map_err(|e| TinyboxError::Mount {
        target: target.clone(),
        source: e,
    })?;

    mount(
        Some("proc"),
        &target,
        Some("proc"),
        MsFlags::MS_NOSUID | MsFlags::MS_NODEV | MsFlags::MS_NOEXEC,
        None::<&str>,
    )
    .map_err(|errno| TinyboxError::Mount {
        target: target.clone(),
        source: std::io::Error::from(errno),
    })?;

    tracing::debug!(target = %target.display(), "mounted private /proc");
    Ok(target)
}

/// Unmounts a previously mounted procfs, lazily detaching it.
///
/// # Errors
///
/// Returns [`TinyboxError::Mount`] if `umount2(2)` fails. Callers treat
/// this as a cleanup warning, not a run failure.
#[cfg(target_os = "linux")]
pub fn unmount_proc(target: &Path) -> Result<()> {
    use nix::mount::{MntFlags, umount2};

    umount2(target, MntFlags::MNT_DETACH).map_err(|errno| TinyboxError::Mount {
        target: target.to_path_buf(),
        source: std::io::Error::from(errno),
    })?;
    tracing::debug!(target = %target.display(), "unmounted private /proc");
    Ok(())
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — procfs mounting requires Linux.
#[cfg(not(target_os = "linux"))]
pub fn mount_proc(rootfs: &Path) -> Result<PathBuf> {
    Err(TinyboxError::Mount {
        target: rootfs.join("proc"),
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "Linux required for procfs mounting",
        ),
    })
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — procfs mounting requires Linux.
#[cfg(not(target_os = "linux"))]
pub fn unmount_proc(target: &Path) -> Result<()> {
    Err(TinyboxError::Mount {
        target: target.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "Linux required for procfs mounting",
        ),
    })
}
