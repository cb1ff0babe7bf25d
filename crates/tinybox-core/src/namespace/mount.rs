//! Mount namespace isolation.
//!
//! Gives the container its own mount table, enabling private filesystem
//! views. The namespace itself is requested through
//! [`request_namespaces`](super::request_namespaces); this module handles
//! the propagation change that must follow it.

use std::path::PathBuf;

use tinybox_common::error::Result;

/// Remounts `/` as recursively private in the current mount namespace.
///
/// Required after `unshare(CLONE_NEWNS)` on hosts with shared root
/// propagation (the systemd default): without it, mounts performed inside
/// the new namespace would still propagate back to the host.
///
/// # Errors
///
/// Returns [`TinyboxError::Mount`](tinybox_common::error::TinyboxError::Mount)
/// if the `mount(2)` call fails.
#[cfg(target_os = "linux")]
pub fn make_mounts_private() -> Result<()> {
    use nix::mount::{MsFlags, mount};

    tracing::debug!("making root mount recursively private");
    mount(
        None::<&str>,
        "/",
        None::<&str>,
        MsFlags::MS_REC | MsFlags::MS_PRIVATE,
        None::<&str>,
    )
    .map_err(|errno| tinybox_common::error::TinyboxError::Mount {
        target: PathBuf::from("/"),
        source: std::io::Error::from(errno),
    })
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — mount namespaces require Linux.
#[cfg(not(target_os = "linux"))]
pub fn make_mounts_private() -> Result<()> {
    Err(tinybox_common::error::TinyboxError::Mount {
        target: PathBuf::from("/"),
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "Linux required for mount namespace operations",
        ),
    })
}
