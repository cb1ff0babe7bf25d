//! UTS namespace isolation.
//!
//! Allows the container to have its own hostname without affecting the
//! host. Only meaningful after a new UTS namespace has been requested.

use tinybox_common::error::{Result, TinyboxError};

/// Sets the hostname inside the current UTS namespace.
///
/// # Errors
///
/// Returns an error if `sethostname(2)` fails.
#[cfg(target_os = "linux")]
pub fn set_hostname(hostname: &str) -> Result<()> {
    tracing::debug!(hostname, "setting container hostname");
    nix::unistd::sethostname(hostname).map_err(|errno| TinyboxError::Namespace {
        flags: format!("uts hostname {hostname}"),
        source: std::io::Error::from(errno),
    })
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — UTS namespaces require Linux.
#[cfg(not(target_os = "linux"))]
pub fn set_hostname(hostname: &str) -> Result<()> {
    Err(TinyboxError::Namespace {
        flags: format!("uts hostname {hostname}"),
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "Linux required for UTS namespace operations",
        ),
    })
}
