//! Linux namespace management for container isolation.
//!
//! Namespace creation is requested with a single `unshare(2)` call: the
//! kernel either grants every requested namespace or fails the call, so
//! there is no partially-isolated state to unwind.

pub mod mount;
pub mod uts;

use tinybox_common::error::{Result, TinyboxError};

/// Which namespaces to request for a run.
#[derive(Debug, Clone, Copy)]
pub struct NamespaceSpec {
    /// Isolate the mount table.
    pub mount: bool,
    /// Isolate the process ID space.
    pub pid: bool,
    /// Isolate hostname and domain name.
    pub uts: bool,
}

impl Default for NamespaceSpec {
    fn default() -> Self {
        Self {
            mount: true,
            pid: true,
            uts: true,
        }
    }
}

impl NamespaceSpec {
    /// Returns a human-readable list of the requested namespaces.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.mount {
            parts.push("mount");
        }
        if self.pid {
            parts.push("pid");
        }
        if self.uts {
            parts.push("uts");
        }
        parts.join("+")
    }

    /// Builds the clone flags for this spec.
    #[cfg(target_os = "linux")]
    #[must_use]
    pub fn clone_flags(&self) -> nix::sched::CloneFlags {
        use nix::sched::CloneFlags;

        let mut flags = CloneFlags::empty();
        if self.mount {
            flags |= CloneFlags::CLONE_NEWNS;
        }
        if self.pid {
            flags |= CloneFlags::CLONE_NEWPID;
        }
        if self.uts {
            flags |= CloneFlags::CLONE_NEWUTS;
        }
        flags
    }
}

/// Requests the configured namespaces for the calling process.
///
/// After `CLONE_NEWPID` the caller itself stays in its original PID
/// namespace; the *next child it forks* becomes PID 1 of the new one.
/// Mount and UTS unsharing take effect immediately.
///
/// # Errors
///
/// Returns [`TinyboxError::Namespace`] if `unshare(2)` fails, typically
/// for lack of privileges.
#[cfg(target_os = "linux")]
pub fn request_namespaces(spec: &NamespaceSpec) -> Result<()> {
    tracing::debug!(namespaces = %spec.describe(), "requesting namespaces");
    nix::sched::unshare(spec.clone_flags()).map_err(|errno| TinyboxError::Namespace {
        flags: spec.describe(),
        source: std::io::Error::from(errno),
    })
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error — namespace isolation requires Linux.
#[cfg(not(target_os = "linux"))]
pub fn request_namespaces(spec: &NamespaceSpec) -> Result<()> {
    Err(TinyboxError::Namespace {
        flags: spec.describe(),
        source: std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "Linux required for namespace isolation",
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_requests_all_three_namespaces() {
        let spec = NamespaceSpec::default();
        assert_eq!(spec.describe(), "mount+pid+uts");
    }

    #[test]
    fn describe_reflects_disabled_namespaces() {
        let spec = NamespaceSpec {
            mount: true,
            pid: false,
            uts: true,
        };
        assert_eq!(spec.describe(), "mount+uts");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn clone_flags_match_spec() {
        use nix::sched::CloneFlags;

        let spec = NamespaceSpec::default();
        let flags = spec.clone_flags();
        assert!(flags.contains(CloneFlags::CLONE_NEWNS));
        assert!(flags.contains(CloneFlags::CLONE_NEWPID));
        assert!(flags.contains(CloneFlags::CLONE_NEWUTS));

        let none = NamespaceSpec {
            mount: false,
            pid: false,
            uts: false,
        };
        assert!(none.clone_flags().is_empty());
    }
}
