//! Root switching via `chroot(2)`.
//!
//! Two policies are supported. Inside a throwaway private mount namespace
//! a plain [`enter_root`] suffices: namespace and mounts vanish when the
//! child exits. Without a private mount namespace the original root must
//! be restored manually — [`RootGuard`] retains a directory descriptor on
//! `/` before the switch and chroots back through it afterwards, since
//! chroot alone does not undo itself.

use std::fs::File;
use std::path::{Path, PathBuf};

use tinybox_common::error::{Result, TinyboxError};

/// Changes the process root to `new_root` and moves into it.
///
/// # Errors
///
/// Returns [`TinyboxError::Chroot`] if `chroot(2)` or the subsequent
/// `chdir("/")` fails. This is fatal for the run.
#[cfg(unix)]
pub fn enter_root(new_root: &Path) -> Result<()> {
    tracing::debug!(new_root = %new_root.display(), "entering new root");
    nix::unistd::chroot(new_root).map_err(|errno| TinyboxError::Chroot {
        path: new_root.to_path_buf(),
        source: std::io::Error::from(errno),
    })?;
    nix::unistd::chdir("/").map_err(|errno| TinyboxError::Chroot {
        path: PathBuf::from("/"),
        source: std::io::Error::from(errno),
    })
}

/// Retained handle to the original root directory, used to escape a
/// chroot performed in a shared mount namespace.
///
/// Restoration is attempted on every exit path: explicitly through
/// [`RootGuard::restore`], or as a last resort in `Drop` if the guard is
/// abandoned mid-failure.
#[derive(Debug)]
pub struct RootGuard {
    fd: File,
    restored: bool,
}

#[cfg(unix)]
impl RootGuard {
    /// Opens a descriptor on the current root. Must be called *before*
    /// chrooting.
    ///
    /// # Errors
    ///
    /// Returns [`TinyboxError::Chroot`] if `/` cannot be opened.
    pub fn open() -> Result<Self> {
        let fd = File::open("/").map_err(|e| TinyboxError::Chroot {
            path: PathBuf::from("/"),
            source: e,
        })?;
        Ok(Self {
            fd,
            restored: false,
        })
    }

    /// Returns to the original root: `fchdir` through the retained
    /// descriptor, then `chroot(".")`.
    ///
    /// # Errors
    ///
    /// Returns [`TinyboxError::RootRestore`]. Unlike other cleanup steps
    /// this failure is escalated — continuing with a corrupted root view
    /// is unsafe for anything running afterwards in this process.
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        nix::unistd::fchdir(&self.fd).map_err(|errno| TinyboxError::RootRestore {
            source: std::io::Error::from(errno),
        })?;
        nix::unistd::chroot(".").map_err(|errno| TinyboxError::RootRestore {
            source: std::io::Error::from(errno),
        })?;
        self.restored = true;
        tracing::debug!("original root restored");
        Ok(())
    }

    /// Whether the original root has been restored.
    #[must_use]
    pub const fn is_restored(&self) -> bool {
        self.restored
    }
}

impl Drop for RootGuard {
    fn drop(&mut self) {
        if !self.restored {
            if let Err(e) = self.restore() {
                tracing::error!(error = %e, "root restoration failed during guard drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_open_and_drop_do_not_panic_unprivileged() {
        // chroot(".") during restore needs privileges, so only the
        // descriptor side is verified here.
        let guard = RootGuard::open().expect("open root descriptor");
        assert!(!guard.is_restored());
        // Dropping the unrestored guard must not panic even when the
        // chroot(".") attempt fails for lack of privileges.
        drop(guard);
    }
}
