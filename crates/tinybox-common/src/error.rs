//! Unified error types for the Tinybox workspace.
//!
//! Variants follow the runtime's failure taxonomy: input errors (nothing
//! created yet), setup errors (partial state exists, teardown required),
//! and command execution errors. A supervised command exiting nonzero is
//! *not* an error — it is reported through
//! [`RunStatus`](crate::types::RunStatus).

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum TinyboxError {
    /// Bad arguments or missing input files; nothing was created yet.
    #[error("invalid input: {message}")]
    Input {
        /// Description of the invalid input.
        message: String,
    },

    /// The image archive does not exist at the resolved path.
    #[error("image archive not found: {path} (try `tbx pull` first)")]
    ArchiveNotFound {
        /// Path where the archive was expected.
        path: PathBuf,
    },

    /// The image archive exists but could not be opened.
    #[error("failed to open image archive {path}: {source}")]
    ArchiveOpen {
        /// Path of the unreadable archive.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Unpacking the archive failed (corrupt data or unsupported format).
    #[error("failed to extract image archive into {dest}: {source}")]
    Extraction {
        /// Extraction destination directory.
        dest: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Extraction exceeded its bounded duration.
    #[error("archive extraction did not finish within {seconds}s")]
    ExtractionTimeout {
        /// Configured timeout in seconds.
        seconds: u64,
    },

    /// Writing a cgroup limit or membership file failed.
    ///
    /// Partial limiting is unsafe, so this aborts the run before any
    /// child process is spawned.
    #[error("failed to apply {controller} limit at {path}: {source}")]
    ResourceLimit {
        /// Cgroup controller name (`pids`, `memory`, `cpu`).
        controller: &'static str,
        /// Control file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Requesting new namespaces from the kernel failed.
    #[error("failed to create namespaces ({flags}): {source}")]
    Namespace {
        /// Human-readable description of the requested namespace flags.
        flags: String,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// A mount or unmount operation failed.
    #[error("mount operation failed at {target}: {source}")]
    Mount {
        /// Mount target path.
        target: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// Changing the process root failed.
    #[error("failed to chroot into {path}: {source}")]
    Chroot {
        /// Attempted new root directory.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// Restoring the original root after a shared-namespace run failed.
    ///
    /// This is the one cleanup failure that escalates: the process would
    /// otherwise keep running with a corrupted view of the filesystem.
    #[error("failed to restore the original root directory: {source}")]
    RootRestore {
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// Re-executing the current binary into the isolated child failed.
    #[error("failed to spawn isolated child process: {source}")]
    Spawn {
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// The target executable does not exist inside the container root.
    #[error("command not found in container: {command}")]
    CommandNotFound {
        /// Command path as resolved inside the new root.
        command: String,
    },

    /// Launching the target command failed at the OS level.
    #[error("failed to execute {command}: {message}")]
    Execution {
        /// Command that failed to launch.
        command: String,
        /// Actionable description of the failure.
        message: String,
    },

    /// An I/O operation failed outside the more specific cases above.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl TinyboxError {
    /// Returns the process exit code this error maps to.
    ///
    /// Follows shell conventions: 127 for a missing command, 126 for a
    /// command that could not be launched, and a generic setup-failure
    /// code for everything else.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::CommandNotFound { .. } => crate::constants::EXIT_COMMAND_NOT_FOUND,
            Self::Execution { .. } => crate::constants::EXIT_EXEC_FAILURE,
            _ => crate::constants::EXIT_SETUP_FAILURE,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, TinyboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_not_found_hints_at_pull() {
        let err = TinyboxError::ArchiveNotFound {
            path: PathBuf::from("/images/alpine/alpine.tar.gz"),
        };
        let msg = err.to_string();
        assert!(msg.contains("alpine.tar.gz"));
        assert!(msg.contains("tbx pull"));
    }

    #[test]
    fn exit_codes_follow_shell_conventions() {
        let not_found = TinyboxError::CommandNotFound {
            command: "/bin/missing".into(),
        };
        assert_eq!(not_found.exit_code(), 127);

        let exec = TinyboxError::Execution {
            command: "/bin/app".into(),
            message: "exec format error".into(),
        };
        assert_eq!(exec.exit_code(), 126);

        let setup = TinyboxError::ExtractionTimeout { seconds: 300 };
        assert_eq!(setup.exit_code(), 125);
    }
}
