//! Domain primitive types used across the Tinybox workspace.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of a container image, e.g. `alpine` or `busybox:1.36`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageName(String);

impl ImageName {
    /// Creates an image name from a string value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name with every run of non-alphanumeric characters
    /// collapsed into a single `_`, safe for use as a directory prefix.
    ///
    /// Two distinct image names may share a sanitized prefix, so callers
    /// must still append a unique suffix (the extraction directory does
    /// this via `tempfile`).
    #[must_use]
    pub fn sanitized(&self) -> String {
        let mut out = String::with_capacity(self.0.len());
        let mut last_was_sep = false;
        for c in self.0.chars() {
            if c.is_ascii_alphanumeric() {
                out.push(c);
                last_was_sep = false;
            } else if !last_was_sep {
                out.push('_');
                last_was_sep = true;
            }
        }
        out
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a single run, generated per invocation.
///
/// Parameterizes cgroup subdirectory names so that concurrent runs on the
/// same host never collide on the shared `/sys/fs/cgroup` tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Generates a random run ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Creates a run ID from a fixed string (used by tests).
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable input describing one container run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerSpec {
    /// Image the root filesystem is built from.
    pub image: ImageName,
    /// Program plus arguments to execute inside the container.
    pub command: Vec<String>,
    /// Resolved path of the source archive.
    pub archive: PathBuf,
}

/// How strongly the run is isolated from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsolationMode {
    /// New mount, PID, and UTS namespaces plus chroot (throwaway-namespace
    /// policy). Requires privileges; the namespace and its mounts vanish
    /// when the child exits.
    Namespaced,
    /// Chroot without a new mount namespace (shared-namespace policy).
    /// The original root is retained through a descriptor and restored
    /// after the command finishes.
    Chroot,
    /// No isolation at all: the command runs directly inside the
    /// extraction directory with a simulated container environment.
    /// Exists for unprivileged local testing only.
    None,
}

/// Final status of a supervised command.
///
/// A nonzero exit is the command's own deliberate result, propagated
/// as-is; it is never surfaced as a runtime error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// The command exited with the given code.
    Exited(i32),
    /// The command was terminated by the given signal.
    Signaled(i32),
}

impl RunStatus {
    /// Returns the process exit code this status maps to.
    ///
    /// Signal termination follows the shell convention of `128 + signo`.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Exited(code) => code,
            Self::Signaled(signo) => 128 + signo,
        }
    }

    /// Returns `true` if the command exited with code 0.
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(*self, Self::Exited(0))
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Exited(code) => write!(f, "exited with code {code}"),
            Self::Signaled(signo) => write!(f, "terminated by signal {signo}"),
        }
    }
}
