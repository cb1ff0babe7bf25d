//! Namespace isolation via binary re-execution.
//!
//! Entering new namespaces is a two-phase protocol:
//!
//! 1. **Parent** (this module): request the namespaces with a single
//!    `unshare(2)` call, then re-execute the current binary through
//!    `/proc/self/exe` with a hidden sentinel subcommand. Because the
//!    parent unshared `CLONE_NEWPID`, the spawned child is PID 1 of the
//!    new PID namespace.
//! 2. **Child** ([`crate::init`]): runs the filesystem setup and the
//!    supervised command entirely inside the new namespace context.
//!
//! Re-execution guarantees the isolated code path starts fresh inside the
//! new namespaces instead of mutating a half-isolated in-process state.

use std::path::Path;
use std::process::{Command, Stdio};

use tinybox_common::error::{Result, TinyboxError};
use tinybox_common::types::RunStatus;
use tinybox_core::namespace::NamespaceSpec;

/// Progress of one isolation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolateState {
    /// Nothing requested yet.
    Unstarted,
    /// `unshare(2)` succeeded; the child has not been spawned.
    NamespacesRequested,
    /// The re-executed child is running under the given host PID.
    ChildRunning(u32),
    /// Terminal: the child exited with the given status.
    ChildExited(RunStatus),
}

/// Drives one run through the namespace-entry state machine.
///
/// The parent blocks on the child and propagates a nonzero exit; it never
/// retries.
#[derive(Debug)]
pub struct Isolator {
    namespaces: NamespaceSpec,
    state: IsolateState,
}

impl Isolator {
    /// Creates an isolator in the `Unstarted` state.
    #[must_use]
    pub const fn new(namespaces: NamespaceSpec) -> Self {
        Self {
            namespaces,
            state: IsolateState::Unstarted,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> IsolateState {
        self.state
    }

    /// Requests the namespaces, re-executes the binary into the isolated
    /// child, and waits for it.
    ///
    /// The child's standard streams are connected directly to the
    /// parent's. The returned status is whatever the child's init path
    /// exited with, including the error exit codes it uses for setup
    /// failures inside the namespace.
    ///
    /// # Errors
    ///
    /// Returns [`TinyboxError::Namespace`] if the kernel refuses the
    /// namespace request, or [`TinyboxError::Spawn`] if the re-execution
    /// itself fails.
    pub fn run(
        &mut self,
        rootfs: &Path,
        hostname: &str,
        command: &[String],
    ) -> Result<RunStatus> {
        tinybox_core::namespace::request_namespaces(&self.namespaces)?;
        self.state = IsolateState::NamespacesRequested;

        let mut child = Command::new("/proc/self/exe")
            .arg(tinybox_common::constants::INIT_SENTINEL)
            .arg("--rootfs")
            .arg(rootfs)
            .arg("--hostname")
            .arg(hostname)
            .arg("--")
            .args(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| TinyboxError::Spawn { source: e })?;

        self.state = IsolateState::ChildRunning(child.id());
        tracing::info!(
            pid = child.id(),
            namespaces = %self.namespaces.describe(),
            "isolated child running"
        );

        let status = child
            .wait()
            .map_err(|e| TinyboxError::Spawn { source: e })?;
        let run_status = crate::supervisor::status_of(status);
        self.state = IsolateState::ChildExited(run_status);
        Ok(run_status)
    }
}
