//! The run-to-completion container operation.
//!
//! A [`Container`] owns one run: extract the image, apply resource limits
//! to the supervising process, enter isolation, supervise the command,
//! and tear everything down in strict reverse order on every exit path.
//! The extraction directory and the cgroups created for a run never
//! outlive its teardown — that is the central resource-safety invariant
//! of the whole runtime.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tinybox_common::config::RuntimeConfig;
use tinybox_common::error::Result;
use tinybox_common::types::{ContainerSpec, IsolationMode, RunId, RunStatus};
use tinybox_core::cgroup::LimitSet;

/// A single-shot container run.
#[derive(Debug)]
pub struct Container {
    config: RuntimeConfig,
    spec: ContainerSpec,
}

/// Mutable state owned for the duration of one run.
#[derive(Debug)]
struct Instance {
    workdir: Option<TempDir>,
    rootfs: PathBuf,
    limits: Option<LimitSet>,
}

impl Instance {
    fn create(spec: &ContainerSpec) -> Result<Self> {
        let workdir = tinybox_image::workdir::create_workdir(&spec.image)?;
        let rootfs = workdir.path().to_path_buf();
        Ok(Self {
            workdir: Some(workdir),
            rootfs,
            limits: None,
        })
    }

    /// Releases everything the run created, in reverse setup order.
    /// Failures are logged as warnings, never escalated — a failed
    /// cleanup must not mask the primary run result.
    fn teardown(&mut self) {
        if let Some(mut limits) = self.limits.take() {
            limits.remove();
        }
        if let Some(workdir) = self.workdir.take() {
            let path = workdir.path().to_path_buf();
            if let Err(e) = workdir.close() {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove extraction directory");
            } else {
                tracing::debug!(path = %path.display(), "extraction directory removed");
            }
        }
    }
}

impl Container {
    /// Creates a container from its immutable spec and runtime config.
    #[must_use]
    pub const fn new(config: RuntimeConfig, spec: ContainerSpec) -> Self {
        Self { config, spec }
    }

    /// Runs the container to completion and returns the command's status.
    ///
    /// Teardown executes unconditionally before this returns, whether the
    /// run succeeded or failed.
    ///
    /// # Errors
    ///
    /// Setup errors (extraction, limits, namespaces, mounts, chroot) and
    /// launch-level command errors. The command's own nonzero exit is not
    /// an error; it comes back as [`RunStatus`].
    pub fn run(&self) -> Result<RunStatus> {
        // Input stage: nothing has been created yet, so a missing archive
        // needs no cleanup.
        if !self.spec.archive.exists() {
            return Err(tinybox_common::error::TinyboxError::ArchiveNotFound {
                path: self.spec.archive.clone(),
            });
        }

        let run_id = RunId::generate();
        tracing::info!(
            image = %self.spec.image,
            run_id = %run_id,
            command = %self.spec.command.join(" "),
            "starting container run"
        );

        let mut instance = Instance::create(&self.spec)?;
        let result = self.run_stages(&run_id, &mut instance);
        instance.teardown();

        match &result {
            Ok(status) => tracing::info!(run_id = %run_id, status = %status, "run finished"),
            Err(e) => tracing::error!(run_id = %run_id, error = %e, "run failed"),
        }
        result
    }

    fn run_stages(&self, run_id: &RunId, instance: &mut Instance) -> Result<RunStatus> {
        tinybox_image::extract::extract_archive(
            &self.spec.archive,
            &instance.rootfs,
            self.config.extract_timeout(),
        )?;

        let mode = effective_isolation(self.config.isolation);
        if requires_limits(mode) {
            self.apply_limits(run_id, instance)?;
        }

        match mode {
            IsolationMode::None => {
                crate::fallback::run_unisolated(&instance.rootfs, &self.spec.command)
            }
            IsolationMode::Chroot => self.run_shared_root(&instance.rootfs),
            IsolationMode::Namespaced => self.run_namespaced(&instance.rootfs),
        }
    }

    /// Limits the supervising process before any child is spawned, for
    /// every policy that actually isolates.
    ///
    /// The set is recorded on the instance *before* the writes happen, so
    /// teardown prunes whatever a mid-table failure managed to create.
    fn apply_limits(&self, run_id: &RunId, instance: &mut Instance) -> Result<()> {
        let limits = instance
            .limits
            .insert(LimitSet::new(run_id.clone(), &self.config.limits));
        limits.apply(std::process::id())
    }

    /// Throwaway-namespace policy: the two-phase re-execution into fresh
    /// mount/PID/UTS namespaces.
    fn run_namespaced(&self, rootfs: &Path) -> Result<RunStatus> {
        let mut isolator =
            crate::isolate::Isolator::new(tinybox_core::namespace::NamespaceSpec::default());
        isolator.run(rootfs, &self.config.hostname, &self.spec.command)
    }

    /// Shared-namespace policy: chroot without a private mount namespace.
    /// The original root is retained through a descriptor and restored
    /// after the command finishes; a restore failure is escalated even
    /// over a successful command, since the process would otherwise keep
    /// a corrupted root view.
    fn run_shared_root(&self, rootfs: &Path) -> Result<RunStatus> {
        let mut guard = tinybox_core::filesystem::chroot::RootGuard::open()?;
        let proc_outside = tinybox_core::filesystem::mount::mount_proc(rootfs)?;

        let mut chrooted = false;
        let result = (|| {
            tinybox_core::filesystem::chroot::enter_root(rootfs)?;
            chrooted = true;
            crate::supervisor::supervise(
                &self.spec.command,
                &crate::supervisor::container_env(),
                None,
            )
        })();

        let proc_target = if chrooted {
            PathBuf::from("/proc")
        } else {
            proc_outside
        };
        if let Err(e) = tinybox_core::filesystem::mount::unmount_proc(&proc_target) {
            tracing::warn!(error = %e, "failed to unmount private /proc");
        }

        match guard.restore() {
            Err(restore_err) => {
                // The primary outcome is dropped in favor of the restore
                // failure; keep a trace of it.
                match &result {
                    Ok(status) => tracing::error!(
                        status = %status,
                        "root restoration failed; command status discarded"
                    ),
                    Err(e) => tracing::error!(
                        error = %e,
                        "root restoration failed; earlier error discarded"
                    ),
                }
                Err(restore_err)
            }
            Ok(()) => result,
        }
    }
}

/// Every isolating policy limits the supervising process before it
/// spawns the command; only direct unisolated execution skips it.
const fn requires_limits(mode: IsolationMode) -> bool {
    !matches!(mode, IsolationMode::None)
}

/// Platform capability gate: on kernels without namespace/chroot
/// privileges every requested mode degrades to direct execution.
fn effective_isolation(requested: IsolationMode) -> IsolationMode {
    if cfg!(target_os = "linux") {
        requested
    } else {
        if requested != IsolationMode::None {
            tracing::warn!(
                "no namespace/chroot support on this platform; \
                 running without isolation guarantees"
            );
        }
        IsolationMode::None
    }
}
