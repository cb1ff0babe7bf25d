//! Cgroup resource limiting.
//!
//! Writes per-controller limits under the v1 hierarchy at
//! `/sys/fs/cgroup/<controller>/tinybox/<run-id>`. The run ID in the path
//! keeps concurrent runs from colliding on the host-global cgroup tree.
//!
//! Limits are applied to the *supervising* process before it spawns the
//! isolated child, so the whole container process tree inherits the
//! membership through normal process creation. Any single write failure
//! is fatal for the run — partial limiting is treated as unsafe, not
//! best-effort.

pub mod cpu;
pub mod memory;
pub mod pids;

use std::path::{Path, PathBuf};

use tinybox_common::config::LimitValues;
use tinybox_common::error::{Result, TinyboxError};
use tinybox_common::types::RunId;

/// One controller's limit: which file to write and what value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitDescriptor {
    /// Controller name, also the directory under the cgroup mount point.
    pub controller: &'static str,
    /// Limit parameter file inside the control-group directory.
    pub param_file: &'static str,
    /// Value written to the parameter file.
    pub value: u64,
}

/// The set of control groups created for a single run.
///
/// Construction is cheap and side-effect free; [`LimitSet::apply`]
/// performs the writes. Created directories are recorded so that
/// [`LimitSet::remove`] can prune them at teardown.
#[derive(Debug)]
pub struct LimitSet {
    base: PathBuf,
    run_id: RunId,
    descriptors: Vec<LimitDescriptor>,
    created: Vec<PathBuf>,
}

impl LimitSet {
    /// Builds the fixed limit table for a run against the system cgroup
    /// hierarchy.
    #[must_use]
    pub fn new(run_id: RunId, limits: &LimitValues) -> Self {
        Self::with_base(
            PathBuf::from(tinybox_common::constants::CGROUP_V1_PATH),
            run_id,
            limits,
        )
    }

    /// Builds the limit table against an alternative hierarchy root.
    ///
    /// Tests use this to verify the exact writes against a plain
    /// directory instead of a mounted cgroup filesystem.
    #[must_use]
    pub fn with_base(base: PathBuf, run_id: RunId, limits: &LimitValues) -> Self {
        Self {
            base,
            run_id,
            descriptors: vec![
                pids::descriptor(limits.pids_max),
                memory::descriptor(limits.memory_limit_bytes),
                cpu::descriptor(limits.cpu_shares),
            ],
            created: Vec::new(),
        }
    }

    /// Directory for one controller:
    /// `<base>/<controller>/tinybox/<run-id>`.
    fn group_dir(&self, controller: &str) -> PathBuf {
        self.base
            .join(controller)
            .join(tinybox_common::constants::CGROUP_GROUP_NAME)
            .join(self.run_id.as_str())
    }

    /// Creates every control group, writes its limit, enables release
    /// notification, and adds `pid` to its membership file.
    ///
    /// # Errors
    ///
    /// Returns [`TinyboxError::ResourceLimit`] on the first failing
    /// controller. Groups created before the failure stay recorded so
    /// [`LimitSet::remove`] can still prune them.
    pub fn apply(&mut self, pid: u32) -> Result<()> {
        for desc in self.descriptors.clone() {
            let dir = self.group_dir(desc.controller);
            std::fs::create_dir_all(&dir).map_err(|e| TinyboxError::ResourceLimit {
                controller: desc.controller,
                path: dir.clone(),
                source: e,
            })?;
            self.created.push(dir.clone());

            write_control(desc.controller, &dir.join(desc.param_file), &desc.value.to_string())?;
            write_control(desc.controller, &dir.join("notify_on_release"), "1")?;
            write_control(desc.controller, &dir.join("cgroup.procs"), &pid.to_string())?;

            tracing::debug!(
                controller = desc.controller,
                value = desc.value,
                pid,
                path = %dir.display(),
                "cgroup limit applied"
            );
        }
        Ok(())
    }

    /// Removes the created control-group directories, best-effort.
    ///
    /// Runs in reverse creation order. Failures (typically a process
    /// still holding membership) are logged as warnings and never
    /// escalated; the kernel prunes empty notify-on-release groups on
    /// its own.
    pub fn remove(&mut self) {
        for dir in self.created.drain(..).rev() {
            // cgroupfs directories are removed with rmdir, never recursively.
            if let Err(e) = std::fs::remove_dir(&dir) {
                tracing::warn!(path = %dir.display(), error = %e, "failed to remove cgroup");
            } else {
                tracing::debug!(path = %dir.display(), "cgroup removed");
            }
        }
    }

    /// Returns the directories created so far (test hook).
    #[must_use]
    pub fn created_paths(&self) -> &[PathBuf] {
        &self.created
    }
}

fn write_control(controller: &'static str, path: &Path, value: &str) -> Result<()> {
    std::fs::write(path, value).map_err(|e| TinyboxError::ResourceLimit {
        controller,
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_limits() -> LimitValues {
        LimitValues {
            pids_max: 20,
            memory_limit_bytes: 64 * 1024 * 1024,
            cpu_shares: 512,
        }
    }

    #[test]
    fn apply_writes_exact_values_and_membership() {
        let base = tempfile::tempdir().expect("tempdir");
        let mut set = LimitSet::with_base(
            base.path().to_path_buf(),
            RunId::new("run-1"),
            &test_limits(),
        );
        set.apply(4242).expect("apply");

        let pids_dir = base.path().join("pids/tinybox/run-1");
        assert_eq!(
            std::fs::read_to_string(pids_dir.join("pids.max")).expect("read"),
            "20"
        );
        assert_eq!(
            std::fs::read_to_string(pids_dir.join("cgroup.procs")).expect("read"),
            "4242"
        );
        assert_eq!(
            std::fs::read_to_string(pids_dir.join("notify_on_release")).expect("read"),
            "1"
        );

        let mem_dir = base.path().join("memory/tinybox/run-1");
        assert_eq!(
            std::fs::read_to_string(mem_dir.join("memory.limit_in_bytes")).expect("read"),
            (64 * 1024 * 1024).to_string()
        );

        let cpu_dir = base.path().join("cpu/tinybox/run-1");
        assert_eq!(
            std::fs::read_to_string(cpu_dir.join("cpu.shares")).expect("read"),
            "512"
        );
    }

    #[test]
    fn distinct_run_ids_use_distinct_directories() {
        let base = tempfile::tempdir().expect("tempdir");
        let mut a = LimitSet::with_base(base.path().to_path_buf(), RunId::new("a"), &test_limits());
        let mut b = LimitSet::with_base(base.path().to_path_buf(), RunId::new("b"), &test_limits());
        a.apply(1).expect("apply a");
        b.apply(2).expect("apply b");
        assert!(base.path().join("pids/tinybox/a").is_dir());
        assert!(base.path().join("pids/tinybox/b").is_dir());
    }

    #[test]
    fn failure_on_one_controller_aborts() {
        let base = tempfile::tempdir().expect("tempdir");
        // A plain file where the pids controller directory should go makes
        // create_dir_all fail on the very first controller.
        std::fs::write(base.path().join("pids"), b"not a dir").expect("write");

        let mut set = LimitSet::with_base(
            base.path().to_path_buf(),
            RunId::new("run-err"),
            &test_limits(),
        );
        let err = set.apply(1).expect_err("apply must fail");
        assert!(matches!(
            err,
            TinyboxError::ResourceLimit {
                controller: "pids",
                ..
            }
        ));
        // Nothing past the failing controller was created.
        assert!(!base.path().join("memory").exists());
        assert!(!base.path().join("cpu").exists());
    }

    #[test]
    fn groups_created_before_a_failure_are_recorded_and_pruned() {
        let base = tempfile::tempdir().expect("tempdir");
        // Let the pids controller succeed, then fail on memory.
        std::fs::write(base.path().join("memory"), b"not a dir").expect("write");

        let mut set = LimitSet::with_base(
            base.path().to_path_buf(),
            RunId::new("run-partial"),
            &test_limits(),
        );
        set.apply(1).expect_err("apply must fail");

        let pids_dir = base.path().join("pids/tinybox/run-partial");
        assert!(pids_dir.is_dir());
        assert_eq!(set.created_paths(), [pids_dir.clone()]);

        // Emulate cgroupfs, where an empty group's rmdir succeeds.
        for entry in std::fs::read_dir(&pids_dir).expect("read_dir") {
            std::fs::remove_file(entry.expect("entry").path()).expect("remove file");
        }
        set.remove();
        assert!(!pids_dir.exists());
    }

    #[test]
    fn remove_prunes_created_groups() {
        let base = tempfile::tempdir().expect("tempdir");
        let mut set = LimitSet::with_base(
            base.path().to_path_buf(),
            RunId::new("run-rm"),
            &test_limits(),
        );
        set.apply(7).expect("apply");
        assert_eq!(set.created_paths().len(), 3);

        // On cgroupfs the control files are virtual and rmdir succeeds on
        // an empty group; emulate that by clearing the plain files first.
        for dir in set.created_paths().to_vec() {
            for entry in std::fs::read_dir(&dir).expect("read_dir") {
                std::fs::remove_file(entry.expect("entry").path()).expect("remove file");
            }
        }

        set.remove();
        assert!(set.created_paths().is_empty());
        assert!(!base.path().join("pids/tinybox/run-rm").exists());
        assert!(!base.path().join("memory/tinybox/run-rm").exists());
        assert!(!base.path().join("cpu/tinybox/run-rm").exists());
    }

    #[test]
    fn remove_is_best_effort_when_group_is_busy() {
        let base = tempfile::tempdir().expect("tempdir");
        let mut set = LimitSet::with_base(
            base.path().to_path_buf(),
            RunId::new("run-busy"),
            &test_limits(),
        );
        set.apply(7).expect("apply");

        // Control files still present: rmdir fails, remove() only warns.
        set.remove();
        assert!(set.created_paths().is_empty());
    }
}
