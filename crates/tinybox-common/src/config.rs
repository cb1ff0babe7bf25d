//! Global configuration model for the Tinybox runtime.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::IsolationMode;

/// Fixed per-controller limit values applied to every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitValues {
    /// Maximum number of processes (`pids.max`).
    pub pids_max: u64,
    /// Memory ceiling in bytes (`memory.limit_in_bytes`).
    pub memory_limit_bytes: u64,
    /// Relative CPU weight (`cpu.shares`).
    pub cpu_shares: u64,
}

impl Default for LimitValues {
    fn default() -> Self {
        Self {
            pids_max: crate::constants::DEFAULT_PIDS_MAX,
            memory_limit_bytes: crate::constants::DEFAULT_MEMORY_LIMIT_BYTES,
            cpu_shares: crate::constants::DEFAULT_CPU_SHARES,
        }
    }
}

/// Root configuration for the Tinybox runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Directory holding per-image archives and command sidecars.
    pub images_dir: PathBuf,
    /// Path of the external image-fetch script used by `pull`.
    pub pull_script: PathBuf,
    /// Upper bound on archive extraction.
    pub extract_timeout_secs: u64,
    /// Hostname assigned inside the UTS namespace.
    pub hostname: String,
    /// Isolation policy for `run`.
    pub isolation: IsolationMode,
    /// Resource limits applied to every run.
    pub limits: LimitValues,
}

impl RuntimeConfig {
    /// Returns the extraction timeout as a [`Duration`].
    #[must_use]
    pub const fn extract_timeout(&self) -> Duration {
        Duration::from_secs(self.extract_timeout_secs)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            images_dir: crate::constants::default_images_dir(),
            pull_script: crate::constants::default_pull_script(),
            extract_timeout_secs: crate::constants::DEFAULT_EXTRACT_TIMEOUT_SECS,
            hostname: crate::constants::DEFAULT_HOSTNAME.to_owned(),
            isolation: IsolationMode::Namespaced,
            limits: LimitValues::default(),
        }
    }
}
