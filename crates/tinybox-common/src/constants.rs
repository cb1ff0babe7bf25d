//! System-wide constants and default paths.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Default base directory for Tinybox data on Linux with root access.
pub const SYSTEM_DATA_DIR: &str = "/var/lib/tinybox";

/// Returns the data directory: `$TINYBOX_HOME` if set, otherwise
/// `$HOME/.tinybox`, falling back to `/var/lib/tinybox`.
fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TINYBOX_HOME") {
        return PathBuf::from(dir);
    }
    if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
        let user_dir = PathBuf::from(home).join(".tinybox");
        if std::fs::create_dir_all(&user_dir).is_ok() {
            return user_dir;
        }
    }
    PathBuf::from(SYSTEM_DATA_DIR)
}

static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Returns the resolved data directory for this session.
pub fn data_dir() -> &'static PathBuf {
    DATA_DIR.get_or_init(resolve_data_dir)
}

/// Returns the default images root.
///
/// Layout underneath: `<images>/<image>/<image>.tar.gz` plus the
/// `<image>-cmd` sidecar holding the default command line.
pub fn default_images_dir() -> PathBuf {
    data_dir().join("images")
}

/// Returns the default path of the external image-fetch script.
pub fn default_pull_script() -> PathBuf {
    data_dir().join("pull.sh")
}

/// Cgroups v1 hierarchy mount point.
pub const CGROUP_V1_PATH: &str = "/sys/fs/cgroup";

/// Subdirectory created under each controller for Tinybox runs.
pub const CGROUP_GROUP_NAME: &str = "tinybox";

/// Default maximum number of processes inside a container.
pub const DEFAULT_PIDS_MAX: u64 = 20;

/// Default memory ceiling in bytes (256 MiB).
pub const DEFAULT_MEMORY_LIMIT_BYTES: u64 = 256 * 1024 * 1024;

/// Default relative CPU share.
pub const DEFAULT_CPU_SHARES: u64 = 256;

/// Default bound on archive extraction, in seconds.
pub const DEFAULT_EXTRACT_TIMEOUT_SECS: u64 = 5 * 60;

/// Default hostname set inside the UTS namespace.
pub const DEFAULT_HOSTNAME: &str = "tinybox";

/// Environment marker exported to every supervised command.
pub const CONTAINER_ENV_MARKER: &str = "CONTAINER";

/// Exit code for setup, input, or escalated teardown failures.
pub const EXIT_SETUP_FAILURE: i32 = 125;

/// Exit code when the target command could not be launched.
pub const EXIT_EXEC_FAILURE: i32 = 126;

/// Exit code when the target command does not exist in the root.
pub const EXIT_COMMAND_NOT_FOUND: i32 = 127;

/// Application name used in CLI output.
pub const APP_NAME: &str = "tinybox";

/// Binary name for the CLI.
pub const BIN_NAME: &str = "tbx";

/// Name of the hidden sentinel subcommand that routes the re-executed
/// child into isolated-setup mode. Never invoked by users.
pub const INIT_SENTINEL: &str = "__init";
