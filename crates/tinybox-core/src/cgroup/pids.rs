//! Process-count limiting via the `pids` controller.

use super::LimitDescriptor;

/// Limit parameter file for the `pids` controller.
pub const PARAM_FILE: &str = "pids.max";

/// Builds the descriptor bounding the number of processes in the group.
#[must_use]
pub const fn descriptor(max_pids: u64) -> LimitDescriptor {
    LimitDescriptor {
        controller: "pids",
        param_file: PARAM_FILE,
        value: max_pids,
    }
}
