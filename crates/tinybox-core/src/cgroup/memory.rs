//! Memory limiting via the `memory` controller.

use super::LimitDescriptor;

/// Limit parameter file for the `memory` controller.
pub const PARAM_FILE: &str = "memory.limit_in_bytes";

/// Builds the descriptor setting the hard memory ceiling in bytes.
#[must_use]
pub const fn descriptor(limit_bytes: u64) -> LimitDescriptor {
    LimitDescriptor {
        controller: "memory",
        param_file: PARAM_FILE,
        value: limit_bytes,
    }
}
