//! CPU limiting via the `cpu` controller.

use super::LimitDescriptor;

/// Limit parameter file for the `cpu` controller.
pub const PARAM_FILE: &str = "cpu.shares";

/// Builds the descriptor setting the group's relative CPU weight.
#[must_use]
pub const fn descriptor(shares: u64) -> LimitDescriptor {
    LimitDescriptor {
        controller: "cpu",
        param_file: PARAM_FILE,
        value: shares,
    }
}
