//! # tinybox-core
//!
//! Low-level Linux isolation primitives for the Tinybox runtime.
//!
//! This crate provides safe abstractions over:
//! - **Namespaces**: mount, PID, and UTS isolation via `unshare(2)`.
//! - **Cgroups**: per-run process-count, memory, and CPU limits.
//! - **Filesystem**: private `/proc` mounts and root switching, including
//!   descriptor-based restoration of the original root.
//!
//! Everything here is process-scoped kernel state. The runtime crate is
//! responsible for calling these primitives in the right order and in the
//! right process (parent vs. re-executed child).

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod cgroup;
pub mod filesystem;
pub mod namespace;
