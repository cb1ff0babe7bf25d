//! # tinybox-runtime
//!
//! Single-shot container execution for the Tinybox runtime.
//!
//! [`container::Container::run`] is the one public operation: it extracts
//! the image archive into a private directory, applies resource limits,
//! re-executes the binary into fresh namespaces, switches the root,
//! supervises the command, and tears everything down in reverse order on
//! every exit path.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod container;
pub mod fallback;
pub mod init;
pub mod isolate;
pub mod supervisor;
