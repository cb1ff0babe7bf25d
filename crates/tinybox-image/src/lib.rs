//! # tinybox-image
//!
//! Everything between an image name and a populated root filesystem:
//! resolving the on-disk image layout, creating the private per-run
//! extraction directory, unpacking the archive under a mandatory timeout,
//! and delegating image fetching to the external pull script.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used, clippy::panic))]

pub mod extract;
pub mod layout;
pub mod pull;
pub mod workdir;
