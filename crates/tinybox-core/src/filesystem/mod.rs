//! Container filesystem setup: private `/proc` mounts and root switching.

pub mod chroot;
pub mod mount;
