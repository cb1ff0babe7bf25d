//! Private per-run extraction directories.
//!
//! Every run gets a freshly created directory under the system temp root,
//! never a shared or pre-existing path, to avoid cross-run contamination.
//! The directory name is derived from the image name (non-alphanumeric
//! runs normalized to `_`) plus a random suffix, so concurrent runs with
//! distinct images can never collide.

use tempfile::TempDir;
use tinybox_common::error::{Result, TinyboxError};
use tinybox_common::types::ImageName;

/// Creates the private extraction directory for one run.
///
/// The returned [`TempDir`] removes the tree on drop; the runtime also
/// closes it explicitly during teardown so failures surface as warnings.
///
/// # Errors
///
/// Returns [`TinyboxError::Io`] if the directory cannot be created.
pub fn create_workdir(image: &ImageName) -> Result<TempDir> {
    let prefix = format!("{}_", image.sanitized());
    let dir = tempfile::Builder::new()
        .prefix(&prefix)
        .tempdir()
        .map_err(|e| TinyboxError::Io {
            path: std::env::temp_dir(),
            source: e,
        })?;
    tracing::debug!(path = %dir.path().display(), "created extraction directory");
    Ok(dir)
}
