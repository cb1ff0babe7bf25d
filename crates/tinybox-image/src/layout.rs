//! On-disk image layout.
//!
//! Images live under a single root directory:
//! `<images>/<image>/<image>.tar.gz` for the filesystem archive and
//! `<images>/<image>/<image>-cmd` for the recorded default command line.

use std::path::{Path, PathBuf};

use tinybox_common::error::{Result, TinyboxError};
use tinybox_common::types::{ContainerSpec, ImageName};

/// Resolves image names to their archive and sidecar paths.
#[derive(Debug, Clone)]
pub struct ImageLayout {
    images_dir: PathBuf,
}

impl ImageLayout {
    /// Creates a layout rooted at `images_dir`.
    #[must_use]
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        Self {
            images_dir: images_dir.into(),
        }
    }

    /// Path of the image's filesystem archive.
    #[must_use]
    pub fn archive_path(&self, image: &ImageName) -> PathBuf {
        self.images_dir
            .join(image.as_str())
            .join(format!("{image}.tar.gz"))
    }

    /// Path of the sidecar file holding the image's default command.
    #[must_use]
    pub fn command_path(&self, image: &ImageName) -> PathBuf {
        self.images_dir
            .join(image.as_str())
            .join(format!("{image}-cmd"))
    }

    /// Reads the default command line recorded for the image.
    ///
    /// # Errors
    ///
    /// Returns [`TinyboxError::Input`] if the sidecar file is missing,
    /// unreadable, or empty.
    pub fn default_command(&self, image: &ImageName) -> Result<Vec<String>> {
        let path = self.command_path(image);
        let raw = std::fs::read_to_string(&path).map_err(|e| TinyboxError::Input {
            message: format!("failed to read command file {}: {e}", path.display()),
        })?;
        let command: Vec<String> = raw.split_whitespace().map(str::to_owned).collect();
        if command.is_empty() {
            return Err(TinyboxError::Input {
                message: format!("command file {} is empty", path.display()),
            });
        }
        Ok(command)
    }

    /// Builds the immutable spec for one run: explicit command if given,
    /// otherwise the image's recorded default.
    ///
    /// # Errors
    ///
    /// Returns [`TinyboxError::Input`] when no command can be resolved,
    /// or [`TinyboxError::ArchiveNotFound`] when the archive is missing.
    pub fn resolve_spec(&self, image: &ImageName, command: &[String]) -> Result<ContainerSpec> {
        let archive = self.archive_path(image);
        if !archive.exists() {
            return Err(TinyboxError::ArchiveNotFound { path: archive });
        }

        let command = if command.is_empty() {
            self.default_command(image)?
        } else {
            command.to_vec()
        };

        Ok(ContainerSpec {
            image: image.clone(),
            command,
            archive,
        })
    }

    /// Returns the images root directory.
    #[must_use]
    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }
}
