//! Image acquisition, delegated to an external fetch script.
//!
//! The runtime core never fetches images itself; it only consumes the
//! archive the script leaves behind in the image layout.

use std::path::Path;
use std::process::Command;

use tinybox_common::error::{Result, TinyboxError};
use tinybox_common::types::ImageName;

/// Invokes the fetch script with the image name, inheriting standard
/// streams so its progress output reaches the user.
///
/// # Errors
///
/// Returns [`TinyboxError::Input`] if the script does not exist, or
/// [`TinyboxError::Execution`] if it cannot be started or exits nonzero.
pub fn pull_image(image: &ImageName, script: &Path) -> Result<()> {
    if !script.exists() {
        return Err(TinyboxError::Input {
            message: format!("pull script not found: {}", script.display()),
        });
    }

    tracing::info!(image = %image, script = %script.display(), "pulling image");

    let status = Command::new(script)
        .arg(image.as_str())
        .status()
        .map_err(|e| TinyboxError::Execution {
            command: script.display().to_string(),
            message: e.to_string(),
        })?;

    if !status.success() {
        return Err(TinyboxError::Execution {
            command: script.display().to_string(),
            message: format!("pull script failed for image {image}: {status}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_script_is_an_input_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = pull_image(&ImageName::new("alpine"), &dir.path().join("pull.sh"))
            .expect_err("must fail");
        assert!(matches!(err, TinyboxError::Input { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn failing_script_propagates_as_execution_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let script = dir.path().join("pull.sh");
        std::fs::write(&script, "#!/bin/sh\nexit 3\n").expect("write");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("chmod");

        let err = pull_image(&ImageName::new("alpine"), &script).expect_err("must fail");
        assert!(matches!(err, TinyboxError::Execution { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn successful_script_returns_ok() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let script = dir.path().join("pull.sh");
        std::fs::write(&script, "#!/bin/sh\nexit 0\n").expect("write");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("chmod");

        pull_image(&ImageName::new("alpine"), &script).expect("pull");
    }
}
