//! Bounded archive extraction.
//!
//! Unpacks a filesystem image into a private destination directory.
//! Supports plain `.tar` and gzip-compressed `.tar.gz` / `.tgz` archives.
//! Extraction runs on a worker thread and is bounded by a timeout so the
//! caller never blocks indefinitely on a hung or oversized archive.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use tinybox_common::error::{Result, TinyboxError};

/// Extracts `archive` into `dest`, preserving permission bits, symlinks,
/// and tar metadata byte-for-byte.
///
/// On timeout the worker thread is abandoned; whatever partial tree it
/// wrote is covered by the caller's removal of the extraction directory.
///
/// # Errors
///
/// - [`TinyboxError::ArchiveNotFound`] if the path does not exist; no
///   directory entries are created in that case.
/// - [`TinyboxError::ArchiveOpen`] if the archive is unreadable.
/// - [`TinyboxError::Extraction`] if the archive is corrupt or in an
///   unsupported format.
/// - [`TinyboxError::ExtractionTimeout`] if unpacking exceeds `timeout`.
pub fn extract_archive(archive: &Path, dest: &Path, timeout: Duration) -> Result<()> {
    if !archive.exists() {
        return Err(TinyboxError::ArchiveNotFound {
            path: archive.to_path_buf(),
        });
    }

    let file = File::open(archive).map_err(|e| TinyboxError::ArchiveOpen {
        path: archive.to_path_buf(),
        source: e,
    })?;

    tracing::info!(
        archive = %archive.display(),
        dest = %dest.display(),
        timeout_secs = timeout.as_secs(),
        "extracting image archive"
    );

    let gzip = is_gzip_archive(archive);
    let dest_buf = dest.to_path_buf();
    let (tx, rx) = mpsc::channel();
    let _worker = std::thread::spawn(move || {
        let outcome = unpack(file, gzip, &dest_buf);
        let _ = tx.send(outcome);
    });

    match rx.recv_timeout(timeout) {
        Ok(outcome) => outcome,
        Err(mpsc::RecvTimeoutError::Timeout) => Err(TinyboxError::ExtractionTimeout {
            seconds: timeout.as_secs(),
        }),
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(TinyboxError::Extraction {
            dest: dest.to_path_buf(),
            source: std::io::Error::other("extraction worker terminated unexpectedly"),
        }),
    }
}

fn unpack(file: File, gzip: bool, dest: &PathBuf) -> Result<()> {
    let map_err = |e: std::io::Error| TinyboxError::Extraction {
        dest: dest.clone(),
        source: e,
    };

    if gzip {
        let decoder = flate2::read::GzDecoder::new(file);
        let mut archive = tar::Archive::new(decoder);
        archive.set_preserve_permissions(true);
        archive.set_preserve_mtime(true);
        archive.unpack(dest).map_err(map_err)
    } else {
        let mut archive = tar::Archive::new(file);
        archive.set_preserve_permissions(true);
        archive.set_preserve_mtime(true);
        archive.unpack(dest).map_err(map_err)
    }
}

/// Determines whether the archive is gzip-compressed based on extension.
fn is_gzip_archive(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz") || ext.eq_ignore_ascii_case("tgz"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(30);

    fn append_file(builder: &mut tar::Builder<impl std::io::Write>, name: &str, mode: u32, data: &[u8]) {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(mode);
        header.set_cksum();
        builder.append_data(&mut header, name, data).expect("append");
    }

    fn create_test_tar_gz(dir: &Path) -> PathBuf {
        let path = dir.join("img.tar.gz");
        let file = File::create(&path).expect("create tar.gz");
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        append_file(&mut builder, "etc/hostname", 0o644, b"boxed\n");
        append_file(&mut builder, "bin/hello", 0o755, b"#!/bin/sh\necho hi\n");
        let encoder = builder.into_inner().expect("finish tar");
        let _ = encoder.finish().expect("finish gzip");
        path
    }

    #[test]
    fn round_trip_preserves_paths_contents_and_modes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let archive = create_test_tar_gz(dir.path());
        let dest = dir.path().join("rootfs");

        extract_archive(&archive, &dest, TIMEOUT).expect("extract");

        let hostname = std::fs::read_to_string(dest.join("etc/hostname")).expect("read");
        assert_eq!(hostname, "boxed\n");

        let mode = std::fs::metadata(dest.join("bin/hello"))
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn plain_tar_is_accepted() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("img.tar");
        let file = File::create(&path).expect("create tar");
        let mut builder = tar::Builder::new(file);
        append_file(&mut builder, "data.txt", 0o600, b"payload");
        builder.finish().expect("finish");

        let dest = dir.path().join("out");
        extract_archive(&path, &dest, TIMEOUT).expect("extract");
        assert_eq!(
            std::fs::read_to_string(dest.join("data.txt")).expect("read"),
            "payload"
        );
    }

    #[test]
    fn missing_archive_fails_without_side_effects() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dest = dir.path().join("never-created");

        let err = extract_archive(&dir.path().join("missing.tar.gz"), &dest, TIMEOUT)
            .expect_err("must fail");
        assert!(matches!(err, TinyboxError::ArchiveNotFound { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn corrupt_gzip_reports_extraction_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.tar.gz");
        std::fs::write(&path, b"this is not gzip data").expect("write");

        let err = extract_archive(&path, &dir.path().join("out"), TIMEOUT).expect_err("must fail");
        assert!(matches!(err, TinyboxError::Extraction { .. }));
    }

    #[test]
    fn gzip_detection_by_extension() {
        assert!(is_gzip_archive(Path::new("img.tar.gz")));
        assert!(is_gzip_archive(Path::new("img.tgz")));
        assert!(!is_gzip_archive(Path::new("img.tar")));
    }
}
