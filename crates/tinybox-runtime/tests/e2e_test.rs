//! End-to-end runs through the full pipeline (layout resolution,
//! extraction, supervision, teardown) in unprivileged fallback mode.
//!
//! Namespaced and chroot paths need CAP_SYS_ADMIN and are exercised
//! structurally in their unit tests instead.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::io::Write;
use std::path::Path;

use tinybox_common::config::RuntimeConfig;
use tinybox_common::error::TinyboxError;
use tinybox_common::types::{ImageName, IsolationMode, RunStatus};
use tinybox_image::layout::ImageLayout;
use tinybox_runtime::container::Container;

/// Seeds `<images>/<name>/<name>.tar.gz` with a rootfs containing a
/// `bin/<script_name>` shell script, plus the command sidecar.
fn seed_image(images_dir: &Path, name: &str, script_name: &str, script: &str) -> ImageName {
    let image_dir = images_dir.join(name);
    std::fs::create_dir_all(&image_dir).expect("mkdir image dir");

    let archive = std::fs::File::create(image_dir.join(format!("{name}.tar.gz")))
        .expect("create archive");
    let encoder = flate2::write::GzEncoder::new(archive, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);

    let data = script.as_bytes();
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o755);
    header.set_cksum();
    builder
        .append_data(&mut header, format!("bin/{script_name}"), data)
        .expect("append script");
    let encoder = builder.into_inner().expect("finish tar");
    let mut file = encoder.finish().expect("finish gzip");
    file.flush().expect("flush");

    std::fs::write(
        image_dir.join(format!("{name}-cmd")),
        format!("/bin/{script_name}\n"),
    )
    .expect("write sidecar");

    ImageName::new(name)
}

fn fallback_config(images_dir: &Path) -> RuntimeConfig {
    RuntimeConfig {
        images_dir: images_dir.to_path_buf(),
        isolation: IsolationMode::None,
        ..RuntimeConfig::default()
    }
}

/// Returns leftover extraction directories for the given image prefix.
fn leftover_workdirs(prefix: &str) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(std::env::temp_dir())
        .expect("read temp dir")
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(prefix))
        })
        .collect()
}

#[test]
fn run_executes_sidecar_command_and_cleans_up() {
    let images = tempfile::tempdir().expect("tempdir");
    let name = format!("e2eok{}", std::process::id());
    let image = seed_image(images.path(), &name, "hello", "#!/bin/sh\nexit 0\n");

    let config = fallback_config(images.path());
    let layout = ImageLayout::new(images.path());
    let spec = layout.resolve_spec(&image, &[]).expect("resolve spec");

    let status = Container::new(config, spec).run().expect("run");
    assert_eq!(status, RunStatus::Exited(0));
    assert!(status.success());

    assert!(
        leftover_workdirs(&format!("{}_", image.sanitized())).is_empty(),
        "extraction directory survived teardown"
    );
}

#[test]
fn nonzero_exit_is_status_not_error() {
    let images = tempfile::tempdir().expect("tempdir");
    let name = format!("e2ecode{}", std::process::id());
    let image = seed_image(images.path(), &name, "failer", "#!/bin/sh\nexit 7\n");

    let layout = ImageLayout::new(images.path());
    let spec = layout.resolve_spec(&image, &[]).expect("resolve spec");

    let status = Container::new(fallback_config(images.path()), spec)
        .run()
        .expect("run");
    assert_eq!(status, RunStatus::Exited(7));
    assert_eq!(status.exit_code(), 7);
}

#[test]
fn explicit_command_overrides_sidecar() {
    let images = tempfile::tempdir().expect("tempdir");
    let name = format!("e2earg{}", std::process::id());
    let image = seed_image(images.path(), &name, "default", "#!/bin/sh\nexit 1\n");

    // Ship a second script and address it explicitly.
    let image_dir = images.path().join(name.as_str());
    let archive_path = image_dir.join(format!("{name}.tar.gz"));
    let existing = std::fs::File::create(&archive_path).expect("recreate archive");
    let encoder = flate2::write::GzEncoder::new(existing, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (path, body) in [
        ("bin/default", "#!/bin/sh\nexit 1\n"),
        ("bin/other", "#!/bin/sh\nexit 0\n"),
    ] {
        let data = body.as_bytes();
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, path, data).expect("append");
    }
    let encoder = builder.into_inner().expect("finish tar");
    let _ = encoder.finish().expect("finish gzip");

    let layout = ImageLayout::new(images.path());
    let spec = layout
        .resolve_spec(&image, &["/bin/other".into()])
        .expect("resolve spec");

    let status = Container::new(fallback_config(images.path()), spec)
        .run()
        .expect("run");
    assert_eq!(status, RunStatus::Exited(0));
}

#[test]
fn missing_command_fails_but_still_cleans_up() {
    let images = tempfile::tempdir().expect("tempdir");
    let name = format!("e2emiss{}", std::process::id());
    let image = seed_image(images.path(), &name, "hello", "#!/bin/sh\nexit 0\n");

    let layout = ImageLayout::new(images.path());
    let spec = layout
        .resolve_spec(&image, &["/bin/ghost".into()])
        .expect("resolve spec");

    let err = Container::new(fallback_config(images.path()), spec)
        .run()
        .expect_err("must fail");
    assert!(matches!(err, TinyboxError::CommandNotFound { .. }));
    assert_eq!(err.exit_code(), 127);

    assert!(
        leftover_workdirs(&format!("{}_", image.sanitized())).is_empty(),
        "extraction directory survived failed run"
    );
}

#[test]
fn concurrent_runs_of_distinct_images_do_not_cross_contaminate() {
    let images = tempfile::tempdir().expect("tempdir");
    let pid = std::process::id();
    let name_a = format!("e2econc.a{pid}");
    let name_b = format!("e2econc.b{pid}");
    let image_a = seed_image(images.path(), &name_a, "a", "#!/bin/sh\nexit 0\n");
    let image_b = seed_image(images.path(), &name_b, "b", "#!/bin/sh\nexit 0\n");

    let layout = ImageLayout::new(images.path());
    let spec_a = layout.resolve_spec(&image_a, &[]).expect("resolve a");
    let spec_b = layout.resolve_spec(&image_b, &[]).expect("resolve b");
    let config = fallback_config(images.path());

    let container_a = Container::new(config.clone(), spec_a);
    let container_b = Container::new(config, spec_b);

    let handle = std::thread::spawn(move || container_a.run());
    let status_b = container_b.run().expect("run b");
    let status_a = handle.join().expect("join").expect("run a");

    assert_eq!(status_a, RunStatus::Exited(0));
    assert_eq!(status_b, RunStatus::Exited(0));
    assert!(leftover_workdirs(&format!("{}_", image_a.sanitized())).is_empty());
    assert!(leftover_workdirs(&format!("{}_", image_b.sanitized())).is_empty());
}
