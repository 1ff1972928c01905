//! End-to-end tests: load a configuration directory, then drive a switch
//! against a recording [`MountOps`].
//!
//! Files are created by the test user, so the trusted uid is the current
//! uid rather than root.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::os::unix::fs::MetadataExt;
use std::path::Path;

use chos_common::config::{ChosConfig, MountLayout};
use chos_common::error::{ChosError, Result};
use chos_core::{ConfigLoader, DirectoryBind, MountOps, MountOrchestrator, configure};

#[derive(Debug, Default)]
struct Recorder {
    log: Vec<String>,
}

impl MountOps for Recorder {
    fn unshare_mount_namespace(&mut self) -> Result<()> {
        self.log.push("unshare".into());
        Ok(())
    }

    fn change_dir(&mut self, path: &Path) -> Result<()> {
        self.log.push(format!("chdir {}", path.display()));
        Ok(())
    }

    fn pivot_root(&mut self, new_root: &Path, put_old: &Path) -> Result<()> {
        self.log
            .push(format!("pivot {} {}", new_root.display(), put_old.display()));
        Ok(())
    }

    fn bind_mount_readonly(&mut self, source: &Path, dest: &Path) -> Result<()> {
        self.log
            .push(format!("mount {} {}", source.display(), dest.display()));
        Ok(())
    }

    fn unmount(&mut self, dest: &Path) -> Result<()> {
        self.log.push(format!("umount {}", dest.display()));
        Ok(())
    }
}

fn config_dir(files: &[(&str, &str)]) -> (tempfile::TempDir, u32) {
    let dir = tempfile::tempdir().expect("tempdir");
    for (name, body) in files {
        std::fs::write(dir.path().join(name), body).expect("write config");
    }
    let uid = std::fs::metadata(dir.path()).expect("metadata").uid();
    (dir, uid)
}

fn config_for(dir: &Path, uid: u32) -> ChosConfig {
    ChosConfig {
        config_dir: dir.to_path_buf(),
        trusted_uid: uid,
        ..ChosConfig::default()
    }
}

const ALT: &str = "/opt/alt/lib /chos2/usr/lib\n/opt/alt/bin /chos2/usr/bin\n";

#[test]
fn loads_one_environment_per_regular_file() {
    let (dir, uid) = config_dir(&[("root", ""), ("alt", ALT), ("sl5", "# empty\n")]);
    std::fs::create_dir(dir.path().join("subdir")).expect("mkdir");

    let registry = configure(&config_for(dir.path(), uid)).unwrap();

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.root().unwrap().name(), "root");
    let mut names: Vec<_> = registry.names().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["alt", "root", "sl5"]);
    assert_eq!(
        registry.lookup("alt").unwrap().config_file(),
        dir.path().join("alt")
    );
}

#[test]
fn binds_keep_file_order() {
    let (dir, uid) = config_dir(&[("root", ""), ("alt", ALT)]);
    let registry = configure(&config_for(dir.path(), uid)).unwrap();

    let binds: Vec<_> = registry.lookup("alt").unwrap().binds().iter().cloned().collect();
    assert_eq!(
        binds,
        vec![
            DirectoryBind::new("/opt/alt/lib", "/chos2/usr/lib"),
            DirectoryBind::new("/opt/alt/bin", "/chos2/usr/bin"),
        ]
    );
}

#[test]
fn one_token_line_aborts_the_load() {
    let (dir, uid) = config_dir(&[("root", ""), ("bad", "onlysource\n")]);

    let err = configure(&config_for(dir.path(), uid)).unwrap_err();
    assert!(matches!(err, ChosError::Parse { line_no: 1, .. }));

    let loader = ConfigLoader::new(dir.path(), uid);
    assert!(loader.create_environment("root").is_ok());
    assert!(matches!(
        loader.create_environment("bad"),
        Err(ChosError::Parse { .. })
    ));
}

#[test]
fn untrusted_owner_is_rejected() {
    let (dir, uid) = config_dir(&[("root", ""), ("alt", ALT)]);

    let err = configure(&config_for(dir.path(), uid.wrapping_add(1))).unwrap_err();
    assert!(matches!(err, ChosError::PermissionDenied { .. }));
}

#[test]
fn missing_root_is_config_not_found() {
    let (dir, uid) = config_dir(&[("alt", ALT)]);

    let err = configure(&config_for(dir.path(), uid)).unwrap_err();
    assert!(matches!(err, ChosError::ConfigNotFound { path, .. } if path == dir.path().join("root")));
}

#[test]
fn missing_directory_fails() {
    let config = config_for(Path::new("/nonexistent/chos.d"), 0);
    assert!(matches!(
        configure(&config),
        Err(ChosError::ConfigNotFound { .. })
    ));
}

#[test]
fn switch_into_alt_from_base_system() {
    let (dir, uid) = config_dir(&[("root", ""), ("alt", ALT)]);
    let registry = configure(&config_for(dir.path(), uid)).unwrap();
    let layout = MountLayout::default();

    let mut orch = MountOrchestrator::new(&registry, &layout, Recorder::default());
    assert!(orch.is_chrooted());
    let env = orch.switch_to("alt").unwrap();
    assert_eq!(env.name(), "alt");

    assert_eq!(
        orch.into_ops().log,
        vec![
            "unshare",
            "mount /opt/alt/lib /chos2/usr/lib",
            "mount /opt/alt/bin /chos2/usr/bin",
            "chdir /chos2",
            "pivot /chos2 /chos2/local",
        ]
    );
}

#[test]
fn switch_away_from_current_environment() {
    let current = "/opt/a /chos2/x\n/local /chos2/local\n/opt/b /chos2/y\n";
    let (dir, uid) = config_dir(&[("root", ""), ("alt", ALT), ("CURRENT", current)]);
    let registry = configure(&config_for(dir.path(), uid)).unwrap();
    let layout = MountLayout::default();

    let mut orch = MountOrchestrator::new(&registry, &layout, Recorder::default());
    assert!(!orch.is_chrooted());
    let _ = orch.switch_to("alt").unwrap();

    assert_eq!(
        orch.into_ops().log,
        vec![
            "unshare",
            "chdir /local",
            "pivot /local /local/chos2",
            "chdir /",
            "umount /chos2/y",
            "umount /chos2/x",
            "mount /opt/alt/lib /chos2/usr/lib",
            "mount /opt/alt/bin /chos2/usr/bin",
            "chdir /chos2",
            "pivot /chos2 /chos2/local",
        ]
    );
}

#[test]
fn unknown_target_touches_nothing() {
    let (dir, uid) = config_dir(&[("root", ""), ("alt", ALT)]);
    let registry = configure(&config_for(dir.path(), uid)).unwrap();
    let layout = MountLayout::default();

    let mut orch = MountOrchestrator::new(&registry, &layout, Recorder::default());
    assert!(matches!(
        orch.switch_to("Alt"),
        Err(ChosError::EnvironmentNotFound { .. })
    ));
    assert!(orch.into_ops().log.is_empty());
}
