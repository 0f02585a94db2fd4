//! The real `security` runner, pointed at stand-in programs
#![cfg(unix)]

use std::fs;

use ttydriver::install::{InstallOutcome, Installer, InstallerError, SecurityCommand};

#[test]
fn successful_command_installs() {
    let home = tempfile::tempdir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let staging = tmp.path().join("drv.bin");

    let installer = Installer::builder()
        .platform("darwin")
        .home_dir(home.path())
        .staging_path(&staging)
        .trust_store(SecurityCommand::new().program("true").use_sudo(false))
        .build();

    assert_eq!(installer.ensure().unwrap(), InstallOutcome::Installed);
    assert!(home.path().join(".tty_settings").exists());
    assert!(!staging.exists());
}

#[test]
fn failing_command_aborts_the_install() {
    let home = tempfile::tempdir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    let staging = tmp.path().join("drv.bin");

    let installer = Installer::builder()
        .platform("darwin")
        .home_dir(home.path())
        .staging_path(&staging)
        .trust_store(SecurityCommand::new().program("false").use_sudo(false))
        .build();

    let err = installer.ensure().unwrap_err();

    assert!(matches!(err, InstallerError::TrustCommandFailed { .. }));
    assert!(!staging.exists());
    assert!(fs::read_dir(home.path()).unwrap().next().is_none());
}
