//! tty driver trust installation
//!
//! The macOS tty framebuffer driver is signed by a private root. Until that
//! root is trusted in the System keychain the driver will not load, so the
//! terminal host calls [`ensure`] during startup. The first call on a machine
//! trusts the embedded certificate and writes `~/.tty_settings`; every later
//! call, and every call off macOS, is a no-op.

mod credential;
mod detection;
mod environment;
mod error;
mod installer;
mod settings;
mod staging;
mod trust_store;

// Public exports
pub use credential::{DRIVER_CREDENTIAL, validate_credential};
pub use detection::{InstallationState, check_installation_state, marker_state};
pub use environment::{TARGET_PLATFORMS, current_platform, is_target_platform};
pub use error::InstallerError;
pub use installer::{DEFAULT_STAGING_PATH, InstallOutcome, Installer, InstallerBuilder};
pub use settings::{TTY_SETTINGS_CONTENT, TTY_SETTINGS_FILE, TTY_SETTINGS_MODE, current_home_dir};
pub use staging::StagedCredential;
pub use trust_store::{
    ADD_TRUSTED_CERT, SYSTEM_KEYCHAIN, SecurityCommand, TRUST_ROOT_POLICY, TrustStore,
};

/// Ensure the tty driver credential is trusted for the invoking user
///
/// This is the entry point for hosts to call during startup. Errors are
/// returned rather than aborting; the host picks the policy.
pub fn ensure() -> Result<InstallOutcome, InstallerError> {
    ensure_with(&Installer::default())
}

/// Same as [`ensure`] with a caller-built [`Installer`]
pub fn ensure_with(installer: &Installer) -> Result<InstallOutcome, InstallerError> {
    let outcome = installer.ensure()?;
    log::debug!("tty driver trust: {outcome:?}");
    Ok(outcome)
}
