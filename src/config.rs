use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::install::{
    DEFAULT_STAGING_PATH, Installer, InstallerError, SYSTEM_KEYCHAIN, SecurityCommand,
    TRUST_ROOT_POLICY, TTY_SETTINGS_FILE,
};

/// Installer configuration (defaults match the stock driver setup).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    /// Where the credential is staged while `security` runs
    pub staging_path: PathBuf,
    /// Keychain the root is added to
    pub keychain: PathBuf,
    /// Trust policy passed to `security add-trusted-cert -r`
    pub trust_policy: String,
    /// Marker file name inside the user's home directory
    pub marker_file_name: String,
    /// Prefix `sudo` when not running as root
    pub use_sudo: bool,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            staging_path: PathBuf::from(DEFAULT_STAGING_PATH),
            keychain: PathBuf::from(SYSTEM_KEYCHAIN),
            trust_policy: TRUST_ROOT_POLICY.to_string(),
            marker_file_name: TTY_SETTINGS_FILE.to_string(),
            use_sudo: true,
        }
    }
}

impl TrustConfig {
    /// Load from a TOML file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self, InstallerError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            InstallerError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&raw)
            .map_err(|e| InstallerError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(raw: &str) -> Result<Self, InstallerError> {
        toml::from_str(raw).map_err(|e| InstallerError::Config(e.to_string()))
    }

    /// Installer for the invoking user on the running platform
    pub fn installer(&self) -> Installer {
        let store = SecurityCommand::new()
            .keychain(&self.keychain)
            .trust_policy(&self.trust_policy)
            .use_sudo(self.use_sudo);

        Installer::builder()
            .staging_path(&self.staging_path)
            .marker_file_name(&self.marker_file_name)
            .trust_store(store)
            .build()
    }
}
