//! System trust store registration
//!
//! On macOS a root is trusted with
//! `security add-trusted-cert -d -r trustRoot -k /Library/Keychains/System.keychain <file>`.
//! `-d` writes admin trust settings, which needs root, hence the `sudo`
//! prefix for unprivileged callers.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::error::InstallerError;

/// Keychain holding device and driver roots
pub const SYSTEM_KEYCHAIN: &str = "/Library/Keychains/System.keychain";

/// Trust policy profile applied to the credential
pub const TRUST_ROOT_POLICY: &str = "trustRoot";

/// `security` subcommand that adds a certificate with trust settings
pub const ADD_TRUSTED_CERT: &str = "add-trusted-cert";

/// Something that can mark a certificate file as a trusted root
pub trait TrustStore: std::fmt::Debug {
    /// Register the certificate at `cert_path`; blocks until done
    fn add_trusted_cert(&self, cert_path: &Path) -> Result<(), InstallerError>;
}

/// Runs the macOS `security` tool
#[derive(Debug, Clone)]
pub struct SecurityCommand {
    program: String,
    keychain: PathBuf,
    trust_policy: String,
    use_sudo: bool,
}

impl Default for SecurityCommand {
    fn default() -> Self {
        Self {
            program: "security".to_string(),
            keychain: PathBuf::from(SYSTEM_KEYCHAIN),
            trust_policy: TRUST_ROOT_POLICY.to_string(),
            use_sudo: true,
        }
    }
}

impl SecurityCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the program name, resolved on `PATH`
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn keychain(mut self, keychain: impl Into<PathBuf>) -> Self {
        self.keychain = keychain.into();
        self
    }

    pub fn trust_policy(mut self, policy: impl Into<String>) -> Self {
        self.trust_policy = policy.into();
        self
    }

    /// Prefix `sudo` when not already root
    pub fn use_sudo(mut self, use_sudo: bool) -> Self {
        self.use_sudo = use_sudo;
        self
    }

    /// Arguments passed after the program name
    pub fn args(&self, cert_path: &Path) -> Vec<OsString> {
        vec![
            ADD_TRUSTED_CERT.into(),
            "-d".into(),
            "-r".into(),
            self.trust_policy.clone().into(),
            "-k".into(),
            self.keychain.clone().into_os_string(),
            cert_path.as_os_str().to_owned(),
        ]
    }

    #[cfg(unix)]
    fn needs_sudo(&self) -> bool {
        self.use_sudo && !nix::unistd::geteuid().is_root()
    }

    #[cfg(not(unix))]
    fn needs_sudo(&self) -> bool {
        false
    }

    fn build(&self, cert_path: &Path) -> Result<Command, InstallerError> {
        let resolved = which::which(&self.program).map_err(|e| {
            InstallerError::TrustCommandLaunch {
                program: self.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()),
            }
        })?;

        let mut command = if self.needs_sudo() {
            let mut sudo = Command::new("sudo");
            sudo.arg(resolved);
            sudo
        } else {
            Command::new(resolved)
        };
        command.args(self.args(cert_path));
        Ok(command)
    }
}

impl TrustStore for SecurityCommand {
    fn add_trusted_cert(&self, cert_path: &Path) -> Result<(), InstallerError> {
        let mut command = self.build(cert_path)?;
        log::debug!("Running {command:?}");

        let output = command
            .output()
            .map_err(|source| InstallerError::TrustCommandLaunch {
                program: self.program.clone(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            log::debug!("{} output: {}", self.program, combined.trim());
            Ok(())
        } else {
            Err(InstallerError::TrustCommandFailed {
                code: output.status.code(),
                output: combined.trim().to_string(),
            })
        }
    }
}
