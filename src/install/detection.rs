//! Installation state detection
//!
//! The only persisted signal is the tty settings marker in the user's home
//! directory. Its content is never read; existence alone means the driver
//! credential was trusted on an earlier run.

use std::path::Path;

use super::environment::is_target_platform;

/// Installation state enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallationState {
    /// Not macOS, nothing will ever be installed
    NotApplicable,
    /// macOS without a marker file
    NotInstalled,
    /// Marker file present
    Installed,
}

impl std::fmt::Display for InstallationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            InstallationState::NotApplicable => "not applicable on this platform",
            InstallationState::NotInstalled => "not installed",
            InstallationState::Installed => "installed",
        };
        f.write_str(text)
    }
}

/// Check installation state for `platform` and the given marker path
pub fn check_installation_state(platform: &str, marker: &Path) -> InstallationState {
    if !is_target_platform(platform) {
        return InstallationState::NotApplicable;
    }
    marker_state(marker)
}

/// State on macOS, judged by the marker alone
///
/// Any filesystem entry at `marker` counts, even a directory or an empty
/// file. A dangling symlink counts too.
pub fn marker_state(marker: &Path) -> InstallationState {
    if marker_present(marker) {
        InstallationState::Installed
    } else {
        InstallationState::NotInstalled
    }
}

fn marker_present(marker: &Path) -> bool {
    // symlink_metadata so a dangling link is still "an entry"
    match std::fs::symlink_metadata(marker) {
        Ok(_) => true,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => {
            // Anything other than "absent" is treated as present
            log::debug!("Could not stat {}: {e}", marker.display());
            true
        }
    }
}
