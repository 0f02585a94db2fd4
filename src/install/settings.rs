//! tty settings marker file
//!
//! `~/.tty_settings` switches the framebuffer driver on for the terminal
//! host and doubles as the "already trusted" marker for this installer.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::error::InstallerError;

/// Marker file name inside the user's home directory
pub const TTY_SETTINGS_FILE: &str = ".tty_settings";

/// Exact marker content
pub const TTY_SETTINGS_CONTENT: &str = "frame_buffer=yes\nenable=yes\n";

/// Mode the marker is created with
pub const TTY_SETTINGS_MODE: u32 = 0o755;

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        /// Home directory of the invoking user
        ///
        /// This is the passwd entry of the real uid rather than `$HOME`, so a
        /// `sudo -E` caller still gets their own home.
        pub fn current_home_dir() -> Result<PathBuf, InstallerError> {
            use nix::unistd::{User, getuid};

            let uid = getuid();
            let user = User::from_uid(uid)
                .map_err(|e| {
                    InstallerError::HomeDirectory(format!(
                        "passwd lookup for uid {uid} failed: {e}"
                    ))
                })?
                .ok_or_else(|| {
                    InstallerError::HomeDirectory(format!("no passwd entry for uid {uid}"))
                })?;
            Ok(user.dir)
        }
    } else {
        /// Home directory of the invoking user
        pub fn current_home_dir() -> Result<PathBuf, InstallerError> {
            dirs::home_dir()
                .ok_or_else(|| InstallerError::HomeDirectory("home directory not set".to_string()))
        }
    }
}

/// Marker path under `home`
pub fn tty_settings_path(home: &Path, file_name: &str) -> PathBuf {
    home.join(file_name)
}

/// Write the marker with the fixed feature flags
pub fn write_tty_settings(path: &Path) -> Result<(), InstallerError> {
    let write_err = |source| InstallerError::WriteMarker {
        path: path.to_path_buf(),
        source,
    };

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(TTY_SETTINGS_MODE);
    }

    let mut file = options.open(path).map_err(write_err)?;
    file.write_all(TTY_SETTINGS_CONTENT.as_bytes())
        .map_err(write_err)?;
    file.sync_all().map_err(write_err)?;

    log::debug!("Wrote tty settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn marker_lives_in_home() {
        assert_eq!(
            tty_settings_path(Path::new("/Users/alice"), TTY_SETTINGS_FILE),
            PathBuf::from("/Users/alice/.tty_settings")
        );
    }

    #[test]
    fn writes_exact_content() {
        let home = tempfile::tempdir().unwrap();
        let path = tty_settings_path(home.path(), TTY_SETTINGS_FILE);

        write_tty_settings(&path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "frame_buffer=yes\nenable=yes\n"
        );
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let home = tempfile::tempdir().unwrap();
        let path = home.path().join("gone").join(TTY_SETTINGS_FILE);

        let err = write_tty_settings(&path).unwrap_err();
        assert!(matches!(err, InstallerError::WriteMarker { .. }));
        assert!(!path.exists());
    }
}
