//! Scoped staging of the driver credential
//!
//! `security add-trusted-cert` only accepts a file path, so the embedded
//! certificate is written to disk for the duration of one trust call.
//! [`StagedCredential`] removes the file when dropped, which covers early
//! returns and unwinding alike.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::error::InstallerError;

/// Owner read/write only
pub const STAGED_MODE: u32 = 0o600;

/// RAII wrapper for the temporary credential file
#[derive(Debug)]
pub struct StagedCredential {
    path: PathBuf,
}

impl StagedCredential {
    /// Write `payload` to a fresh file at `path` with owner-only permissions
    ///
    /// Whatever already sits at `path` is unlinked first, never written
    /// through, so a planted symlink cannot redirect the write. The file is
    /// then created exclusively and without following links; losing a race
    /// to another creator is an error. If the write fails part way, whatever
    /// was created is removed before returning.
    pub fn write(path: &Path, payload: &[u8]) -> Result<Self, InstallerError> {
        let stage_err = |source| InstallerError::StageCredential {
            path: path.to_path_buf(),
            source,
        };

        remove_stale_entry(path).map_err(stage_err)?;

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(STAGED_MODE).custom_flags(libc::O_NOFOLLOW);
        }

        let mut file = options.open(path).map_err(stage_err)?;
        // Guard exists from here on so a failed write still cleans up
        let staged = Self {
            path: path.to_path_buf(),
        };

        // umask may have narrowed the creation mode
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(STAGED_MODE)).map_err(stage_err)?;
        }

        file.write_all(payload).map_err(stage_err)?;
        file.sync_all().map_err(stage_err)?;

        log::debug!("Staged driver credential at {}", staged.path.display());
        Ok(staged)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Unlink a leftover file or symlink at `path`
fn remove_stale_entry(path: &Path) -> std::io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(_) => {
            log::debug!("Removing stale entry at {}", path.display());
            fs::remove_file(path)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

impl Drop for StagedCredential {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => log::debug!("Removed staged credential {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => log::warn!(
                "Failed to remove staged credential {}: {e}",
                self.path.display()
            ),
        }
    }
}
