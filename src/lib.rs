//! Trusts the macOS tty framebuffer driver's signing root.
//!
//! Hosts call [`ensure`] once at startup:
//!
//! ```no_run
//! match ttydriver::ensure() {
//!     Ok(outcome) => log::debug!("tty driver: {outcome:?}"),
//!     Err(e) => {
//!         eprintln!("FATAL: {e}");
//!         std::process::exit(1);
//!     }
//! }
//! ```

pub mod config;
pub mod install;

pub use install::{InstallOutcome, Installer, InstallerError, ensure};
