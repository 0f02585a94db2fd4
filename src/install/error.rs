//! Error types for the trust installer

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort an `ensure` run
///
/// None of these are retried here; the host decides whether to terminate.
#[derive(Debug, Error)]
pub enum InstallerError {
    #[error("could not resolve the current user's home directory: {0}")]
    HomeDirectory(String),

    #[error("embedded driver credential is invalid: {0}")]
    InvalidCredential(String),

    #[error("failed to stage credential at {path}: {source}")]
    StageCredential {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch trust command `{program}`: {source}")]
    TrustCommandLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("trust command exited with {}: {output}", exit_status(.code))]
    TrustCommandFailed { code: Option<i32>, output: String },

    #[error("failed to write tty settings to {path}: {source}")]
    WriteMarker {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}
