//! Platform detection for the trust installer
//!
//! The driver only exists on macOS. Go-style tooling reports that family as
//! `darwin` while Rust reports `macos`, so both names are accepted.

/// Platform names that identify the macOS family, compared case-insensitively
pub const TARGET_PLATFORMS: [&str; 2] = ["darwin", "macos"];

/// Platform identifier of the running process
pub fn current_platform() -> &'static str {
    std::env::consts::OS
}

/// Check whether `platform` names the macOS family
///
/// Returns `true` for `darwin`/`macos` in any letter case, `false` for
/// everything else including the empty string.
pub fn is_target_platform(platform: &str) -> bool {
    TARGET_PLATFORMS
        .iter()
        .any(|target| target.eq_ignore_ascii_case(platform))
}
