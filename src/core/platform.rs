//! Platform-dependent startup-file selection.
//!
//! Bash reads `~/.bashrc` for interactive shells on Linux, but macOS
//! terminals start login shells which read `~/.bash_profile` instead. The
//! choice is a fixed two-way branch resolved once at startup, not a
//! general platform table.

use std::path::{Path, PathBuf};

/// Which shell startup file receives the wired lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// Interactive-shell rc file (`~/.bashrc`).
    Default,
    /// Login-shell profile (`~/.bash_profile`), used on macOS.
    Login,
}

impl ProfileKind {
    /// Resolve the profile kind for the running platform.
    pub fn detect() -> Self {
        Self::for_os(std::env::consts::OS)
    }

    /// Resolve the profile kind for an OS identifier.
    pub fn for_os(os: &str) -> Self {
        if os == "macos" {
            ProfileKind::Login
        } else {
            ProfileKind::Default
        }
    }

    /// The startup file this kind selects, under the given home directory.
    pub fn startup_file(&self, home: &Path) -> PathBuf {
        match self {
            ProfileKind::Default => home.join(".bashrc"),
            ProfileKind::Login => home.join(".bash_profile"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macos_selects_login_profile() {
        assert_eq!(ProfileKind::for_os("macos"), ProfileKind::Login);
    }

    #[test]
    fn test_other_platforms_select_rc_file() {
        assert_eq!(ProfileKind::for_os("linux"), ProfileKind::Default);
        assert_eq!(ProfileKind::for_os("freebsd"), ProfileKind::Default);
    }

    #[test]
    fn test_startup_file_paths() {
        let home = Path::new("/home/dev");
        assert_eq!(
            ProfileKind::Default.startup_file(home),
            PathBuf::from("/home/dev/.bashrc")
        );
        assert_eq!(
            ProfileKind::Login.startup_file(home),
            PathBuf::from("/home/dev/.bash_profile")
        );
    }
}
