//! Global context for Rigup operations.
//!
//! Resolves the home directory, the selected startup file, and config
//! locations once at startup. All `~/`-relative configuration paths go
//! through the context so tests can point it at a scratch home directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;

use crate::core::platform::ProfileKind;
use crate::util::fs::expand_tilde;

/// Resolved paths and platform selection for one run.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    home: PathBuf,
    profile_kind: ProfileKind,
}

impl GlobalContext {
    /// Create a context for the current user and platform.
    pub fn new() -> Result<Self> {
        let base = BaseDirs::new().context("could not determine the user home directory")?;
        Ok(GlobalContext {
            home: base.home_dir().to_path_buf(),
            profile_kind: ProfileKind::detect(),
        })
    }

    /// Create a context rooted at an explicit home directory.
    pub fn with_home(home: impl Into<PathBuf>, profile_kind: ProfileKind) -> Self {
        GlobalContext {
            home: home.into(),
            profile_kind,
        }
    }

    /// The user's home directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Which startup file this platform wires.
    pub fn profile_kind(&self) -> ProfileKind {
        self.profile_kind
    }

    /// The shell startup file selected for this platform.
    pub fn startup_file(&self) -> PathBuf {
        self.profile_kind.startup_file(&self.home)
    }

    /// Default config file location: `~/.rigup/config.toml`.
    pub fn config_path(&self) -> PathBuf {
        self.home.join(".rigup").join("config.toml")
    }

    /// Resolve a possibly `~/`-relative configured path.
    pub fn resolve(&self, path: &str) -> PathBuf {
        expand_tilde(path, &self.home)
    }
}
