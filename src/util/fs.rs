//! Filesystem utilities.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::errors::BootstrapError;

/// Ensure a directory exists, creating the whole tree if necessary.
pub fn ensure_dir(path: &Path) -> Result<(), BootstrapError> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|source| BootstrapError::DirectoryCreate {
            dir: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Expand a leading `~/` against the given home directory.
///
/// Paths without the prefix are returned unchanged. Only the plain-tilde
/// form is supported; `~user/` is not.
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else if path == "~" {
        home.to_path_buf()
    } else {
        PathBuf::from(path)
    }
}
