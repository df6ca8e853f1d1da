//! Idempotent shell startup-file editing.
//!
//! `ProfileEditor` only ever appends. Presence is decided by a literal
//! containment check against the whole file, not a line-anchored match:
//! if the text already occurs anywhere (even inside a longer line) nothing
//! is inserted. Deliberately conservative - re-running the bootstrap must
//! never stack duplicate lines, even when surrounding formatting differs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::errors::BootstrapError;

/// Failure while editing a startup file.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The target file does not exist. The orchestrator decides whether
    /// this is fatal or skippable depending on which profile file it is.
    #[error("startup file {0} does not exist")]
    MissingTargetFile(PathBuf),

    #[error("failed to read or write {file}")]
    Io {
        file: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<ProfileError> for BootstrapError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::MissingTargetFile(path) => BootstrapError::MissingTargetFile(path),
            ProfileError::Io { file, source } => BootstrapError::ProfileWrite { file, source },
        }
    }
}

/// What `ensure_*` did to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireOutcome {
    /// The content was already present; the file is byte-identical.
    AlreadyPresent,
    /// The content was appended at end-of-file.
    Appended,
}

/// Append-only editor for one shell startup file.
#[derive(Debug, Clone)]
pub struct ProfileEditor {
    path: PathBuf,
}

impl ProfileEditor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProfileEditor { path: path.into() }
    }

    /// The file this editor targets.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure `line` occurs in the file, appending `"\n" + line + "\n"` at
    /// end-of-file if it does not.
    ///
    /// Calling this twice with the same arguments produces a file
    /// identical to calling it once. Existing content is preserved
    /// verbatim; nothing is ever removed or reordered.
    pub fn ensure_line(&self, line: &str) -> Result<WireOutcome, ProfileError> {
        self.ensure(line, line)
    }

    /// Ensure a multi-line `block` occurs in the file, using `sentinel` as
    /// the already-present marker.
    ///
    /// The sentinel is expected to be part of the block (typically its
    /// leading comment line) so that a previous append satisfies the check.
    pub fn ensure_block(&self, sentinel: &str, block: &str) -> Result<WireOutcome, ProfileError> {
        self.ensure(sentinel, block)
    }

    fn ensure(&self, marker: &str, content: &str) -> Result<WireOutcome, ProfileError> {
        if !self.path.exists() {
            return Err(ProfileError::MissingTargetFile(self.path.clone()));
        }

        let existing = fs::read_to_string(&self.path).map_err(|source| ProfileError::Io {
            file: self.path.clone(),
            source,
        })?;

        if existing.contains(marker) {
            tracing::debug!("{} already contains the wired content", self.path.display());
            return Ok(WireOutcome::AlreadyPresent);
        }

        let mut updated = existing;
        updated.push('\n');
        updated.push_str(content);
        updated.push('\n');

        fs::write(&self.path, updated).map_err(|source| ProfileError::Io {
            file: self.path.clone(),
            source,
        })?;

        tracing::debug!("appended to {}", self.path.display());
        Ok(WireOutcome::Appended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn profile_with(content: &str) -> (TempDir, ProfileEditor) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".bashrc");
        fs::write(&path, content).unwrap();
        (tmp, ProfileEditor::new(path))
    }

    #[test]
    fn test_appends_with_leading_blank_line() {
        let (_tmp, editor) = profile_with("foo\n");

        let outcome = editor.ensure_line("export PATH=bar").unwrap();
        assert_eq!(outcome, WireOutcome::Appended);
        assert_eq!(
            fs::read_to_string(editor.path()).unwrap(),
            "foo\n\nexport PATH=bar\n"
        );
    }

    #[test]
    fn test_second_call_is_identity() {
        let (_tmp, editor) = profile_with("foo\n");

        editor.ensure_line("export PATH=bar").unwrap();
        let once = fs::read_to_string(editor.path()).unwrap();

        let outcome = editor.ensure_line("export PATH=bar").unwrap();
        assert_eq!(outcome, WireOutcome::AlreadyPresent);
        assert_eq!(fs::read_to_string(editor.path()).unwrap(), once);
    }

    #[test]
    fn test_existing_verbatim_line_left_byte_identical() {
        let (_tmp, editor) = profile_with("export PATH=bar\n");

        let outcome = editor.ensure_line("export PATH=bar").unwrap();
        assert_eq!(outcome, WireOutcome::AlreadyPresent);
        assert_eq!(
            fs::read_to_string(editor.path()).unwrap(),
            "export PATH=bar\n"
        );
    }

    #[test]
    fn test_containment_not_equality() {
        // The line occurs inside a longer line; still counts as present.
        let (_tmp, editor) = profile_with("if true; then export PATH=bar; fi\n");

        let outcome = editor.ensure_line("export PATH=bar").unwrap();
        assert_eq!(outcome, WireOutcome::AlreadyPresent);
    }

    #[test]
    fn test_preserves_and_never_reorders_existing_lines() {
        let original = "# one\nalias ll='ls -l'\n# two\n";
        let (_tmp, editor) = profile_with(original);

        editor.ensure_line("export EDITOR=vi").unwrap();
        let updated = fs::read_to_string(editor.path()).unwrap();
        assert!(updated.starts_with(original));
        assert!(updated.ends_with("\nexport EDITOR=vi\n"));
    }

    #[test]
    fn test_missing_file_is_reported_not_created() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".bash_profile");
        let editor = ProfileEditor::new(&path);

        match editor.ensure_line("export PATH=bar") {
            Err(ProfileError::MissingTargetFile(p)) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_block_guarded_by_sentinel() {
        let (_tmp, editor) = profile_with("foo\n");

        let sentinel = "# devspace shell completion";
        let block = "# devspace shell completion\nif [ -f \"$HOME/.devspace/completion.sh\" ]; then\n  . \"$HOME/.devspace/completion.sh\"\nfi";

        assert_eq!(
            editor.ensure_block(sentinel, block).unwrap(),
            WireOutcome::Appended
        );
        let once = fs::read_to_string(editor.path()).unwrap();
        assert!(once.contains(sentinel));

        assert_eq!(
            editor.ensure_block(sentinel, block).unwrap(),
            WireOutcome::AlreadyPresent
        );
        assert_eq!(fs::read_to_string(editor.path()).unwrap(), once);
    }
}
