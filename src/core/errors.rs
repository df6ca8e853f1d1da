//! Bootstrap error taxonomy.
//!
//! Every variant is terminal for the run: the step runner aborts on the
//! first failure and reports the variant's message plus the failing step's
//! operator-facing hint. There is no retry and no rollback; prior steps'
//! effects stay on disk and are safe to re-apply on the next run.

use std::path::PathBuf;

use thiserror::Error;

use crate::util::process::CommandError;

/// Error produced by a step's action.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The install destination exists on disk but the tool does not answer
    /// its presence probe. This half-installed state is left for the
    /// operator to resolve manually rather than auto-repaired.
    #[error("`{tool}` looks half-installed: {dir} exists but `{probe}` does not answer; remove the directory or finish the install by hand")]
    AlreadyInstalledConflict {
        tool: String,
        dir: PathBuf,
        probe: String,
    },

    #[error("failed to create directory {dir}")]
    DirectoryCreate {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A required external executable is not resolvable on PATH.
    #[error("required dependency `{0}` is not available on PATH")]
    DependencyMissing(String),

    #[error("failed to clone {url} into {dest}")]
    CloneFailure {
        url: String,
        dest: PathBuf,
        #[source]
        source: CommandError,
    },

    #[error("failed to install {what}")]
    InstallFailure {
        what: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The selected shell startup file does not exist.
    #[error("startup file {0} does not exist")]
    MissingTargetFile(PathBuf),

    #[error("failed to update startup file {file}")]
    ProfileWrite {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic wrapper for any action command's non-zero exit.
    #[error(transparent)]
    Command(#[from] CommandError),
}
