//! Lane error taxonomy.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::state::RunState;

/// Errors raised while running a job.
///
/// Some variants are returned to the caller as hard errors; the rest are
/// folded into a failed [`RunOutcome`](crate::RunOutcome) whose message is
/// the variant's display text. See [`LaneError::is_fatal`].
#[derive(Debug, Error)]
pub enum LaneError {
    #[error("data directory {} does not exist", .0.display())]
    WorkspaceMissing(PathBuf),

    #[error("executor only support git-dir based tests")]
    UnsupportedContent,

    #[error("no {descriptor} found")]
    ProjectFileMissing { descriptor: String, directory: PathBuf },

    #[error("could not create {file}")]
    SettingsWriteFailed {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid test type {0:?}: expected \"<group>/<subtype>\"")]
    InvalidTestType(String),

    #[error("failed to collect reports from {}: {source}", .path.display())]
    ReportCollectionFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("invalid run state transition from {from:?} to {to:?}")]
    InvalidTransition { from: RunState, to: RunState },
}

impl LaneError {
    /// Fatal errors are returned as `Err`; the others become a failed outcome.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            LaneError::WorkspaceMissing(_)
                | LaneError::InvalidTestType(_)
                | LaneError::InvalidTransition { .. }
        )
    }
}

/// Result type for lane operations.
pub type LaneResult<T> = Result<T, LaneError>;
