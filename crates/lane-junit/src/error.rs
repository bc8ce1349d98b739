//! Report ingestion errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while ingesting a single report file.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
}

/// Result type for report ingestion.
pub type ReportResult<T> = Result<T, ReportError>;
