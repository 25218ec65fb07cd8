//! Error types for the wsdiff crate.

use std::path::PathBuf;

/// Diff-specific error types.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The input file could not be opened.
    #[error("file not found: {path}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path is longer than the platform allows.
    #[error("file name too long: {path}")]
    FilenameTooLong { path: PathBuf },

    /// The file opened but its metadata could not be read.
    #[error("cannot stat {path}: {source}")]
    StatFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exceeds the configured size limit.
    #[error("file too large: {path} ({size} bytes, limit {limit})")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    /// Memory mapping the file failed.
    #[error("cannot map {path}: {source}")]
    MapFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing rendered output failed.
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiffError {
    /// Short numeric status used in the two-file load diagnostic.
    ///
    /// Zero is reserved for "loaded fine".
    pub const fn status_code(&self) -> u8 {
        match self {
            Self::FileNotFound { .. } => 1,
            Self::FileTooLarge { .. } => 2,
            Self::FilenameTooLong { .. } => 3,
            Self::MapFailed { .. } => 4,
            Self::StatFailed { .. } => 5,
            Self::Io(_) => 6,
        }
    }
}

/// Convenience result type for wsdiff operations.
pub type DiffResult<T> = Result<T, DiffError>;
