//! Error types
//!
//! `CopyError` covers failures that abort a run. `ReadError` covers a single
//! source file that could not be read; those are logged and skipped.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors for a run
#[derive(Error, Debug)]
pub enum CopyError {
    /// The output artifact could not be created or truncated.
    #[error("Failed to create output file {path}: {source}")]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing into the output artifact failed part-way.
    #[error("Failed to write output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan root does not exist or is not a directory.
    #[error("Scan root is not a directory: {0}")]
    InvalidRoot(PathBuf),

    /// A starter ignore file already exists and `--force` was not given.
    #[error("Ignore file already exists: {0} (use --force to overwrite)")]
    IgnoreFileExists(PathBuf),

    /// Writing the starter ignore file failed.
    #[error("Failed to write ignore file {path}: {source}")]
    IgnoreFileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single source file was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadErrorKind {
    /// Open/read failed (permission denied, vanished, not a regular file...)
    Io,
    /// Content is not valid UTF-8 and the strict encoding strategy is active
    InvalidUtf8,
    /// File exceeds the configured size limit
    TooLarge,
}

impl ReadErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadErrorKind::Io => "IO_ERROR",
            ReadErrorKind::InvalidUtf8 => "INVALID_UTF8",
            ReadErrorKind::TooLarge => "FILE_TOO_LARGE",
        }
    }
}

impl fmt::Display for ReadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to read one source file
#[derive(Error, Debug)]
#[error("{kind}: {message}")]
pub struct ReadError {
    pub kind: ReadErrorKind,
    pub message: String,
}

impl ReadError {
    pub fn new(kind: ReadErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn io(err: &std::io::Error) -> Self {
        Self::new(ReadErrorKind::Io, err.to_string())
    }
}
