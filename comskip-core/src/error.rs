use std::path::PathBuf;

use thiserror::Error;

/// Why a marker file could not be turned into skip intervals.
#[derive(Error, Debug)]
pub enum MarkerError {
    #[error("marker file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("malformed marker file {path} at line {line}: {reason}")]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("failed to read marker file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MarkerError {
    /// Absent files are the normal trigger for the chapter fallback.
    pub fn is_not_found(&self) -> bool {
        matches!(self, MarkerError::NotFound { .. })
    }
}

#[derive(Error, Debug)]
pub enum SkipperError {
    #[error(transparent)]
    Marker(#[from] MarkerError),

    #[error("Library error: {0}")]
    Library(String),

    #[error("Session command failed: {0}")]
    Command(String),

    #[error("Skipper runtime is not running")]
    NotRunning,
}

pub type Result<T> = std::result::Result<T, SkipperError>;
