//! Error types for scanning operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can end a scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The root path does not exist.
    #[error("Path not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Metadata or a directory listing failed in a way that cannot be skipped.
    #[error("Cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The caller asked the scan to stop.
    #[error("Scan cancelled")]
    Cancelled,
}

impl ScanError {
    /// Create an unreadable error with path context.
    pub fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Unreadable {
            path: path.into(),
            source,
        }
    }

    /// Whether this is the cancellation signal rather than a read failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The path the error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::NotFound { path } | Self::Unreadable { path, .. } => Some(path),
            Self::Cancelled => None,
        }
    }
}
