//! Error types for reading design descriptions.

use std::path::PathBuf;

/// Errors that can occur when loading a description file.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    /// The given path does not exist.
    #[error("description file not found: {}", path.display())]
    FileNotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read description {}: {source}", path.display())]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
