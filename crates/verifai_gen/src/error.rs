//! Error types for generation.

use std::path::PathBuf;

/// Errors that can occur while generating or writing testbench artifacts.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// The text oracle failed.
    #[error("text generation failed: {0}")]
    Oracle(String),

    /// The text oracle returned nothing usable.
    #[error("text generation returned an empty response")]
    EmptyResponse,

    /// A bundle file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// The file or directory being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
