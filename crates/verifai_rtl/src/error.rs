//! Error types for reading RTL sources.
//!
//! Parsing itself never fails: unrecognized constructs degrade to empty or
//! default-valued fields. Only getting the text in the first place can fail.

use std::path::PathBuf;

/// Errors that can occur when loading an RTL file for analysis.
#[derive(Debug, thiserror::Error)]
pub enum RtlError {
    /// The given path does not exist.
    #[error("RTL file not found: {}", path.display())]
    FileNotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("failed to read RTL file {}: {source}", path.display())]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_file_not_found() {
        let err = RtlError::FileNotFound {
            path: PathBuf::from("rtl/missing.sv"),
        };
        assert_eq!(format!("{err}"), "RTL file not found: rtl/missing.sv");
    }

    #[test]
    fn display_io_error() {
        let err = RtlError::Io {
            path: PathBuf::from("rtl/top.v"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let display = format!("{err}");
        assert!(display.starts_with("failed to read RTL file rtl/top.v:"));
    }
}
