//! Error types for coverage report handling.

use std::path::PathBuf;

/// Errors that can occur while reading or parsing a coverage report.
#[derive(Debug, thiserror::Error)]
pub enum CoverageError {
    /// The report file could not be read.
    #[error("failed to read coverage report {}: {source}", path.display())]
    Io {
        /// The report path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A JSON report did not deserialize.
    #[error("invalid JSON coverage report: {0}")]
    InvalidJson(String),

    /// An unrecognized report format name was requested.
    #[error("unknown coverage format '{0}' (expected auto, json, vcs, questa, simple, or summary)")]
    UnknownFormat(String),
}

impl From<serde_json::Error> for CoverageError {
    fn from(err: serde_json::Error) -> Self {
        CoverageError::InvalidJson(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_format() {
        let err = CoverageError::UnknownFormat("xml".into());
        assert!(format!("{err}").starts_with("unknown coverage format 'xml'"));
    }

    #[test]
    fn display_invalid_json() {
        let err: CoverageError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(format!("{err}").starts_with("invalid JSON coverage report:"));
    }

    #[test]
    fn display_io() {
        let err = CoverageError::Io {
            path: PathBuf::from("cov/report.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(format!("{err}"), "failed to read coverage report cov/report.txt: gone");
    }
}
