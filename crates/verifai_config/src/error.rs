//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `verifai.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A protocol option table named a preset that does not exist.
    #[error("unknown {protocol} preset '{name}' (available: {available})")]
    UnknownPreset {
        /// The option table (`uart`, `spi`, `i2c`).
        protocol: String,
        /// The requested preset.
        name: String,
        /// Comma-separated preset names for the table.
        available: String,
    },

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_unknown_preset() {
        let err = ConfigError::UnknownPreset {
            protocol: "spi".to_string(),
            name: "turbo".to_string(),
            available: "standard, fast".to_string(),
        };
        assert_eq!(
            format!("{err}"),
            "unknown spi preset 'turbo' (available: standard, fast)"
        );
    }

    #[test]
    fn display_parse_error() {
        let err = ConfigError::ParseError("expected '=' at line 3".to_string());
        assert_eq!(
            format!("{err}"),
            "failed to parse configuration: expected '=' at line 3"
        );
    }

    #[test]
    fn display_validation_error() {
        let err = ConfigError::ValidationError("uart.data_bits must be 5-8".to_string());
        assert_eq!(format!("{err}"), "validation error: uart.data_bits must be 5-8");
    }

    #[test]
    fn display_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = ConfigError::IoError(io_err);
        assert!(format!("{err}").starts_with("failed to read configuration:"));
    }
}
