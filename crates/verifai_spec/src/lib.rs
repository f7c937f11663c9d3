//! Offline extraction of design intent from natural-language descriptions.
//!
//! A request such as "APB slave named gpio_top with 16-bit address space,
//! STATUS at 0x00 (RO) and CTRL at 0x04" is reduced to a [`ParsedSpec`]:
//! protocol, module name, bus widths, and a register map. Extraction is
//! keyword and pattern matching only; no text generator is consulted.
//!
//! # Architecture
//!
//! - **Model** ([`model`]): [`ParsedSpec`], [`Register`], [`AccessType`].
//! - **Parsing** ([`parse`]): protocol keywords, names, widths, registers.

#![warn(missing_docs)]

/// Error types.
pub mod error;
/// The extracted description model.
pub mod model;
/// Keyword and pattern extraction.
pub mod parse;

pub use error::SpecError;
pub use model::{AccessType, ParsedSpec, Register, DEFAULT_FEATURES, REGISTER_FEATURE};
pub use parse::{detect_protocol, parse_spec};

use std::path::Path;

/// Reads `path` and extracts its contents with [`parse_spec`].
pub fn parse_spec_file(path: impl AsRef<Path>) -> Result<ParsedSpec, SpecError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SpecError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| SpecError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_spec(&text))
}
