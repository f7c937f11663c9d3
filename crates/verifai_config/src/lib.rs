//! Parsing and validation of `verifai.toml` project configuration files.
//!
//! The file is optional: [`discover`] falls back to built-in defaults when
//! none is found. Protocol option tables (`[protocol.uart]`,
//! `[protocol.spi]`, `[protocol.i2c]`) may be seeded from named presets.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{discover, find_config, load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
