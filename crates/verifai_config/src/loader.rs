//! Configuration file discovery, loading, and validation.
//!
//! Protocol option tables may name a `preset`; the preset is expanded first
//! and the table's explicit keys are laid over it before deserialization.

use crate::error::ConfigError;
use crate::types::{I2cOptions, SpiOptions, UartOptions, VerifaiConfig};
use std::path::{Path, PathBuf};

/// The configuration file name searched for by [`find_config`].
pub const CONFIG_FILE_NAME: &str = "verifai.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<VerifaiConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "loading configuration");
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<VerifaiConfig, ConfigError> {
    let mut raw: toml::Table = content
        .parse()
        .map_err(|e: toml::de::Error| ConfigError::ParseError(e.to_string()))?;
    expand_presets(&mut raw)?;
    let config: VerifaiConfig = toml::Value::Table(raw)
        .try_into()
        .map_err(|e: toml::de::Error| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Walks up from `start` looking for [`CONFIG_FILE_NAME`].
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Resolves the effective configuration.
///
/// An explicit path must exist. Otherwise the nearest `verifai.toml` at or
/// above `start` is used, and built-in defaults apply when there is none.
/// Returns the configuration and the file it came from.
pub fn discover(
    explicit: Option<&Path>,
    start: &Path,
) -> Result<(VerifaiConfig, Option<PathBuf>), ConfigError> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config(start),
    };
    match path {
        Some(path) => Ok((load_config(&path)?, Some(path))),
        None => {
            tracing::debug!("no {CONFIG_FILE_NAME} found, using defaults");
            Ok((VerifaiConfig::default(), None))
        }
    }
}

type PresetFn = fn(&str) -> Result<Option<toml::Value>, ConfigError>;

fn preset_value<T: serde::Serialize>(preset: Option<T>) -> Result<Option<toml::Value>, ConfigError> {
    preset
        .map(|p| toml::Value::try_from(p).map_err(|e| ConfigError::ParseError(e.to_string())))
        .transpose()
}

/// Replaces `preset = "<name>"` in each protocol option table with the
/// preset's fields, keeping explicitly given keys.
fn expand_presets(raw: &mut toml::Table) -> Result<(), ConfigError> {
    let tables: [(&str, &[&str], PresetFn); 3] = [
        ("uart", UartOptions::PRESETS, |n| preset_value(UartOptions::preset(n))),
        ("spi", SpiOptions::PRESETS, |n| preset_value(SpiOptions::preset(n))),
        ("i2c", I2cOptions::PRESETS, |n| preset_value(I2cOptions::preset(n))),
    ];

    let Some(protocol) = raw.get_mut("protocol").and_then(toml::Value::as_table_mut) else {
        return Ok(());
    };

    for (key, names, lookup) in tables {
        let Some(table) = protocol.get_mut(key).and_then(toml::Value::as_table_mut) else {
            continue;
        };
        let Some(preset) = table.remove("preset") else {
            continue;
        };
        let name = preset.as_str().ok_or_else(|| {
            ConfigError::ValidationError(format!("protocol.{key}.preset must be a string"))
        })?;
        let Some(toml::Value::Table(mut base)) = lookup(name)? else {
            return Err(ConfigError::UnknownPreset {
                protocol: key.to_string(),
                name: name.to_string(),
                available: names.join(", "),
            });
        };
        tracing::debug!(table = key, preset = name, "expanding protocol preset");
        base.extend(std::mem::take(table));
        *table = base;
    }
    Ok(())
}

/// Validates value ranges.
fn validate_config(config: &VerifaiConfig) -> Result<(), ConfigError> {
    let invalid = |msg: String| Err(ConfigError::ValidationError(msg));

    let target = config.analysis.coverage_target;
    if !(0.0..=100.0).contains(&target) {
        return invalid(format!(
            "analysis.coverage_target must be within 0-100, got {target}"
        ));
    }

    if let Some(uart) = &config.protocol.uart {
        if !(5..=8).contains(&uart.data_bits) {
            return invalid(format!(
                "protocol.uart.data_bits must be 5-8, got {}",
                uart.data_bits
            ));
        }
        if ![1.0, 1.5, 2.0].contains(&uart.stop_bits) {
            return invalid(format!(
                "protocol.uart.stop_bits must be 1, 1.5, or 2, got {}",
                uart.stop_bits
            ));
        }
        if uart.baud_rate == 0 {
            return invalid("protocol.uart.baud_rate must be positive".to_string());
        }
    }

    if let Some(spi) = &config.protocol.spi {
        if spi.spi_mode > 3 {
            return invalid(format!("protocol.spi.spi_mode must be 0-3, got {}", spi.spi_mode));
        }
        if spi.num_slaves == 0 {
            return invalid("protocol.spi.num_slaves must be at least 1".to_string());
        }
    }

    if let Some(i2c) = &config.protocol.i2c {
        if i2c.address_bits != 7 && i2c.address_bits != 10 {
            return invalid(format!(
                "protocol.i2c.address_bits must be 7 or 10, got {}",
                i2c.address_bits
            ));
        }
        if i2c.clock_frequency == 0 {
            return invalid("protocol.i2c.clock_frequency must be positive".to_string());
        }
    }

    Ok(())
}
