//! Structured view of a natural-language design description.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use verifai_rtl::Protocol;

/// Features every generated testbench carries.
pub const DEFAULT_FEATURES: &[&str] = &["scoreboard", "coverage", "sequences"];

/// Feature added when the description names at least one register.
pub const REGISTER_FEATURE: &str = "ral";

/// Software access policy of a register.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessType {
    /// Read-only.
    Ro,
    /// Read-write.
    #[default]
    Rw,
    /// Write-only.
    Wo,
    /// Write 1 to clear.
    W1c,
    /// Write 1 to set.
    W1s,
}

impl AccessType {
    /// The conventional upper-case tag, e.g. `RO`.
    pub fn as_str(self) -> &'static str {
        match self {
            AccessType::Ro => "RO",
            AccessType::Rw => "RW",
            AccessType::Wo => "WO",
            AccessType::W1c => "W1C",
            AccessType::W1s => "W1S",
        }
    }

    /// Whether software writes have an effect.
    pub fn is_writable(self) -> bool {
        !matches!(self, AccessType::Ro)
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessType {
    type Err = String;

    /// Accepts the tags and the spelled-out forms `read-only`, `read only`,
    /// `readonly` (and likewise for `write-only` and `read-write`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squashed: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | ' ' | '_'))
            .collect::<String>()
            .to_ascii_uppercase();
        match squashed.as_str() {
            "RO" | "READONLY" => Ok(AccessType::Ro),
            "RW" | "READWRITE" => Ok(AccessType::Rw),
            "WO" | "WRITEONLY" => Ok(AccessType::Wo),
            "W1C" => Ok(AccessType::W1c),
            "W1S" => Ok(AccessType::W1s),
            _ => Err(format!("unknown access type '{s}'")),
        }
    }
}

/// One register named in a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    /// Register name, upper-cased.
    pub name: String,
    /// Byte address.
    pub address: u64,
    /// Access policy; `RW` unless stated.
    pub access: AccessType,
}

/// Everything the quick parser recovers from a description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSpec {
    /// Interface protocol of the design.
    pub protocol: Protocol,
    /// Module name, or `<protocol>_dut` when none is given.
    pub module_name: String,
    /// Data bus width in bits.
    pub data_width: u32,
    /// Address bus width in bits.
    pub addr_width: u32,
    /// Registers in the order they appear.
    pub registers: Vec<Register>,
    /// Testbench features to generate.
    pub features: Vec<String>,
    /// Clock port name.
    pub clock_name: String,
    /// Reset port name.
    pub reset_name: String,
    /// Whether the reset is active low.
    pub reset_active_low: bool,
}

impl ParsedSpec {
    /// Looks up a register by name, ignoring case.
    pub fn register(&self, name: &str) -> Option<&Register> {
        self.registers
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// Whether `feature` is enabled.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }
}
