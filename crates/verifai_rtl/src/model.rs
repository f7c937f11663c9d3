//! The structured model extracted from an RTL source.
//!
//! Every type here is a plain value: built once by [`parse`](crate::parse),
//! never mutated afterwards, and freely shared by reference with any number of
//! downstream consumers (prompt builders, template contexts, SVA and coverage
//! tooling).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::protocol::Protocol;

/// Module name reported when no `module <name>` declaration is found.
pub const UNKNOWN_MODULE: &str = "unknown_module";

/// Width reported by [`ParsedRtl::data_width`] and [`ParsedRtl::addr_width`]
/// when no matching port exists.
pub const DEFAULT_BUS_WIDTH: u32 = 32;

const DATA_TOKENS: &[&str] = &["data", "wdata", "rdata", "din", "dout", "dat"];
const ADDR_TOKENS: &[&str] = &["addr", "address", "adr"];

// ============================================================================
// Ports
// ============================================================================

/// Port direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortDirection::Input => write!(f, "input"),
            PortDirection::Output => write!(f, "output"),
            PortDirection::Inout => write!(f, "inout"),
        }
    }
}

impl FromStr for PortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "input" => Ok(PortDirection::Input),
            "output" => Ok(PortDirection::Output),
            "inout" => Ok(PortDirection::Inout),
            other => Err(format!("unknown port direction '{other}'")),
        }
    }
}

/// The declared class of a port signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalClass {
    /// `wire`
    Wire,
    /// `reg`
    Reg,
    /// `logic`, also the default when no class keyword is given.
    #[default]
    Logic,
    /// `integer`
    Integer,
}

impl fmt::Display for SignalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalClass::Wire => write!(f, "wire"),
            SignalClass::Reg => write!(f, "reg"),
            SignalClass::Logic => write!(f, "logic"),
            SignalClass::Integer => write!(f, "integer"),
        }
    }
}

impl FromStr for SignalClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wire" => Ok(SignalClass::Wire),
            "reg" => Ok(SignalClass::Reg),
            "logic" => Ok(SignalClass::Logic),
            "integer" => Ok(SignalClass::Integer),
            other => Err(format!("unknown signal class '{other}'")),
        }
    }
}

/// One declared module port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// The port identifier.
    pub name: String,
    /// The port direction.
    pub direction: PortDirection,
    /// The declared signal class.
    pub signal_class: SignalClass,
    /// Whether the `signed` qualifier appeared.
    pub is_signed: bool,
    /// Bit count. 1 when no range is given or when the range is not literal.
    pub width: u32,
    /// Most significant bound, present only when both bounds are literals.
    pub msb: Option<u32>,
    /// Least significant bound, present only when both bounds are literals.
    pub lsb: Option<u32>,
}

impl Port {
    /// Returns the packed range as written in a declaration, or `""` for a
    /// single-bit port.
    pub fn width_str(&self) -> String {
        if self.width <= 1 {
            return String::new();
        }
        match (self.msb, self.lsb) {
            (Some(msb), Some(lsb)) => format!("[{msb}:{lsb}]"),
            _ => format!("[{}:0]", self.width - 1),
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.direction, self.signal_class)?;
        if self.is_signed {
            write!(f, " signed")?;
        }
        let range = self.width_str();
        if !range.is_empty() {
            write!(f, " {range}")?;
        }
        write!(f, " {}", self.name)
    }
}

// ============================================================================
// Parameters
// ============================================================================

/// Whether a parameter was declared with `parameter` or `localparam`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// `parameter`
    Parameter,
    /// `localparam`
    Localparam,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Parameter => write!(f, "parameter"),
            ParamKind::Localparam => write!(f, "localparam"),
        }
    }
}

/// One declared parameter or localparam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// The parameter name.
    pub name: String,
    /// The right-hand side exactly as written (trimmed, never evaluated).
    pub value: String,
    /// `parameter` or `localparam`.
    pub kind: ParamKind,
    /// Optional type annotation such as `int` or `logic`.
    pub declared_type: Option<String>,
}

// ============================================================================
// Clocks and resets
// ============================================================================

/// Polarity of a reset signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolarity {
    /// Reset is asserted when the signal is 1.
    ActiveHigh,
    /// Reset is asserted when the signal is 0.
    ActiveLow,
}

impl ResetPolarity {
    /// Returns `true` for [`ResetPolarity::ActiveLow`].
    pub fn is_active_low(self) -> bool {
        self == ResetPolarity::ActiveLow
    }
}

impl fmt::Display for ResetPolarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResetPolarity::ActiveHigh => write!(f, "active_high"),
            ResetPolarity::ActiveLow => write!(f, "active_low"),
        }
    }
}

/// The sensitivity edge of a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockEdge {
    /// Rising edge, the default for every detected clock.
    #[default]
    Posedge,
    /// Falling edge.
    Negedge,
}

impl fmt::Display for ClockEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockEdge::Posedge => write!(f, "posedge"),
            ClockEdge::Negedge => write!(f, "negedge"),
        }
    }
}

/// Clock and reset classification of a module's ports.
///
/// Every name in `reset_signals` has an entry in `reset_polarity`; every key of
/// `clock_edges` is drawn from `clock_signals`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockResetInfo {
    /// Ports classified as clocks, in port order.
    pub clock_signals: Vec<String>,
    /// Ports classified as resets, in port order.
    pub reset_signals: Vec<String>,
    /// Polarity of each reset signal.
    pub reset_polarity: BTreeMap<String, ResetPolarity>,
    /// Sensitivity edge of each clock signal.
    pub clock_edges: BTreeMap<String, ClockEdge>,
}

// ============================================================================
// FSM
// ============================================================================

/// State encoding style inferred for an FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FsmEncoding {
    /// Dense binary encoding (the default assumption).
    #[serde(rename = "binary")]
    Binary,
    /// One bit per state.
    #[serde(rename = "one-hot")]
    OneHot,
}

impl fmt::Display for FsmEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FsmEncoding::Binary => write!(f, "binary"),
            FsmEncoding::OneHot => write!(f, "one-hot"),
        }
    }
}

/// A detected finite-state machine. Only reported with two or more states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FsmInfo {
    /// The signal that holds the current state (best effort).
    pub state_signal: String,
    /// Distinct state labels.
    pub states: Vec<String>,
    /// `states.len()`.
    pub state_count: usize,
    /// Inferred encoding.
    pub encoding: FsmEncoding,
}

// ============================================================================
// Protocol hints
// ============================================================================

/// One scored protocol candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolHint {
    /// The candidate protocol.
    pub protocol: Protocol,
    /// Score in `[0, 1]`, rounded to two decimals.
    pub confidence: f64,
    /// Vocabulary entries found among the port names, in catalog order.
    pub matching_signals: Vec<String>,
    /// Short human-readable justification.
    pub reason: String,
}

// ============================================================================
// Aggregate
// ============================================================================

/// Everything extracted from one RTL source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRtl {
    /// The first declared module name, or [`UNKNOWN_MODULE`].
    pub module_name: String,
    /// Ports in order of appearance.
    pub ports: Vec<Port>,
    /// Parameters in order of appearance.
    pub parameters: Vec<Parameter>,
    /// Clock and reset classification.
    pub clocks: ClockResetInfo,
    /// The detected FSM, if any.
    pub fsm: Option<FsmInfo>,
    /// Protocol candidates sorted by descending confidence.
    pub protocol_hints: Vec<ProtocolHint>,
    /// The file the source was read from, when parsed via [`parse_file`](crate::parse_file).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
}

impl ParsedRtl {
    /// Ports declared with the given direction, in declaration order.
    pub fn ports_with_direction(&self, direction: PortDirection) -> Vec<&Port> {
        self.ports
            .iter()
            .filter(|p| p.direction == direction)
            .collect()
    }

    /// All `input` ports.
    pub fn input_ports(&self) -> Vec<&Port> {
        self.ports_with_direction(PortDirection::Input)
    }

    /// All `output` ports.
    pub fn output_ports(&self) -> Vec<&Port> {
        self.ports_with_direction(PortDirection::Output)
    }

    /// All `inout` ports.
    pub fn inout_ports(&self) -> Vec<&Port> {
        self.ports_with_direction(PortDirection::Inout)
    }

    /// Looks up a port by exact name.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Best-guess data bus width: the width of the first port whose name
    /// contains a data-like token, else [`DEFAULT_BUS_WIDTH`].
    pub fn data_width(&self) -> u32 {
        self.first_width_matching(DATA_TOKENS)
    }

    /// Best-guess address bus width, by the same rule as [`data_width`](Self::data_width)
    /// over address-like tokens.
    pub fn addr_width(&self) -> u32 {
        self.first_width_matching(ADDR_TOKENS)
    }

    fn first_width_matching(&self, tokens: &[&str]) -> u32 {
        self.ports
            .iter()
            .find(|p| {
                let lower = p.name.to_ascii_lowercase();
                tokens.iter().any(|t| lower.contains(t))
            })
            .map(|p| p.width)
            .unwrap_or(DEFAULT_BUS_WIDTH)
    }

    /// The highest-confidence protocol hint, if any.
    pub fn top_protocol(&self) -> Option<&ProtocolHint> {
        self.protocol_hints.first()
    }

    /// Polarity of the named reset signal, if it was classified as a reset.
    pub fn reset_polarity(&self, name: &str) -> Option<ResetPolarity> {
        self.clocks.reset_polarity.get(name).copied()
    }

    /// Returns `true` if the module name could not be determined.
    pub fn is_unknown_module(&self) -> bool {
        self.module_name == UNKNOWN_MODULE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(name: &str, direction: PortDirection, width: u32) -> Port {
        let (msb, lsb) = if width > 1 {
            (Some(width - 1), Some(0))
        } else {
            (None, None)
        };
        Port {
            name: name.to_string(),
            direction,
            signal_class: SignalClass::Logic,
            is_signed: false,
            width,
            msb,
            lsb,
        }
    }

    fn parsed(ports: Vec<Port>) -> ParsedRtl {
        ParsedRtl {
            module_name: "dut".to_string(),
            ports,
            parameters: Vec::new(),
            clocks: ClockResetInfo::default(),
            fsm: None,
            protocol_hints: Vec::new(),
            file_path: None,
        }
    }

    #[test]
    fn width_str_single_bit_is_empty() {
        assert_eq!(port("valid", PortDirection::Input, 1).width_str(), "");
    }

    #[test]
    fn width_str_uses_bounds() {
        let mut p = port("data", PortDirection::Input, 8);
        p.msb = Some(0);
        p.lsb = Some(7);
        assert_eq!(p.width_str(), "[0:7]");
    }

    #[test]
    fn port_display() {
        let mut p = port("count", PortDirection::Output, 4);
        p.signal_class = SignalClass::Reg;
        p.is_signed = true;
        assert_eq!(p.to_string(), "output reg signed [3:0] count");
    }

    #[test]
    fn direction_filters() {
        let rtl = parsed(vec![
            port("clk", PortDirection::Input, 1),
            port("q", PortDirection::Output, 1),
            port("sda", PortDirection::Inout, 1),
            port("d", PortDirection::Input, 1),
        ]);
        let inputs: Vec<_> = rtl.input_ports().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(inputs, vec!["clk", "d"]);
        assert_eq!(rtl.output_ports().len(), 1);
        assert_eq!(rtl.inout_ports()[0].name, "sda");
    }

    #[test]
    fn data_width_takes_first_match() {
        let rtl = parsed(vec![
            port("clk", PortDirection::Input, 1),
            port("wdata", PortDirection::Input, 16),
            port("rdata", PortDirection::Output, 64),
        ]);
        assert_eq!(rtl.data_width(), 16);
    }

    #[test]
    fn widths_default_to_32() {
        let rtl = parsed(vec![port("clk", PortDirection::Input, 1)]);
        assert_eq!(rtl.data_width(), DEFAULT_BUS_WIDTH);
        assert_eq!(rtl.addr_width(), DEFAULT_BUS_WIDTH);
    }

    #[test]
    fn addr_width_is_case_insensitive() {
        let rtl = parsed(vec![port("S_AXI_AWADDR", PortDirection::Input, 12)]);
        assert_eq!(rtl.addr_width(), 12);
    }

    #[test]
    fn enum_string_forms() {
        assert_eq!("INOUT".parse::<PortDirection>(), Ok(PortDirection::Inout));
        assert_eq!("Reg".parse::<SignalClass>(), Ok(SignalClass::Reg));
        assert!("tri".parse::<SignalClass>().is_err());
        assert_eq!(ResetPolarity::ActiveLow.to_string(), "active_low");
        assert_eq!(FsmEncoding::OneHot.to_string(), "one-hot");
        assert_eq!(
            serde_json::to_string(&FsmEncoding::OneHot).unwrap(),
            "\"one-hot\""
        );
    }
}
