//! Heuristic bug prediction and testbench quality scoring.

use serde::{Deserialize, Serialize};
use std::fmt;

use verifai_rtl::{ParsedRtl, Protocol};

/// Most predictions [`predict_bugs`] returns.
pub const MAX_PREDICTIONS: usize = 5;

/// Testbench components looked for by [`quality_score`].
pub const TESTBENCH_COMPONENTS: &[&str] = &[
    "interface",
    "driver",
    "monitor",
    "scoreboard",
    "coverage",
    "agent",
    "env",
    "sequence",
    "test",
];

/// How much a predicted bug matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Likely to break functionality.
    High,
    /// Likely to surface under specific traffic.
    Medium,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
        }
    }
}

/// A likely verification issue for a design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BugPrediction {
    /// Impact.
    pub severity: Severity,
    /// Short title.
    pub title: String,
    /// What to look out for.
    pub description: String,
}

impl BugPrediction {
    fn new(severity: Severity, title: &str, description: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.to_string(),
            description: description.into(),
        }
    }
}

/// Predicts common bugs from the design's protocol, FSM, resets, and data
/// width. Returns at most [`MAX_PREDICTIONS`].
pub fn predict_bugs(rtl: &ParsedRtl) -> Vec<BugPrediction> {
    use Severity::*;

    let mut bugs = Vec::new();
    match rtl.top_protocol().map(|hint| hint.protocol) {
        Some(Protocol::Apb) => {
            bugs.push(BugPrediction::new(
                High,
                "PREADY Timing",
                "APB slave may not handle PREADY deasserted case properly - ensure wait state testing",
            ));
            bugs.push(BugPrediction::new(
                Medium,
                "Back-to-Back Transactions",
                "Sequential transactions without idle cycles may cause data corruption",
            ));
        }
        Some(Protocol::Axi4Lite | Protocol::Axi4) => {
            bugs.push(BugPrediction::new(
                High,
                "Handshake Deadlock",
                "AXI VALID/READY handshake may deadlock if VALID waits for READY",
            ));
            bugs.push(BugPrediction::new(
                Medium,
                "Outstanding Transactions",
                "Multiple outstanding transactions may cause response ordering issues",
            ));
        }
        Some(Protocol::Spi) => bugs.push(BugPrediction::new(
            High,
            "Clock Phase/Polarity",
            "SPI mode mismatch (CPOL/CPHA) causes bit-shifted data",
        )),
        Some(Protocol::Uart) => bugs.push(BugPrediction::new(
            Medium,
            "Baud Rate Mismatch",
            "Clock frequency drift may cause framing errors",
        )),
        Some(Protocol::I2c) => bugs.push(BugPrediction::new(
            High,
            "Clock Stretching",
            "Slave clock stretching not handled may cause data loss",
        )),
        Some(Protocol::Wishbone) => bugs.push(BugPrediction::new(
            Medium,
            "Missing Acknowledge",
            "A cycle without ACK stalls the master - ensure timeout and retry testing",
        )),
        None => {}
    }

    if let Some(fsm) = rtl.fsm.as_ref().filter(|fsm| fsm.state_count > 2) {
        bugs.push(BugPrediction::new(
            High,
            "FSM Deadlock",
            format!(
                "FSM with {} states may have unreachable states or deadlock conditions",
                fsm.state_count
            ),
        ));
    }

    if !rtl.clocks.reset_signals.is_empty() {
        bugs.push(BugPrediction::new(
            Medium,
            "Reset Race Condition",
            "Async reset release near clock edge may cause metastability",
        ));
    }

    let data_width = rtl.data_width();
    if data_width >= 32 {
        bugs.push(BugPrediction::new(
            Medium,
            "Data Bus Boundary",
            format!("{data_width}-bit data may have byte lane issues on partial writes"),
        ));
    }

    bugs.truncate(MAX_PREDICTIONS);
    bugs
}

/// Points per scoring area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityBreakdown {
    /// Up to 40, by share of [`TESTBENCH_COMPONENTS`] mentioned.
    pub completeness: u32,
    /// 20 when a protocol was recognized in the design, else 10.
    pub protocol: u32,
    /// 20 for covergroups or coverpoints, 10 for any coverage mention, else 5.
    pub coverage: u32,
    /// 5 each for `uvm_info`, `uvm_error`, UVM macros, and a virtual interface.
    pub quality: u32,
}

/// A 0 to 100 estimate of how complete a generated testbench is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityScore {
    /// Sum of the breakdown, capped at 100.
    pub score: u32,
    /// Per-area points.
    pub breakdown: QualityBreakdown,
}

/// Scores generated testbench text by keyword presence.
pub fn quality_score(rtl: &ParsedRtl, generated: &str) -> QualityScore {
    let lower = generated.to_ascii_lowercase();

    let found = TESTBENCH_COMPONENTS
        .iter()
        .filter(|c| lower.contains(*c))
        .count() as u32;
    let completeness = found * 40 / TESTBENCH_COMPONENTS.len() as u32;

    let protocol = if rtl.top_protocol().is_some() { 20 } else { 10 };

    let coverage = if lower.contains("covergroup") || lower.contains("coverpoint") {
        20
    } else if lower.contains("coverage") {
        10
    } else {
        5
    };

    let quality = [
        lower.contains("uvm_info"),
        lower.contains("uvm_error"),
        generated.contains("`uvm_"),
        lower.contains("virtual interface"),
    ]
    .iter()
    .filter(|hit| **hit)
    .count() as u32
        * 5;

    let breakdown = QualityBreakdown {
        completeness,
        protocol,
        coverage,
        quality,
    };
    QualityScore {
        score: (completeness + protocol + coverage + quality).min(100),
        breakdown,
    }
}
