//! Clock and reset classification.
//!
//! Ports are classified by name against fixed vocabularies of word-bounded
//! patterns, then clock edges are refined from `always @(posedge|negedge x)`
//! headers found in the text. Text evidence overrides the `posedge` default.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::{ClockEdge, ClockResetInfo, Port, ResetPolarity};

/// Clock-name patterns, tested against lowercased port names.
const CLOCK_PATTERNS: &[&str] = &[
    r"\bclk\b",
    r"\bclock\b",
    r"\bclk_i\b",
    r"\bsys_clk\b",
    r"\bpclk\b",
    r"\baclk\b",
    r"\bhclk\b",
    r"\bfclk\b",
    r"\bclk_in\b",
    r"\bmaster_clk\b",
    // Domain-qualified forms: clk_a, clk_core, i_clk, core_clk.
    r"^clk_[a-z0-9]+$",
    r"^[a-z0-9_]+_clk$",
];

/// Tags that make `clk_<tag>` a clock-control signal rather than a clock.
const NON_CLOCK_TAGS: &[&str] = &[
    "en", "enable", "div", "sel", "gate", "cnt", "count", "sync", "req", "ack", "lock", "locked",
    "stop", "valid",
];

/// Reset-name patterns with their polarity. First match wins.
const RESET_PATTERNS: &[(&str, ResetPolarity)] = &[
    (r"\brst\b", ResetPolarity::ActiveHigh),
    (r"\breset\b", ResetPolarity::ActiveHigh),
    (r"\brst_n\b", ResetPolarity::ActiveLow),
    (r"\bresn\b", ResetPolarity::ActiveLow),
    (r"\breset_n\b", ResetPolarity::ActiveLow),
    (r"\brstn\b", ResetPolarity::ActiveLow),
    (r"\bareset_n\b", ResetPolarity::ActiveLow),
    (r"\bpreset_n\b", ResetPolarity::ActiveLow),
    (r"\bsys_rst\b", ResetPolarity::ActiveHigh),
    (r"\bsys_rst_n\b", ResetPolarity::ActiveLow),
    (r"\bpresetn\b", ResetPolarity::ActiveLow),
    (r"\baresetn\b", ResetPolarity::ActiveLow),
    (r"\bhresetn\b", ResetPolarity::ActiveLow),
    (r"\brst_ni\b", ResetPolarity::ActiveLow),
    (r"\bresetn\b", ResetPolarity::ActiveLow),
    (r"\barst_n\b", ResetPolarity::ActiveLow),
    // Prefixed forms: core_rst_n, s_axi_aresetn, i_rst.
    (r"_(?:rst_n|reset_n|rstn|a?resetn)$", ResetPolarity::ActiveLow),
    (r"_(?:rst|reset)$", ResetPolarity::ActiveHigh),
];

lazy_static! {
    static ref CLOCK_RES: Vec<Regex> = CLOCK_PATTERNS
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect();
    static ref RESET_RES: Vec<(Regex, ResetPolarity)> = RESET_PATTERNS
        .iter()
        .map(|(p, pol)| (Regex::new(p).unwrap(), *pol))
        .collect();
    static ref EDGE_HEADER: Regex =
        Regex::new(r"(?i)\balways(?:_ff)?\s*@\s*\(\s*(posedge|negedge)\s+(\w+)").unwrap();
}

/// Returns `true` if `name` matches the clock vocabulary.
pub fn is_clock_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    if let Some(tag) = lower.strip_prefix("clk_") {
        if NON_CLOCK_TAGS.contains(&tag) {
            return false;
        }
    }
    CLOCK_RES.iter().any(|re| re.is_match(&lower))
}

/// Returns the polarity of the first reset rule matching `name`, if any.
pub fn reset_polarity_for(name: &str) -> Option<ResetPolarity> {
    let lower = name.to_ascii_lowercase();
    RESET_RES
        .iter()
        .find(|(re, _)| re.is_match(&lower))
        .map(|(_, polarity)| *polarity)
}

/// Classifies `ports` into clocks and resets and infers clock edges from
/// sequential-block headers in `text` (which should be comment-stripped).
///
/// Zero clocks or zero resets are valid results.
pub fn detect_clocks_resets(ports: &[Port], text: &str) -> ClockResetInfo {
    let mut clock_signals = Vec::new();
    let mut clock_edges = BTreeMap::new();
    let mut reset_signals = Vec::new();
    let mut reset_polarity = BTreeMap::new();

    for port in ports {
        if is_clock_name(&port.name) {
            clock_signals.push(port.name.clone());
            clock_edges.insert(port.name.clone(), ClockEdge::default());
        }
    }

    for port in ports {
        if let Some(polarity) = reset_polarity_for(&port.name) {
            reset_signals.push(port.name.clone());
            reset_polarity.insert(port.name.clone(), polarity);
        }
    }

    for cap in EDGE_HEADER.captures_iter(text) {
        let edge = if cap[1].eq_ignore_ascii_case("negedge") {
            ClockEdge::Negedge
        } else {
            ClockEdge::Posedge
        };
        let signal = &cap[2];
        if let Some(clock) = clock_signals
            .iter()
            .find(|c| c.eq_ignore_ascii_case(signal))
        {
            tracing::trace!(clock = %clock, %edge, "clock edge from sensitivity list");
            clock_edges.insert(clock.clone(), edge);
        }
    }

    ClockResetInfo {
        clock_signals,
        reset_signals,
        reset_polarity,
        clock_edges,
    }
}
