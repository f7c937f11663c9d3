//! Finite-state-machine detection.
//!
//! Two strategies are tried in order and never merged:
//!
//! 1. The first `typedef enum ... { ... }` declaration supplies the labels.
//! 2. Otherwise, `parameter`/`localparam` names containing `STATE`, `ST_`,
//!    `IDLE` or `INIT` (case-insensitive) are collected, deduplicated, in
//!    order of first appearance.
//!
//! An FSM is reported only with two or more labels.
//!
//! The encoding check is deliberately coarse: any 4- or 8-bit literal shaped
//! like a one-hot value *anywhere* in the text marks the FSM as one-hot. It is
//! not scoped to the state machine, and it only runs for FSMs of at most eight
//! states.

use lazy_static::lazy_static;
use regex::Regex;

use crate::model::{FsmEncoding, FsmInfo};

/// Fallback state-register name when no assignment or declaration names one.
pub const DEFAULT_STATE_SIGNAL: &str = "state";

/// Largest state count for which the one-hot literal check runs.
const ONE_HOT_MAX_STATES: usize = 8;

lazy_static! {
    static ref ENUM_DECL: Regex =
        Regex::new(r"(?i)\btypedef\s+enum[^{]*\{([^}]+)\}\s*(\w*)").unwrap();
    static ref STATE_PARAM: Regex = Regex::new(
        r"(?i)\b(?:parameter|localparam)\s+(\w*(?:STATE|ST_|IDLE|INIT)\w*)\s*="
    )
    .unwrap();
    static ref STATE_ASSIGN: Regex = Regex::new(r"(?i)\b(\w*state\w*)\s*<=").unwrap();
    static ref ONE_HOT_LITERAL: Regex =
        Regex::new(r"(?i)\b[48]'b0*1|\b[48]'h0*[1248]0*\b").unwrap();
}

/// Detects an FSM in comment-stripped `text`.
pub fn detect_fsm(text: &str) -> Option<FsmInfo> {
    let (states, enum_type) = match enum_states(text) {
        Some((states, type_name)) => {
            tracing::trace!(count = states.len(), "fsm states from enum");
            (states, type_name)
        }
        None => {
            let states = parameter_states(text);
            tracing::trace!(count = states.len(), "fsm states from parameters");
            (states, None)
        }
    };

    if states.len() < 2 {
        return None;
    }

    let state_signal = assigned_state_signal(text)
        .or_else(|| enum_type.and_then(|ty| declared_variable(text, &ty)))
        .unwrap_or_else(|| DEFAULT_STATE_SIGNAL.to_string());

    let encoding = if states.len() <= ONE_HOT_MAX_STATES && ONE_HOT_LITERAL.is_match(text) {
        FsmEncoding::OneHot
    } else {
        FsmEncoding::Binary
    };

    Some(FsmInfo {
        state_signal,
        state_count: states.len(),
        states,
        encoding,
    })
}

/// Labels of the first enum declaration and its type name, if any.
fn enum_states(text: &str) -> Option<(Vec<String>, Option<String>)> {
    let cap = ENUM_DECL.captures(text)?;
    let mut states: Vec<String> = Vec::new();
    for item in cap[1].split(',') {
        let label = item.split('=').next().unwrap_or_default().trim();
        if !label.is_empty() && !states.iter().any(|s| s == label) {
            states.push(label.to_string());
        }
    }
    let type_name = cap
        .get(2)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    Some((states, type_name))
}

fn parameter_states(text: &str) -> Vec<String> {
    let mut states: Vec<String> = Vec::new();
    for cap in STATE_PARAM.captures_iter(text) {
        let name = &cap[1];
        if !states.iter().any(|s| s == name) {
            states.push(name.to_string());
        }
    }
    states
}

/// The left-hand side of the first non-blocking assignment to a state-like signal.
fn assigned_state_signal(text: &str) -> Option<String> {
    STATE_ASSIGN.captures(text).map(|cap| cap[1].to_string())
}

/// The first variable declared with the enum's type, e.g. `state` in
/// `state_t state, next_state;`.
fn declared_variable(text: &str, type_name: &str) -> Option<String> {
    let pattern = format!(r"\b{}\s+(\w+)", regex::escape(type_name));
    let re = Regex::new(&pattern).ok()?;
    re.captures(text).map(|cap| cap[1].to_string())
}
