//! Heuristic structural extraction for Verilog/SystemVerilog RTL.
//!
//! This crate turns raw RTL source text into a [`ParsedRtl`]: module name,
//! ports with widths, parameters, clock and reset classification, an optional
//! FSM description, and ranked protocol hints. The main entry point is
//! [`parse`], a pure function of its input; [`parse_file`] wraps it for files.
//!
//! Extraction is best-effort pattern matching over comment-stripped text, not
//! a grammar. Unrecognized constructs yield empty or default fields, never an
//! error.
//!
//! # Architecture
//!
//! - **Comment stripping** ([`strip`]): removes `//` and `/* */` comments.
//! - **Declarations** ([`decl`]): module name, parameters, ports.
//! - **Clocks and resets** ([`clock_reset`]): name vocabularies plus
//!   sensitivity-list edge refinement.
//! - **FSM** ([`fsm`]): enum or parameter state sets and encoding.
//! - **Protocols** ([`protocol`]): catalog scoring over port names.
//! - **Summary** ([`summary`]): a flat view for reports and JSON output.

#![warn(missing_docs)]

/// Clock and reset classification.
pub mod clock_reset;
/// Module, parameter, and port extraction.
pub mod decl;
/// Error types.
pub mod error;
/// FSM detection.
pub mod fsm;
/// The extracted data model.
pub mod model;
/// Protocol catalog and classifier.
pub mod protocol;
/// Comment removal.
pub mod strip;
/// Flat summaries.
pub mod summary;

pub use error::RtlError;
pub use model::{
    ClockEdge, ClockResetInfo, FsmEncoding, FsmInfo, ParamKind, Parameter, ParsedRtl, Port,
    PortDirection, ProtocolHint, ResetPolarity, SignalClass, DEFAULT_BUS_WIDTH, UNKNOWN_MODULE,
};
pub use protocol::{Protocol, CONFIDENCE_FLOOR};
pub use summary::{analyze, RtlSummary};

use std::path::Path;

/// Parses RTL source text into a [`ParsedRtl`].
///
/// Comments are stripped first; every extractor then runs on the stripped
/// text. Clock/reset detection and protocol classification consume the port
/// list. No pass sees another's output beyond that.
pub fn parse(text: &str) -> ParsedRtl {
    let stripped = strip::strip_comments(text);

    let module_name = decl::extract_module_name(&stripped);
    let parameters = decl::extract_parameters(&stripped);
    let ports = decl::extract_ports(&stripped);
    let clocks = clock_reset::detect_clocks_resets(&ports, &stripped);
    let fsm = fsm::detect_fsm(&stripped);
    let protocol_hints = protocol::classify_protocols(&ports);

    tracing::debug!(
        module = %module_name,
        ports = ports.len(),
        parameters = parameters.len(),
        clocks = clocks.clock_signals.len(),
        resets = clocks.reset_signals.len(),
        fsm = fsm.is_some(),
        hints = protocol_hints.len(),
        "parsed RTL"
    );

    ParsedRtl {
        module_name,
        ports,
        parameters,
        clocks,
        fsm,
        protocol_hints,
        file_path: None,
    }
}

/// Reads `path` and parses its contents with [`parse`].
///
/// The returned model records the path in [`ParsedRtl::file_path`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParsedRtl, RtlError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(RtlError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let text = std::fs::read_to_string(path).map_err(|source| RtlError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut parsed = parse(&text);
    parsed.file_path = Some(path.to_path_buf());
    Ok(parsed)
}
