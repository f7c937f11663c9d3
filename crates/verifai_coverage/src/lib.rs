//! Functional coverage analysis for SystemVerilog testbenches.
//!
//! Reads simulator coverage reports, finds bins that still need stimulus,
//! and emits UVM sequences that target them.
//!
//! # Architecture
//!
//! - **Model** ([`model`]): covergroups, coverpoints, crosses, bins, gaps.
//! - **Readers** ([`parse`]): JSON, simple text, and `hits/goal` summaries
//!   with format auto-detection.
//! - **Analysis** ([`analyze`]): target-based and keyword-based gap finding
//!   plus a stimulus suggestion table.
//! - **Emission** ([`emit`]): UVM closure sequences and a text report.

#![warn(missing_docs)]

/// Gap analysis and stimulus suggestion.
pub mod analyze;
/// Sequence and report generation.
pub mod emit;
/// Error types.
pub mod error;
/// Coverage data model.
pub mod model;
/// Report readers.
pub mod parse;

pub use analyze::{
    analyze, analyze_coverage, analyze_file, find_gaps, keyword_priority, suggest_stimulus,
    DEFAULT_TARGET,
};
pub use emit::{generate_closure_sequences, generate_report, gap_to_suggestion, DEFAULT_CLOSURE_LIMIT};
pub use error::CoverageError;
pub use model::{
    BinStatus, CoverPoint, CoverageBin, CoverageGap, CoverageReport, Covergroup, CrossCoverage,
    Priority, SuggestedSequence,
};
pub use parse::{detect_format, parse_report, parse_text_summary, ReportFormat};
