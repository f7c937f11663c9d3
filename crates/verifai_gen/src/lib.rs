//! Artifacts built on top of a parsed design.
//!
//! Everything here consumes a [`verifai_rtl::ParsedRtl`] and produces text
//! or structured data for downstream tools: a testbench request for an
//! external text generator, a template context, timing diagrams, heuristic
//! insights, and the on-disk testbench bundle.
//!
//! # Architecture
//!
//! - **Prompt** ([`prompt`]): the natural-language testbench request.
//! - **Oracle** ([`oracle`]): the [`TextOracle`] seam and reply cleanup.
//! - **Context** ([`context`]): flat template variables.
//! - **WaveDrom** ([`wavedrom`]): per-protocol timing diagrams.
//! - **Insights** ([`insights`]): bug prediction and quality scoring.
//! - **Bundle** ([`bundle`]): the delivered file set.

#![warn(missing_docs)]

/// Testbench bundle layout and writing.
pub mod bundle;
/// Template context construction.
pub mod context;
/// Error types.
pub mod error;
/// Bug prediction and quality scoring.
pub mod insights;
/// The text-generation interface.
pub mod oracle;
/// Testbench request text.
pub mod prompt;
/// Timing diagrams.
pub mod wavedrom;

pub use bundle::{placeholder_package, BundleFile, TestbenchBundle};
pub use context::{TemplateContext, DEFAULT_RESET, GENERIC_PROTOCOL};
pub use error::GenError;
pub use insights::{
    predict_bugs, quality_score, BugPrediction, QualityBreakdown, QualityScore, Severity,
};
pub use oracle::{generate_testbench, strip_code_fence, TextOracle};
pub use prompt::{build_testbench_prompt, SYSTEM_PROMPT};
pub use wavedrom::wavedrom;
