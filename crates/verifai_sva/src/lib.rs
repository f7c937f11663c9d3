//! SystemVerilog assertion generation.
//!
//! Given the structure extracted by `verifai_rtl`, this crate produces a
//! checker module (`<module>_sva`) with reset, stability, protocol, and FSM
//! properties, plus a `bind` statement that attaches it to the design.
//!
//! # Architecture
//!
//! - **Model** ([`model`]): properties, categories, directives, and the
//!   checker module with its SystemVerilog rendering.
//! - **Generator** ([`generator`]): clock/reset resolution and the property
//!   families.

#![warn(missing_docs)]

/// Property generation.
pub mod generator;
/// Assertion data model.
pub mod model;

pub use generator::{generate_sva_from_parsed, SvaGenerator, DEFAULT_CLOCK};
pub use model::{AssertionCategory, AssertionType, SvaModule, SvaProperty};
