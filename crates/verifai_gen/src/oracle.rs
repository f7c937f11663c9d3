//! The text-generation seam.
//!
//! Testbench bodies come from an external text generator. This crate only
//! defines the interface and the post-processing of its reply; concrete
//! clients live with the caller.

use verifai_rtl::ParsedRtl;

use crate::error::GenError;
use crate::prompt::{build_testbench_prompt, SYSTEM_PROMPT};

/// Something that turns a prompt into text.
pub trait TextOracle {
    /// Generates a reply to `prompt` under the `system` instruction.
    fn generate(&self, prompt: &str, system: &str) -> Result<String, GenError>;
}

impl<F> TextOracle for F
where
    F: Fn(&str, &str) -> Result<String, GenError>,
{
    fn generate(&self, prompt: &str, system: &str) -> Result<String, GenError> {
        self(prompt, system)
    }
}

/// Removes one surrounding markdown code fence, with or without a language
/// tag. Text without a fence is returned trimmed.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // The info string runs to the end of the opening line.
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}

/// Requests a testbench package for `rtl` from `oracle`.
///
/// Fails with [`GenError::EmptyResponse`] when the reply is blank once any
/// code fence is removed.
pub fn generate_testbench(rtl: &ParsedRtl, oracle: &dyn TextOracle) -> Result<String, GenError> {
    let prompt = build_testbench_prompt(rtl);
    tracing::debug!(module = %rtl.module_name, prompt_len = prompt.len(), "requesting testbench");

    let reply = oracle.generate(&prompt, SYSTEM_PROMPT)?;
    let code = strip_code_fence(&reply);
    if code.is_empty() {
        return Err(GenError::EmptyResponse);
    }
    tracing::debug!(module = %rtl.module_name, code_len = code.len(), "testbench received");
    Ok(format!("{code}\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const DUT: &str = "module counter (input logic clk, input logic rst_n, output logic [3:0] count);\nendmodule";

    #[test]
    fn fence_with_language() {
        let text = "```systemverilog\npackage p;\nendpackage\n```";
        assert_eq!(strip_code_fence(text), "package p;\nendpackage");
    }

    #[test]
    fn fence_without_language() {
        assert_eq!(strip_code_fence("```\nmodule m; endmodule\n```\n"), "module m; endmodule");
    }

    #[test]
    fn no_fence() {
        assert_eq!(strip_code_fence("  package p; endpackage \n"), "package p; endpackage");
        assert_eq!(strip_code_fence("```unterminated"), "```unterminated");
    }

    #[test]
    fn closure_oracle_sees_prompt() {
        let seen = RefCell::new(String::new());
        let oracle = |prompt: &str, system: &str| -> Result<String, GenError> {
            assert_eq!(system, SYSTEM_PROMPT);
            *seen.borrow_mut() = prompt.to_string();
            Ok("```sv\npackage counter_tb_pkg;\nendpackage\n```".to_string())
        };
        let code = generate_testbench(&verifai_rtl::parse(DUT), &oracle).unwrap();
        assert_eq!(code, "package counter_tb_pkg;\nendpackage\n");
        assert!(seen.borrow().contains("## Module: counter"));
    }

    #[test]
    fn empty_reply_is_error() {
        let oracle = |_: &str, _: &str| -> Result<String, GenError> { Ok("```\n```".to_string()) };
        let err = generate_testbench(&verifai_rtl::parse(DUT), &oracle).unwrap_err();
        assert!(matches!(err, GenError::EmptyResponse));
    }

    #[test]
    fn oracle_error_propagates() {
        let oracle =
            |_: &str, _: &str| -> Result<String, GenError> { Err(GenError::Oracle("offline".into())) };
        let err = generate_testbench(&verifai_rtl::parse(DUT), &oracle).unwrap_err();
        assert_eq!(err.to_string(), "text generation failed: offline");
    }
}
