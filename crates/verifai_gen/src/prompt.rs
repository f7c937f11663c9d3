//! Natural-language testbench request built from a parsed design.

use std::fmt::Write;

use verifai_rtl::ParsedRtl;
use verifai_sva::SvaGenerator;

/// System instruction sent alongside [`build_testbench_prompt`].
pub const SYSTEM_PROMPT: &str = "You are an expert ASIC/FPGA verification engineer. \
You write complete, compilable SystemVerilog UVM 1.2 testbenches that follow \
standard UVM component structure and naming. Respond with SystemVerilog code only.";

/// Renders the design's structure into a testbench request.
///
/// Sections for parameters, FSM, and protocol appear only when the design
/// has them.
pub fn build_testbench_prompt(rtl: &ParsedRtl) -> String {
    let m = &rtl.module_name;
    let sva = SvaGenerator::new(rtl);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Generate a complete UVM testbench for the following RTL module.\n"
    );
    let _ = writeln!(out, "## Module: {m}\n");

    let _ = writeln!(out, "### Ports");
    for port in &rtl.ports {
        let _ = writeln!(out, "- {port}");
    }

    if !rtl.parameters.is_empty() {
        let _ = writeln!(out, "\n### Parameters");
        for param in &rtl.parameters {
            let _ = writeln!(out, "- {} = {}", param.name, param.value);
        }
    }

    let _ = writeln!(out, "\n### Clock and Reset");
    let _ = writeln!(out, "- Clock: {} ({})", sva.clock(), sva.clock_edge());
    match sva.reset() {
        Some(reset) => {
            let polarity = if sva.is_reset_active_low() {
                "active low"
            } else {
                "active high"
            };
            let _ = writeln!(out, "- Reset: {reset} ({polarity})");
        }
        None => {
            let _ = writeln!(out, "- Reset: none detected");
        }
    }

    if let Some(fsm) = &rtl.fsm {
        let _ = writeln!(out, "\n### FSM");
        let _ = writeln!(out, "- State register: {}", fsm.state_signal);
        let _ = writeln!(
            out,
            "- States ({}, {} encoding): {}",
            fsm.state_count,
            fsm.encoding,
            fsm.states.join(", ")
        );
    }

    if let Some(hint) = rtl.top_protocol() {
        let _ = writeln!(out, "\n### Detected Protocol");
        let _ = writeln!(
            out,
            "- {} (confidence {:.2}): {}",
            hint.protocol.display_name(),
            hint.confidence,
            hint.reason
        );
    }

    let _ = write!(
        out,
        "
## Requirements
1. `{m}_if` interface with driver and monitor clocking blocks
2. Sequence item with constraints for every input port
3. Driver, monitor, and agent
4. Scoreboard comparing DUT outputs against a reference model
5. Functional coverage with a covergroup per interface
6. Environment, base sequence, and `{m}_base_test`
7. Reset handling that honors the reset polarity above

Return only SystemVerilog code for package `{m}_tb_pkg`.
"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const APB: &str = "
module apb_slave #(parameter ADDR_WIDTH = 8) (
    input  logic        pclk,
    input  logic        presetn,
    input  logic        psel,
    input  logic        penable,
    input  logic        pwrite,
    input  logic [7:0]  paddr,
    input  logic [31:0] pwdata,
    output logic [31:0] prdata,
    output logic        pready,
    output logic        pslverr
);
endmodule";

    #[test]
    fn prompt_sections() {
        let prompt = build_testbench_prompt(&verifai_rtl::parse(APB));
        assert!(prompt.contains("## Module: apb_slave"));
        assert!(prompt.contains("- input logic [7:0] paddr"));
        assert!(prompt.contains("- ADDR_WIDTH = 8"));
        assert!(prompt.contains("- Clock: pclk (posedge)"));
        assert!(prompt.contains("- Reset: presetn (active low)"));
        assert!(prompt.contains("- APB (confidence 0.90)"));
        assert!(prompt.contains("package `apb_slave_tb_pkg`"));
        assert!(!prompt.contains("### FSM"));
    }

    #[test]
    fn prompt_without_structure() {
        let prompt = build_testbench_prompt(&verifai_rtl::parse("garbage"));
        assert!(prompt.contains(&format!("## Module: {}", verifai_rtl::UNKNOWN_MODULE)));
        assert!(prompt.contains("- Clock: clk (posedge)"));
        assert!(prompt.contains("- Reset: none detected"));
        assert!(!prompt.contains("### Parameters"));
        assert!(!prompt.contains("### Detected Protocol"));
    }
}
