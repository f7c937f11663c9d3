//! `verifai analyze` — structural summary of one RTL file.

use std::fmt::Write;

use verifai_rtl::{ParsedRtl, RtlSummary};

use crate::pipeline::load_rtl;
use crate::{AnalyzeArgs, GlobalArgs, ReportFormat};

/// Runs the `verifai analyze` command. Returns exit code 0.
pub fn run(args: &AnalyzeArgs, _global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let rtl = load_rtl(&args.file)?;
    match args.format {
        ReportFormat::Text => print!("{}", render_text(&rtl)),
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&RtlSummary::from(&rtl))?)
        }
    }
    Ok(0)
}

/// Human-readable report: ports, parameters, clocks and resets, FSM,
/// protocol hints, and predicted issues.
pub fn render_text(rtl: &ParsedRtl) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Module: {}", rtl.module_name);

    let _ = writeln!(
        out,
        "Ports: {} ({} in, {} out, {} inout)",
        rtl.ports.len(),
        rtl.input_ports().len(),
        rtl.output_ports().len(),
        rtl.inout_ports().len()
    );
    for port in &rtl.ports {
        let _ = writeln!(out, "  {port}");
    }

    if !rtl.parameters.is_empty() {
        let _ = writeln!(out, "Parameters:");
        for param in &rtl.parameters {
            let _ = writeln!(out, "  {} = {}", param.name, param.value);
        }
    }

    let clocks: Vec<String> = rtl
        .clocks
        .clock_signals
        .iter()
        .map(|clk| {
            let edge = rtl.clocks.clock_edges.get(clk).copied().unwrap_or_default();
            format!("{clk} ({edge})")
        })
        .collect();
    let _ = writeln!(out, "Clocks: {}", list_or_none(&clocks));

    let resets: Vec<String> = rtl
        .clocks
        .reset_signals
        .iter()
        .map(|rst| match rtl.reset_polarity(rst) {
            Some(polarity) if polarity.is_active_low() => format!("{rst} (active low)"),
            _ => format!("{rst} (active high)"),
        })
        .collect();
    let _ = writeln!(out, "Resets: {}", list_or_none(&resets));

    match &rtl.fsm {
        Some(fsm) => {
            let _ = writeln!(
                out,
                "FSM: {} with {} states, {} encoding: {}",
                fsm.state_signal,
                fsm.state_count,
                fsm.encoding,
                fsm.states.join(", ")
            );
        }
        None => {
            let _ = writeln!(out, "FSM: none");
        }
    }

    if rtl.protocol_hints.is_empty() {
        let _ = writeln!(out, "Protocols: none");
    } else {
        let _ = writeln!(out, "Protocols:");
        for hint in &rtl.protocol_hints {
            let _ = writeln!(
                out,
                "  {:<10} {:.2}  {}",
                hint.protocol.display_name(),
                hint.confidence,
                hint.reason
            );
        }
    }

    let _ = writeln!(
        out,
        "Data width: {}, address width: {}",
        rtl.data_width(),
        rtl.addr_width()
    );

    let bugs = verifai_gen::predict_bugs(rtl);
    if !bugs.is_empty() {
        let _ = writeln!(out, "Likely issues:");
        for bug in bugs {
            let _ = writeln!(out, "  [{}] {}: {}", bug.severity, bug.title, bug.description);
        }
    }
    out
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::*;

    #[test]
    fn text_report_sections() {
        let text = render_text(&verifai_rtl::parse(APB_SLAVE));
        assert!(text.starts_with("Module: apb_slave\n"));
        assert!(text.contains("Ports: 10 (7 in, 3 out, 0 inout)"));
        assert!(text.contains("  input logic [7:0] paddr"));
        assert!(text.contains("  ADDR_WIDTH = 8"));
        assert!(text.contains("Clocks: pclk (posedge)"));
        assert!(text.contains("Resets: presetn (active low)"));
        assert!(text.contains("FSM: none"));
        assert!(text.contains("  APB        0.90"));
        assert!(text.contains("Data width: 32, address width: 8"));
        assert!(text.contains("  [high] PREADY Timing:"));
    }

    #[test]
    fn empty_design() {
        let text = render_text(&verifai_rtl::parse(""));
        assert!(text.contains("Ports: 0 (0 in, 0 out, 0 inout)"));
        assert!(text.contains("Clocks: none"));
        assert!(text.contains("Resets: none"));
        assert!(text.contains("Protocols: none"));
        assert!(!text.contains("Parameters:"));
    }

    #[test]
    fn run_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("apb_slave.sv");
        std::fs::write(&file, APB_SLAVE).unwrap();
        let global = quiet_globals(dir.path());
        let args = AnalyzeArgs {
            file,
            format: ReportFormat::Json,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
    }

    #[test]
    fn run_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let global = quiet_globals(dir.path());
        let args = AnalyzeArgs {
            file: dir.path().join("missing.sv"),
            format: ReportFormat::Text,
        };
        assert!(run(&args, &global).is_err());
    }
}
