//! `verifai spec` — extract protocol, widths, and registers from a
//! natural-language design description.

use std::fmt::Write;

use verifai_spec::{parse_spec_file, ParsedSpec};

use crate::pipeline::emit;
use crate::{GlobalArgs, ReportFormat, SpecArgs};

/// Runs the `verifai spec` command. Returns exit code 0.
pub fn run(args: &SpecArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let spec = parse_spec_file(&args.file)?;
    let text = match args.format {
        ReportFormat::Text => render_text(&spec),
        ReportFormat::Json => format!("{}\n", serde_json::to_string_pretty(&spec)?),
    };
    emit(args.output.as_deref(), &text, global)?;
    Ok(0)
}

/// Human-readable view of an extracted description.
pub fn render_text(spec: &ParsedSpec) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Module: {}", spec.module_name);
    let _ = writeln!(out, "Protocol: {}", spec.protocol.display_name());
    let _ = writeln!(
        out,
        "Widths: data {} bits, address {} bits",
        spec.data_width, spec.addr_width
    );
    let polarity = if spec.reset_active_low { "active low" } else { "active high" };
    let _ = writeln!(
        out,
        "Clock/reset: {} / {} ({polarity})",
        spec.clock_name, spec.reset_name
    );

    if spec.registers.is_empty() {
        let _ = writeln!(out, "Registers: none");
    } else {
        let _ = writeln!(out, "Registers:");
        for reg in &spec.registers {
            let _ = writeln!(out, "  0x{:04X}  {:<16} {}", reg.address, reg.name, reg.access);
        }
    }
    let _ = writeln!(out, "Features: {}", spec.features.join(", "));
    out
}
