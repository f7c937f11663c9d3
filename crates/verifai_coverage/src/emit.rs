//! Text generation from analyzed coverage: UVM sequences and a gap report.

use std::fmt::Write;

use crate::model::{CoverageGap, CoverageReport, Priority, SuggestedSequence};

/// Default number of targeted sequences emitted by
/// [`generate_closure_sequences`].
pub const DEFAULT_CLOSURE_LIMIT: usize = 10;

/// Upper bound on hits one suggested sequence run is credited with.
const HITS_PER_RUN: u64 = 10;

/// Builds a standalone UVM sequence class that drives the gap's stimulus.
pub fn gap_to_suggestion(gap: &CoverageGap) -> SuggestedSequence {
    let name = &gap.suggested_sequence;
    let stimulus = &gap.suggested_stimulus;
    let code = format!(
        r#"class {name} extends uvm_sequence;
  `uvm_object_utils({name})

  function new(string name = "{name}");
    super.new(name);
  endfunction

  task body();
    req = new("req");
    start_item(req);

    // Target: {cp}.{bin}
    // Current: {pct:.0}% ({hits} hits)
    // Need: {need} more hits

    assert(req.randomize() with {{
      {stimulus};
    }}) else `uvm_error("SEQ", "Randomization failed")

    finish_item(req);
  endtask
endclass"#,
        cp = gap.coverpoint,
        bin = gap.bin_name,
        pct = gap.current_coverage,
        hits = gap.hit_count,
        need = gap.hits_needed,
    );

    let expected_coverage_gain = if gap.goal_count > 0 {
        gap.hits_needed.min(HITS_PER_RUN) as f64 / gap.goal_count as f64 * 100.0
    } else {
        0.0
    };

    SuggestedSequence {
        name: name.clone(),
        description: format!("Close gap in {}.{}", gap.coverpoint, gap.bin_name),
        uvm_sequence_code: code,
        stimulus: stimulus.clone(),
        expected_coverage_gain,
    }
}

/// Generates a closure sequence that walks every gap, grouped by
/// coverpoint, followed by targeted sequences for the first `limit` gaps.
///
/// Sequences extend `<module>_base_seq`.
pub fn generate_closure_sequences(report: &CoverageReport, module: &str, limit: usize) -> String {
    if report.gaps.is_empty() {
        return "// No coverage gaps found - 100% coverage achieved!".to_string();
    }

    let mut out = String::new();
    let _ = write!(
        out,
        r#"// VerifAI Generated Coverage Closure Sequences
// Target: {module}
// Gaps Found: {gaps}
// Current Coverage: {total:.1}%

class {module}_coverage_closure_seq extends {module}_base_seq;
    `uvm_object_utils({module}_coverage_closure_seq)

    function new(string name = "{module}_coverage_closure_seq");
        super.new(name);
    endfunction

    task body();
        `uvm_info("COV_CLOSE", "Starting coverage closure sequence", UVM_LOW)
"#,
        gaps = report.gaps.len(),
        total = report.total_coverage,
    );

    // Coverpoint groups in order of first appearance.
    let mut groups: Vec<(String, Vec<&CoverageGap>)> = Vec::new();
    for gap in &report.gaps {
        let key = format!("{}.{}", gap.covergroup, gap.coverpoint);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(gap),
            None => groups.push((key, vec![gap])),
        }
    }

    for (key, gaps) in &groups {
        let _ = write!(out, "\n        // === Close gaps in {key} ===");
        for gap in gaps {
            let _ = write!(
                out,
                "\n        // Gap: {} (Priority: {})\n        `uvm_do_with(req, {{ {}; }})",
                gap.bin_name, gap.priority, gap.suggested_stimulus
            );
        }
    }

    out.push_str(
        "\n\n        `uvm_info(\"COV_CLOSE\", \"Coverage closure sequence complete\", UVM_LOW)\n    endtask\n\nendclass\n",
    );

    for gap in report.gaps.iter().take(limit) {
        let name = &gap.suggested_sequence;
        let _ = write!(
            out,
            r#"
// Targeted sequence for: {cg}.{cp}.{bin}
class {name} extends {module}_base_seq;
    `uvm_object_utils({name})

    function new(string name = "{name}");
        super.new(name);
    endfunction

    task body();
        repeat(100) begin
            `uvm_do_with(req, {{ {stimulus}; }})
        end
    endtask

endclass
"#,
            cg = gap.covergroup,
            cp = gap.coverpoint,
            bin = gap.bin_name,
            stimulus = gap.suggested_stimulus,
        );
    }

    out
}

/// Renders a human-readable gap report, listing up to five high, five
/// medium, and three low priority gaps.
pub fn generate_report(report: &CoverageReport) -> String {
    let rule = "=".repeat(60);
    let thin = "-".repeat(60);
    let mut lines = vec![
        rule.clone(),
        "VerifAI Coverage Gap Analysis Report".to_string(),
        rule.clone(),
        format!("\nTotal Coverage: {:.1}%", report.total_coverage),
        format!("Coverage Gaps Found: {}", report.gaps.len()),
    ];

    if !report.gaps.is_empty() {
        lines.push(format!("\n{thin}"));
        lines.push("Coverage Gaps by Priority:".to_string());
        lines.push(thin);

        let sections = [
            (Priority::High, "HIGH", 5, true),
            (Priority::Medium, "MEDIUM", 5, true),
            (Priority::Low, "LOW", 3, false),
        ];
        for (priority, label, shown, with_stimulus) in sections {
            let gaps: Vec<_> = report.gaps_with_priority(priority).collect();
            if gaps.is_empty() {
                continue;
            }
            lines.push(format!("\n[{label}] PRIORITY ({} gaps):", gaps.len()));
            for gap in gaps.iter().take(shown) {
                lines.push(format!(
                    "   * {}.{}.{}",
                    gap.covergroup, gap.coverpoint, gap.bin_name
                ));
                if with_stimulus {
                    lines.push(format!("     Suggested: {}", gap.suggested_stimulus));
                }
            }
        }
    }

    lines.push(format!("\n{rule}"));
    lines.push("Run the generated coverage_closure_seq to close these gaps!".to_string());
    lines.push(rule);
    lines.join("\n")
}
