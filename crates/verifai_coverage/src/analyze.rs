//! Gap analysis and stimulus suggestion.
//!
//! Suggestions come from a fixed table keyed on the coverpoint family
//! (address, data, operation, burst, error) and refined by the bin name.

use crate::error::CoverageError;
use crate::model::{CoverageBin, CoverageGap, CoverageReport, Priority};
use crate::parse::{parse_report, ReportFormat};

/// Default coverage target in percent.
pub const DEFAULT_TARGET: f64 = 95.0;

/// A stimulus constraint and the sequence that applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stimulus {
    /// Constraint body for `randomize() with { ... }`.
    pub constraint: &'static str,
    /// Sequence class name.
    pub sequence: &'static str,
}

/// Known stimulus patterns.
pub mod patterns {
    use super::Stimulus;

    /// Addresses 0 to 255.
    pub const ADDR_LOW: Stimulus = Stimulus {
        constraint: "addr = $urandom_range(0, 255)",
        sequence: "low_address_seq",
    };
    /// Addresses 256 to 4095.
    pub const ADDR_MID: Stimulus = Stimulus {
        constraint: "addr = $urandom_range(256, 4095)",
        sequence: "mid_address_seq",
    };
    /// Addresses 4096 to 65535.
    pub const ADDR_HIGH: Stimulus = Stimulus {
        constraint: "addr = $urandom_range(4096, 65535)",
        sequence: "high_address_seq",
    };
    /// Range boundary addresses.
    pub const ADDR_BOUNDARY: Stimulus = Stimulus {
        constraint: "addr inside {0, 8'hFF, 9'h100, 12'hFFF, 16'hFFFF}",
        sequence: "boundary_address_seq",
    };
    /// All-zero data.
    pub const DATA_ZERO: Stimulus = Stimulus {
        constraint: "data = 0",
        sequence: "zero_data_seq",
    };
    /// All-ones data.
    pub const DATA_ONES: Stimulus = Stimulus {
        constraint: "data = '1",
        sequence: "all_ones_seq",
    };
    /// Alternating bit patterns.
    pub const DATA_PATTERN: Stimulus = Stimulus {
        constraint: "data inside {32'hAAAA_AAAA, 32'h5555_5555}",
        sequence: "pattern_data_seq",
    };
    /// Read transfers.
    pub const READ: Stimulus = Stimulus {
        constraint: "write = 0",
        sequence: "read_only_seq",
    };
    /// Write transfers.
    pub const WRITE: Stimulus = Stimulus {
        constraint: "write = 1",
        sequence: "write_only_seq",
    };
    /// Back-to-back reads.
    pub const BACK2BACK_READ: Stimulus = Stimulus {
        constraint: "repeat(10) @(posedge clk) write = 0",
        sequence: "b2b_read_seq",
    };
    /// Back-to-back writes.
    pub const BACK2BACK_WRITE: Stimulus = Stimulus {
        constraint: "repeat(10) @(posedge clk) write = 1",
        sequence: "b2b_write_seq",
    };
    /// Single-beat bursts.
    pub const BURST_1: Stimulus = Stimulus {
        constraint: "len = 0",
        sequence: "single_burst_seq",
    };
    /// Four-beat bursts.
    pub const BURST_4: Stimulus = Stimulus {
        constraint: "len = 3",
        sequence: "burst4_seq",
    };
    /// Eight-beat bursts.
    pub const BURST_8: Stimulus = Stimulus {
        constraint: "len = 7",
        sequence: "burst8_seq",
    };
    /// Sixteen-beat bursts.
    pub const BURST_16: Stimulus = Stimulus {
        constraint: "len = 15",
        sequence: "burst16_seq",
    };
    /// Error injection.
    pub const ERROR_INJECT: Stimulus = Stimulus {
        constraint: "inject_error = 1",
        sequence: "error_injection_seq",
    };
    /// Forced timeout.
    pub const TIMEOUT: Stimulus = Stimulus {
        constraint: "force_timeout = 1",
        sequence: "timeout_seq",
    };
}

fn known(stimulus: Stimulus) -> (String, String) {
    (stimulus.constraint.to_string(), stimulus.sequence.to_string())
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Suggests `(stimulus, sequence_name)` for reaching `bin` of `coverpoint`.
///
/// Families are tried in order: address, data, operation, burst length,
/// error. Bins that fit no table entry get a commented placeholder.
pub fn suggest_stimulus(bin: &str, coverpoint: &str) -> (String, String) {
    use patterns::*;

    let b = bin.to_ascii_lowercase();
    let cp = coverpoint.to_ascii_lowercase();

    if cp.contains("addr") {
        return if contains_any(&b, &["low", "small"]) {
            known(ADDR_LOW)
        } else if contains_any(&b, &["mid", "medium"]) {
            known(ADDR_MID)
        } else if contains_any(&b, &["high", "large"]) {
            known(ADDR_HIGH)
        } else if contains_any(&b, &["bound", "edge"]) {
            known(ADDR_BOUNDARY)
        } else {
            (format!("addr = /* hit {bin} */"), format!("{bin}_seq"))
        };
    }

    if cp.contains("data") {
        return if b.contains("zero") {
            known(DATA_ZERO)
        } else if b.contains("one") {
            known(DATA_ONES)
        } else if contains_any(&b, &["pattern", "aa", "55"]) {
            known(DATA_PATTERN)
        } else {
            (format!("data = /* hit {bin} */"), format!("{bin}_seq"))
        };
    }

    if contains_any(&cp, &["op", "type", "write"]) {
        let b2b = contains_any(&b, &["back2back", "b2b"]);
        if b.contains("read") {
            return known(if b2b { BACK2BACK_READ } else { READ });
        }
        if b.contains("write") {
            return known(if b2b { BACK2BACK_WRITE } else { WRITE });
        }
    }

    if contains_any(&cp, &["len", "burst", "size"]) {
        if b.contains("16") {
            return known(BURST_16);
        }
        if b.contains('8') {
            return known(BURST_8);
        }
        if b.contains('4') {
            return known(BURST_4);
        }
        if b.contains('1') || b.contains("single") {
            return known(BURST_1);
        }
    }

    if b.contains("timeout") {
        return known(TIMEOUT);
    }
    if cp.contains("error") || b.contains("err") {
        return known(ERROR_INJECT);
    }

    (
        format!("/* Constrain to hit {bin} */"),
        format!("{bin}_targeted_seq"),
    )
}

/// Priority for a coverpoint bin measured against a target.
fn target_priority(bin: &CoverageBin) -> Priority {
    let name = bin.name.to_ascii_lowercase();
    if bin.hits == 0 || contains_any(&name, &["error", "boundary", "edge"]) {
        Priority::High
    } else if bin.coverage_pct() > 50.0 {
        Priority::Low
    } else {
        Priority::Medium
    }
}

/// Priority for an uncovered bin judged by name alone.
pub fn keyword_priority(bin_name: &str) -> Priority {
    let name = bin_name.to_ascii_lowercase();
    if contains_any(&name, &["error", "fail", "timeout", "illegal"]) {
        Priority::High
    } else if contains_any(&name, &["boundary", "edge", "corner"]) {
        Priority::High
    } else if contains_any(&name, &["default", "other", "misc"]) {
        Priority::Low
    } else {
        Priority::Medium
    }
}

fn needs_closing(bin: &CoverageBin, target: f64) -> bool {
    !bin.is_covered() || bin.coverage_pct() < target
}

fn gap_for(
    covergroup: &str,
    coverpoint: &str,
    bin: &CoverageBin,
    priority: Priority,
    (suggested_stimulus, suggested_sequence): (String, String),
    target: f64,
) -> CoverageGap {
    CoverageGap {
        covergroup: covergroup.to_string(),
        coverpoint: coverpoint.to_string(),
        bin_name: bin.name.clone(),
        priority,
        suggested_stimulus,
        suggested_sequence,
        hit_count: bin.hits,
        goal_count: bin.goal,
        current_coverage: bin.coverage_pct(),
        target_coverage: target,
        hits_needed: bin.goal.saturating_sub(bin.hits).max(1),
    }
}

/// Finds every bin that is uncovered or below `target` percent.
///
/// Coverpoint bins: zero hits, or a name mentioning error/boundary/edge, is
/// high priority; above 50 % is low; everything else medium. Cross bins are
/// high with zero hits, else medium. The result is ordered by priority, then
/// by current coverage, lowest first.
pub fn analyze_coverage(report: &CoverageReport, target: f64) -> Vec<CoverageGap> {
    let mut gaps = Vec::new();

    for cg in &report.covergroups {
        for cp in &cg.coverpoints {
            for bin in cp.bins.iter().filter(|b| needs_closing(b, target)) {
                let suggestion = suggest_stimulus(&bin.name, &cp.name);
                gaps.push(gap_for(&cg.name, &cp.name, bin, target_priority(bin), suggestion, target));
            }
        }
        for cross in &cg.crosses {
            for bin in cross.bins.iter().filter(|b| needs_closing(b, target)) {
                let priority = if bin.hits == 0 {
                    Priority::High
                } else {
                    Priority::Medium
                };
                let flat: String = bin
                    .name
                    .replace(['<', '>'], "")
                    .replace(", ", "_");
                let suggestion = (
                    format!("/* Cross: {} */", bin.name),
                    format!("cross_{}_{}_seq", cross.name, flat),
                );
                gaps.push(gap_for(&cg.name, &cross.name, bin, priority, suggestion, target));
            }
        }
    }

    gaps.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(a.current_coverage.total_cmp(&b.current_coverage))
    });
    tracing::debug!(gaps = gaps.len(), target, "coverage gaps found");
    gaps
}

/// Collects gaps for uncovered coverpoint bins, prioritized by bin name
/// (see [`keyword_priority`]). Crosses are not considered.
pub fn find_gaps(report: &CoverageReport) -> Vec<CoverageGap> {
    let mut gaps = Vec::new();
    for cg in &report.covergroups {
        for cp in &cg.coverpoints {
            for bin in cp.uncovered_bins() {
                let suggestion = suggest_stimulus(&bin.name, &cp.name);
                gaps.push(gap_for(
                    &cg.name,
                    &cp.name,
                    bin,
                    keyword_priority(&bin.name),
                    suggestion,
                    100.0,
                ));
            }
        }
    }
    gaps.sort_by_key(|g| g.priority);
    gaps
}

/// Parses `text` and attaches [`find_gaps`] results to the report.
pub fn analyze(text: &str, format: ReportFormat) -> Result<CoverageReport, CoverageError> {
    let mut report = parse_report(text, format)?;
    report.gaps = find_gaps(&report);
    Ok(report)
}

/// Reads and analyzes a report file with format auto-detection.
pub fn analyze_file(path: impl AsRef<std::path::Path>) -> Result<CoverageReport, CoverageError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| CoverageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    analyze(&text, ReportFormat::Auto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_text_summary;

    #[test]
    fn address_stimulus() {
        assert_eq!(suggest_stimulus("addr_low", "cp_addr"), known(patterns::ADDR_LOW));
        assert_eq!(suggest_stimulus("addr_high", "cp_address"), known(patterns::ADDR_HIGH));
        let (stim, seq) = suggest_stimulus("addr_boundary", "cp_addr");
        assert!(stim.contains("16'hFFFF"));
        assert_eq!(seq, "boundary_address_seq");
        let (stim, seq) = suggest_stimulus("addr_0x40", "cp_addr");
        assert_eq!(stim, "addr = /* hit addr_0x40 */");
        assert_eq!(seq, "addr_0x40_seq");
    }

    #[test]
    fn data_stimulus() {
        assert_eq!(suggest_stimulus("zero", "cp_data").0, "data = 0");
        assert_eq!(suggest_stimulus("all_ones", "cp_wdata").0, "data = '1");
        assert_eq!(suggest_stimulus("data_aa", "cp_rdata").1, "pattern_data_seq");
    }

    #[test]
    fn operation_stimulus() {
        assert_eq!(suggest_stimulus("read", "op_cp").1, "read_only_seq");
        assert_eq!(suggest_stimulus("back2back_write", "op_cp").1, "b2b_write_seq");
    }

    #[test]
    fn burst_stimulus() {
        assert_eq!(suggest_stimulus("len_16", "cp_burst_len").0, "len = 15");
        assert_eq!(suggest_stimulus("len_4", "cp_burst_len").0, "len = 3");
        assert_eq!(suggest_stimulus("single", "cp_burst_len").0, "len = 0");
    }

    #[test]
    fn error_and_fallback_stimulus() {
        assert_eq!(suggest_stimulus("protocol_error", "error_cp").1, "error_injection_seq");
        assert_eq!(suggest_stimulus("timeout_error", "error_cp").1, "timeout_seq");
        assert_eq!(
            suggest_stimulus("mode_3", "cp_mode"),
            ("/* Constrain to hit mode_3 */".to_string(), "mode_3_targeted_seq".to_string())
        );
    }

    #[test]
    fn gaps_against_target() {
        let report = parse_text_summary(
            "Covergroup: cg_test\n  Coverpoint: cp_data\n    bin zero: 100/100 (100%)\n\
             bin low: 50/100 (50%)\n    bin high: 0/100 (0%)\n    bin most: 80/100 (80%)",
        );
        let gaps = analyze_coverage(&report, 95.0);
        let names: Vec<_> = gaps.iter().map(|g| g.bin_name.as_str()).collect();
        assert_eq!(names, vec!["high", "low", "most"]);

        assert_eq!(gaps[0].priority, Priority::High);
        assert_eq!(gaps[0].hits_needed, 100);
        assert_eq!(gaps[1].priority, Priority::Medium);
        assert_eq!(gaps[2].priority, Priority::Low);
        assert_eq!(gaps[2].current_coverage, 80.0);
        assert!(gaps.iter().all(|g| g.target_coverage == 95.0));
    }

    #[test]
    fn cross_gaps() {
        let report = parse_text_summary(
            "Covergroup: cg\n  Cross: cp_addr x cp_write\n    bin <lo, rd>: 0/5 (0%)\n\
             bin <hi, wr>: 2/5 (40%)",
        );
        let gaps = analyze_coverage(&report, 95.0);
        assert_eq!(gaps.len(), 2);
        assert_eq!(gaps[0].priority, Priority::High);
        assert_eq!(gaps[0].suggested_stimulus, "/* Cross: <lo, rd> */");
        assert_eq!(gaps[0].suggested_sequence, "cross_cp_addr_lo_rd_seq");
        assert_eq!(gaps[1].priority, Priority::Medium);
        assert_eq!(gaps[1].coverpoint, "cp_addr");
    }

    #[test]
    fn name_priorities() {
        assert_eq!(keyword_priority("illegal_op"), Priority::High);
        assert_eq!(keyword_priority("corner_case"), Priority::High);
        assert_eq!(keyword_priority("misc"), Priority::Low);
        assert_eq!(keyword_priority("addr_mid"), Priority::Medium);
    }

    #[test]
    fn analyze_attaches_keyword_gaps() {
        let report = analyze(
            "covergroup cg\n coverpoint err_cp\n  bin protocol_error hits: 0\n  bin other hits: 0\n  bin ok hits: 4",
            ReportFormat::Simple,
        )
        .unwrap();
        assert_eq!(report.gaps.len(), 2);
        assert_eq!(report.gaps[0].bin_name, "protocol_error");
        assert_eq!(report.gaps[1].priority, Priority::Low);
    }

    #[test]
    fn analyze_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = analyze_file(dir.path().join("none.txt")).unwrap_err();
        assert!(matches!(err, CoverageError::Io { .. }));
    }
}
