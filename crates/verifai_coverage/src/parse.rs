//! Coverage report readers.
//!
//! Three textual shapes are understood:
//!
//! - **JSON**: `{"total_coverage": 75.5, "covergroups": [{"name", "coverpoints":
//!   [{"name", "bins": [{"name", "hits", "goal"}]}]}]}`.
//! - **Simple**: indented `covergroup <name>` / `coverpoint <name>` /
//!   `bin <name> hits: <n>` lines. Percentages on group lines are ignored.
//! - **Summary**: `Covergroup: <name>` / `Coverpoint: <name>` /
//!   `bin <name>: <hits>/<goal> (<pct>%)` / `Cross: <a> x <b>` /
//!   `bin <a, b>: <hits>/<goal> (<pct>%)` / `Overall Coverage: <pct>%`.
//!
//! VCS URG and Questa text reports are read with the simple reader.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoverageError;
use crate::model::{CoverPoint, CoverageBin, CoverageReport, Covergroup, CrossCoverage};

/// Report source label for JSON input.
pub const SOURCE_JSON: &str = "json";
/// Report source label for the simple text reader.
pub const SOURCE_TEXT: &str = "text";
/// Report source label for the summary reader.
pub const SOURCE_SUMMARY: &str = "text_summary";

/// Input format of a coverage report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Detect from content.
    #[default]
    Auto,
    /// JSON export.
    Json,
    /// Synopsys VCS / URG text.
    Vcs,
    /// Siemens Questa / ModelSim text.
    Questa,
    /// Simple indented text.
    Simple,
    /// `hits/goal (pct%)` summary text.
    Summary,
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Auto => "auto",
            ReportFormat::Json => "json",
            ReportFormat::Vcs => "vcs",
            ReportFormat::Questa => "questa",
            ReportFormat::Simple => "simple",
            ReportFormat::Summary => "summary",
        };
        f.write_str(name)
    }
}

impl FromStr for ReportFormat {
    type Err = CoverageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(ReportFormat::Auto),
            "json" => Ok(ReportFormat::Json),
            "vcs" | "urg" => Ok(ReportFormat::Vcs),
            "questa" | "modelsim" => Ok(ReportFormat::Questa),
            "simple" | "text" => Ok(ReportFormat::Simple),
            "summary" => Ok(ReportFormat::Summary),
            _ => Err(CoverageError::UnknownFormat(s.to_string())),
        }
    }
}

lazy_static! {
    // Simple reader.
    static ref SIMPLE_GROUP: Regex = Regex::new(r"(?i)^(?:covergroup|cg)\s+(\w+)").unwrap();
    static ref SIMPLE_POINT: Regex = Regex::new(r"(?i)^(?:coverpoint|cp)\s+(\w+)").unwrap();
    static ref SIMPLE_BIN: Regex =
        Regex::new(r"(?i)^bins?\s+(\w+).*?(\d+)(?:\s*/\s*(\d+))?").unwrap();

    // Summary reader.
    static ref SUMMARY_OVERALL: Regex =
        Regex::new(r"(?i)overall\s*(?:coverage)?[:\s]+(\d+(?:\.\d+)?)\s*%").unwrap();
    static ref SUMMARY_GROUP: Regex = Regex::new(r"(?i)^(?:covergroup|cg)[:\s]+(\w+)").unwrap();
    static ref SUMMARY_POINT: Regex = Regex::new(r"(?i)^(?:coverpoint|cp)[:\s]+(\w+)").unwrap();
    static ref SUMMARY_BIN: Regex =
        Regex::new(r"(?i)\bbin\s+([^\s:<]+)[:\s]+(\d+)/(\d+)\s*\(\d+(?:\.\d+)?\s*%\)").unwrap();
    static ref SUMMARY_CROSS: Regex = Regex::new(r"(?i)^cross[:\s]+(.+)$").unwrap();
    static ref SUMMARY_CROSS_BIN: Regex =
        Regex::new(r"(?i)\bbin\s+<([^>]+)>[:\s]+(\d+)/(\d+)\s*\(\d+(?:\.\d+)?\s*%\)").unwrap();
    static ref SUMMARY_SHAPE: Regex =
        Regex::new(r"(?im)^\s*bin\s+\S+[:\s]+\d+/\d+\s*\(").unwrap();
}

/// Guesses the format of `text`.
///
/// JSON keys win, then tool names (`URG`/`vcs`, `questa`/`modelsim`), then the
/// `hits/goal (pct%)` bin shape of summaries. Anything else is simple text.
pub fn detect_format(text: &str) -> ReportFormat {
    let lower = text.to_ascii_lowercase();
    if text.contains("\"covergroups\"") || text.contains("\"coverage\"") {
        ReportFormat::Json
    } else if text.contains("URG") || lower.contains("vcs") {
        ReportFormat::Vcs
    } else if lower.contains("questa") || lower.contains("modelsim") {
        ReportFormat::Questa
    } else if SUMMARY_SHAPE.is_match(text) {
        ReportFormat::Summary
    } else {
        ReportFormat::Simple
    }
}

/// Parses `text` in the given format. [`ReportFormat::Auto`] runs
/// [`detect_format`] first. Only JSON input can fail.
pub fn parse_report(text: &str, format: ReportFormat) -> Result<CoverageReport, CoverageError> {
    let format = match format {
        ReportFormat::Auto => detect_format(text),
        other => other,
    };
    tracing::debug!(%format, "parsing coverage report");

    match format {
        ReportFormat::Json => parse_json(text),
        ReportFormat::Summary => Ok(parse_text_summary(text)),
        ReportFormat::Vcs | ReportFormat::Questa | ReportFormat::Simple | ReportFormat::Auto => {
            Ok(parse_simple(text))
        }
    }
}

#[derive(Deserialize)]
struct JsonReport {
    total_coverage: Option<f64>,
    #[serde(default)]
    covergroups: Vec<Covergroup>,
}

/// Parses a JSON export. A missing `total_coverage` is computed from bins.
pub fn parse_json(text: &str) -> Result<CoverageReport, CoverageError> {
    let raw: JsonReport = serde_json::from_str(text)?;
    let mut report = CoverageReport {
        source: SOURCE_JSON.to_string(),
        total_coverage: 0.0,
        covergroups: raw.covergroups,
        gaps: Vec::new(),
    };
    report.total_coverage = match raw.total_coverage {
        Some(total) => total,
        None => bin_ratio(&report),
    };
    Ok(report)
}

/// Parses simple indented text. The total is the mean of covergroup
/// percentages.
pub fn parse_simple(text: &str) -> CoverageReport {
    let mut covergroups: Vec<Covergroup> = Vec::new();

    for line in text.lines().map(str::trim) {
        if let Some(cap) = SIMPLE_GROUP.captures(line) {
            covergroups.push(Covergroup::new(&cap[1]));
            continue;
        }
        let Some(group) = covergroups.last_mut() else {
            continue;
        };
        if let Some(cap) = SIMPLE_POINT.captures(line) {
            group.coverpoints.push(CoverPoint::new(&cap[1]));
            continue;
        }
        if let Some(cap) = SIMPLE_BIN.captures(line) {
            let Some(point) = group.coverpoints.last_mut() else {
                continue;
            };
            let hits = cap[2].parse().unwrap_or(0);
            let goal = cap.get(3).and_then(|m| m.as_str().parse().ok()).unwrap_or(1);
            point.bins.push(CoverageBin::new(&cap[1], hits, goal));
        }
    }

    let total_coverage = if covergroups.is_empty() {
        0.0
    } else {
        covergroups.iter().map(Covergroup::coverage_pct).sum::<f64>() / covergroups.len() as f64
    };

    CoverageReport {
        source: SOURCE_TEXT.to_string(),
        total_coverage,
        covergroups,
        gaps: Vec::new(),
    }
}

/// Parses a `hits/goal (pct%)` summary.
///
/// The `Overall Coverage` line sets the total; when it is absent or zero the
/// total is the ratio of covered bins to all bins.
pub fn parse_text_summary(text: &str) -> CoverageReport {
    let mut covergroups: Vec<Covergroup> = Vec::new();
    let mut overall: Option<f64> = None;

    for line in text.lines().map(str::trim) {
        if let Some(cap) = SUMMARY_OVERALL.captures(line) {
            overall = cap[1].parse().ok();
            continue;
        }
        if let Some(cap) = SUMMARY_GROUP.captures(line) {
            covergroups.push(Covergroup::new(&cap[1]));
            continue;
        }
        let Some(group) = covergroups.last_mut() else {
            continue;
        };
        if let Some(cap) = SUMMARY_POINT.captures(line) {
            group.coverpoints.push(CoverPoint::new(&cap[1]));
            continue;
        }
        if let Some(cap) = SUMMARY_BIN.captures(line) {
            if let Some(point) = group.coverpoints.last_mut() {
                point.bins.push(summary_bin(&cap[1], &cap[2], &cap[3]));
                continue;
            }
        }
        if let Some(cap) = SUMMARY_CROSS.captures(line) {
            group.crosses.push(parse_cross_header(&cap[1]));
            continue;
        }
        if let Some(cap) = SUMMARY_CROSS_BIN.captures(line) {
            if let Some(cross) = group.crosses.last_mut() {
                let name = format!("<{}>", &cap[1]);
                cross.bins.push(summary_bin(&name, &cap[2], &cap[3]));
            }
        }
    }

    let mut report = CoverageReport {
        source: SOURCE_SUMMARY.to_string(),
        total_coverage: 0.0,
        covergroups,
        gaps: Vec::new(),
    };
    report.total_coverage = match overall {
        Some(total) if total != 0.0 => total,
        _ => bin_ratio(&report),
    };
    report
}

fn summary_bin(name: &str, hits: &str, goal: &str) -> CoverageBin {
    CoverageBin::new(name, hits.parse().unwrap_or(0), goal.parse().unwrap_or(1))
}

/// `cp_addr x cp_write` names the cross after its first coverpoint.
fn parse_cross_header(rest: &str) -> CrossCoverage {
    let tokens: Vec<&str> = rest
        .split_whitespace()
        .filter(|t| !t.eq_ignore_ascii_case("x"))
        .collect();
    let name = tokens.first().copied().unwrap_or_default().to_string();
    let coverpoints = if tokens.len() > 1 {
        tokens.iter().map(|t| t.to_string()).collect()
    } else {
        Vec::new()
    };
    CrossCoverage {
        name,
        coverpoints,
        bins: Vec::new(),
    }
}

fn bin_ratio(report: &CoverageReport) -> f64 {
    match report.bin_counts() {
        (_, 0) => 0.0,
        (covered, total) => covered as f64 / total as f64 * 100.0,
    }
}
