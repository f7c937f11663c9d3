//! Functional coverage data model.
//!
//! Percentages are bin-count based: a coverpoint with three of four bins
//! covered is at 75 %, regardless of hit counts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Hit state of a single bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinStatus {
    /// `hits >= goal`.
    Covered,
    /// Some hits, but fewer than the goal.
    Partial,
    /// No hits.
    Uncovered,
}

/// One coverage bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageBin {
    /// Bin name as reported by the tool.
    #[serde(default)]
    pub name: String,
    /// Observed hit count.
    #[serde(default)]
    pub hits: u64,
    /// Required hit count (`at_least`).
    #[serde(default = "default_goal")]
    pub goal: u64,
}

fn default_goal() -> u64 {
    1
}

impl CoverageBin {
    /// Creates a bin.
    pub fn new(name: impl Into<String>, hits: u64, goal: u64) -> Self {
        Self {
            name: name.into(),
            hits,
            goal,
        }
    }

    /// Whether the bin reached its goal.
    pub fn is_covered(&self) -> bool {
        self.hits >= self.goal
    }

    /// Hit percentage of the goal, capped at 100. A zero goal is 100 %.
    pub fn coverage_pct(&self) -> f64 {
        if self.goal == 0 {
            return 100.0;
        }
        (self.hits as f64 / self.goal as f64 * 100.0).min(100.0)
    }

    /// Classifies the bin.
    pub fn status(&self) -> BinStatus {
        if self.is_covered() {
            BinStatus::Covered
        } else if self.hits > 0 {
            BinStatus::Partial
        } else {
            BinStatus::Uncovered
        }
    }
}

fn covered_pct(bins: &[CoverageBin]) -> f64 {
    if bins.is_empty() {
        return 0.0;
    }
    let covered = bins.iter().filter(|b| b.is_covered()).count();
    covered as f64 / bins.len() as f64 * 100.0
}

/// A coverpoint and its bins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverPoint {
    /// Coverpoint name.
    pub name: String,
    /// Sampled expression, when the report provides it.
    pub expression: String,
    /// Bins in report order.
    pub bins: Vec<CoverageBin>,
}

impl CoverPoint {
    /// Creates an empty coverpoint.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Percentage of covered bins; 0 with no bins.
    pub fn coverage_pct(&self) -> f64 {
        covered_pct(&self.bins)
    }

    /// Bins below their goal.
    pub fn uncovered_bins(&self) -> impl Iterator<Item = &CoverageBin> {
        self.bins.iter().filter(|b| !b.is_covered())
    }
}

/// Cross coverage between coverpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossCoverage {
    /// Cross name.
    pub name: String,
    /// Names of the crossed coverpoints, when known.
    pub coverpoints: Vec<String>,
    /// Cross bins, named like `<a, b>`.
    pub bins: Vec<CoverageBin>,
}

impl CrossCoverage {
    /// Percentage of covered bins; 0 with no bins.
    pub fn coverage_pct(&self) -> f64 {
        covered_pct(&self.bins)
    }
}

/// A covergroup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Covergroup {
    /// Covergroup name.
    pub name: String,
    /// Coverpoints in report order.
    pub coverpoints: Vec<CoverPoint>,
    /// Crosses in report order.
    pub crosses: Vec<CrossCoverage>,
}

impl Covergroup {
    /// Creates an empty covergroup.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// `(covered, total)` bin counts across coverpoints and crosses.
    pub fn bin_counts(&self) -> (usize, usize) {
        let bins = self
            .coverpoints
            .iter()
            .flat_map(|cp| cp.bins.iter())
            .chain(self.crosses.iter().flat_map(|cr| cr.bins.iter()));
        bins.fold((0, 0), |(covered, total), bin| {
            (covered + usize::from(bin.is_covered()), total + 1)
        })
    }

    /// Percentage of covered bins across coverpoints and crosses.
    pub fn coverage_pct(&self) -> f64 {
        match self.bin_counts() {
            (_, 0) => 0.0,
            (covered, total) => covered as f64 / total as f64 * 100.0,
        }
    }
}

/// Urgency of closing a gap. Orders `High < Medium < Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Unhit bins and error or boundary scenarios.
    High,
    /// Everything else.
    Medium,
    /// Mostly-hit bins and catch-all bins.
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority '{other}'")),
        }
    }
}

/// A bin that still needs stimulus, with a suggestion for reaching it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageGap {
    /// Owning covergroup.
    pub covergroup: String,
    /// Owning coverpoint, or the cross name for cross bins.
    pub coverpoint: String,
    /// Bin name.
    pub bin_name: String,
    /// Closing urgency.
    pub priority: Priority,
    /// A randomization constraint body that targets the bin.
    pub suggested_stimulus: String,
    /// Name for a sequence that applies the stimulus.
    pub suggested_sequence: String,
    /// Hits so far.
    pub hit_count: u64,
    /// Hits required.
    pub goal_count: u64,
    /// Bin coverage percentage.
    pub current_coverage: f64,
    /// The target the gap was measured against.
    pub target_coverage: f64,
    /// Additional hits required (at least 1).
    pub hits_needed: u64,
}

/// A ready-to-paste UVM sequence for one gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedSequence {
    /// Sequence class name.
    pub name: String,
    /// One-line purpose.
    pub description: String,
    /// The sequence class source.
    pub uvm_sequence_code: String,
    /// The constraint body used.
    pub stimulus: String,
    /// Estimated percentage of the bin goal one run would add.
    pub expected_coverage_gain: f64,
}

/// A parsed coverage report, optionally annotated with gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageReport {
    /// Which parser produced the report (`json`, `text`, `text_summary`).
    pub source: String,
    /// Overall coverage percentage.
    pub total_coverage: f64,
    /// Covergroups in report order.
    pub covergroups: Vec<Covergroup>,
    /// Gaps found by analysis, most urgent first. Empty until analyzed.
    #[serde(default)]
    pub gaps: Vec<CoverageGap>,
}

impl CoverageReport {
    /// `(covered, total)` bin counts across all covergroups.
    pub fn bin_counts(&self) -> (usize, usize) {
        self.covergroups
            .iter()
            .map(Covergroup::bin_counts)
            .fold((0, 0), |(c, t), (cc, ct)| (c + cc, t + ct))
    }

    /// Gaps with the given priority.
    pub fn gaps_with_priority(&self, priority: Priority) -> impl Iterator<Item = &CoverageGap> {
        self.gaps.iter().filter(move |g| g.priority == priority)
    }
}
