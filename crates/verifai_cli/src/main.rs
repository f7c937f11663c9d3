//! VerifAI CLI — structural analysis and verification collateral for RTL.
//!
//! Provides `verifai analyze` and `verifai scan` for design inspection,
//! `verifai sva` for assertion generation, `verifai coverage` for coverage
//! gap analysis, `verifai spec` for natural-language design descriptions,
//! and `verifai prompt`, `context`, `bundle`, and `wavedrom` for testbench
//! generation inputs and outputs.

#![warn(missing_docs)]

mod analyze;
mod bundle;
mod coverage;
mod generate;
mod pipeline;
mod scan;
mod spec;
mod sva;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// VerifAI — RTL analysis for verification engineers.
#[derive(Parser, Debug)]
#[command(name = "verifai", version, about = "VerifAI RTL analysis toolkit")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to a `verifai.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract the structure of one RTL file.
    Analyze(AnalyzeArgs),
    /// Analyze every `.v`/`.sv` file under a directory.
    Scan(ScanArgs),
    /// Generate a bound SVA checker module.
    Sva(SvaArgs),
    /// Find coverage gaps and suggest closure sequences.
    Coverage(CoverageArgs),
    /// Print the testbench generation request for a design.
    Prompt(PromptArgs),
    /// Print the template context for a design as JSON.
    Context(ContextArgs),
    /// Write a testbench bundle for a design.
    Bundle(BundleArgs),
    /// Print a WaveDrom timing diagram for a protocol.
    Wavedrom(WavedromArgs),
    /// Extract protocol, widths, and registers from a design description.
    Spec(SpecArgs),
}

/// Arguments for the `verifai analyze` subcommand.
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// RTL source file.
    pub file: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `verifai scan` subcommand.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Directory searched recursively for RTL files.
    pub dir: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `verifai sva` subcommand.
#[derive(Parser, Debug)]
pub struct SvaArgs {
    /// RTL source file.
    pub file: PathBuf,

    /// Output file (default: stdout).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `verifai coverage` subcommand.
#[derive(Parser, Debug)]
pub struct CoverageArgs {
    /// Coverage report file.
    pub report: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    pub input_format: InputFormat,

    /// Per-bin coverage target in percent (default: from config, else 95).
    #[arg(long)]
    pub target: Option<f64>,

    /// Module name used for generated sequence classes.
    #[arg(long)]
    pub module: Option<String>,

    /// Write closure sequences to this file.
    #[arg(long)]
    pub closure: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `verifai prompt` subcommand.
#[derive(Parser, Debug)]
pub struct PromptArgs {
    /// RTL source file.
    pub file: PathBuf,

    /// Also print the system instruction.
    #[arg(long)]
    pub system: bool,
}

/// Arguments for the `verifai context` subcommand.
#[derive(Parser, Debug)]
pub struct ContextArgs {
    /// RTL source file.
    pub file: PathBuf,
}

/// Arguments for the `verifai bundle` subcommand.
#[derive(Parser, Debug)]
pub struct BundleArgs {
    /// RTL source file.
    pub file: PathBuf,

    /// Output directory (default: `[output] dir` from config).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Generated testbench package to include (default: a placeholder).
    #[arg(long)]
    pub testbench: Option<PathBuf>,

    /// Include the generated SVA checker.
    #[arg(long)]
    pub with_sva: bool,
}

/// Arguments for the `verifai wavedrom` subcommand.
#[derive(Parser, Debug)]
pub struct WavedromArgs {
    /// Protocol name, e.g. `apb` or `axi4-lite`.
    pub protocol: String,
}

/// Arguments for the `verifai spec` subcommand.
#[derive(Parser, Debug)]
pub struct SpecArgs {
    /// Text file with the natural-language description.
    pub file: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Output file (default: stdout).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Output format for reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Coverage report input format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    /// Detect from content.
    Auto,
    /// JSON export.
    Json,
    /// Simple indented text.
    Simple,
    /// Synopsys VCS / URG text.
    Vcs,
    /// Siemens Questa text.
    Questa,
    /// `hits/goal (pct%)` summary text.
    Summary,
}

impl From<InputFormat> for verifai_coverage::ReportFormat {
    fn from(format: InputFormat) -> Self {
        match format {
            InputFormat::Auto => Self::Auto,
            InputFormat::Json => Self::Json,
            InputFormat::Simple => Self::Simple,
            InputFormat::Vcs => Self::Vcs,
            InputFormat::Questa => Self::Questa,
            InputFormat::Summary => Self::Summary,
        }
    }
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Verbosity level from repeated `-v`.
    pub verbose: u8,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Analyze(ref args) => analyze::run(args, &global),
        Command::Scan(ref args) => scan::run(args, &global),
        Command::Sva(ref args) => sva::run(args, &global),
        Command::Coverage(ref args) => coverage::run(args, &global),
        Command::Prompt(ref args) => generate::run_prompt(args, &global),
        Command::Context(ref args) => generate::run_context(args, &global),
        Command::Bundle(ref args) => bundle::run(args, &global),
        Command::Wavedrom(ref args) => generate::run_wavedrom(args, &global),
        Command::Spec(ref args) => spec::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Default log filter for the given flags.
fn log_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` takes precedence over
/// the flags.
fn init_logging(global: &GlobalArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(global.quiet, global.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
