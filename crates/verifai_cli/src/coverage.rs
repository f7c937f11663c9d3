//! `verifai coverage` — coverage gap analysis and closure sequences.

use verifai_coverage::{
    analyze_coverage, generate_closure_sequences, generate_report, parse_report, CoverageError,
};

use crate::pipeline::{emit, load_config};
use crate::{CoverageArgs, GlobalArgs, ReportFormat};

/// Module name used for closure sequences when neither `--module` nor
/// `[project] name` gives one.
const FALLBACK_MODULE: &str = "dut";

/// Runs the `verifai coverage` command. Returns exit code 0.
pub fn run(args: &CoverageArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let target = args.target.unwrap_or(config.analysis.coverage_target);
    if !(0.0..=100.0).contains(&target) {
        return Err(format!("coverage target must be within 0-100, got {target}").into());
    }

    let text = std::fs::read_to_string(&args.report).map_err(|source| CoverageError::Io {
        path: args.report.clone(),
        source,
    })?;
    let mut report = parse_report(&text, args.input_format.into())?;
    report.gaps = analyze_coverage(&report, target);
    tracing::info!(
        source = %report.source,
        total = report.total_coverage,
        gaps = report.gaps.len(),
        "coverage analyzed"
    );

    match args.format {
        ReportFormat::Text => print!("{}", generate_report(&report)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if let Some(path) = &args.closure {
        let module = args
            .module
            .clone()
            .or_else(|| Some(config.project.name.clone()).filter(|n| !n.is_empty()))
            .unwrap_or_else(|| FALLBACK_MODULE.to_string());
        let sequences = generate_closure_sequences(&report, &module, config.analysis.closure_limit);
        emit(Some(path), &sequences, global)?;
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::*;
    use crate::InputFormat;

    const SUMMARY: &str = "\
Covergroup: apb_cg
  Coverpoint: addr_cp
    bin low: 10/10 (100.0%)
    bin high: 0/10 (0.0%)
  Coverpoint: op_cp
    bin read: 7/10 (70.0%)
Overall Coverage: 56.7%
";

    fn args(dir: &std::path::Path) -> CoverageArgs {
        let report = dir.join("cov.txt");
        std::fs::write(&report, SUMMARY).unwrap();
        CoverageArgs {
            report,
            input_format: InputFormat::Summary,
            target: None,
            module: None,
            closure: Some(dir.join("closure_seq.sv")),
            format: ReportFormat::Json,
        }
    }

    #[test]
    fn closure_uses_project_name() {
        let dir = tempfile::tempdir().unwrap();
        let global = quiet_globals(dir.path());
        std::fs::write(dir.path().join("verifai.toml"), "[project]\nname = \"apb_slave\"").unwrap();

        let args = args(dir.path());
        assert_eq!(run(&args, &global).unwrap(), 0);
        let seq = std::fs::read_to_string(dir.path().join("closure_seq.sv")).unwrap();
        assert!(seq.contains("class apb_slave_coverage_closure_seq extends apb_slave_base_seq;"));
        assert!(seq.contains("// === Close gaps in apb_cg.addr_cp ==="));
    }

    #[test]
    fn module_flag_and_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let global = quiet_globals(dir.path());

        let mut args = args(dir.path());
        assert_eq!(run(&args, &global).unwrap(), 0);
        let seq = std::fs::read_to_string(dir.path().join("closure_seq.sv")).unwrap();
        assert!(seq.contains("class dut_coverage_closure_seq"));

        args.module = Some("uart".into());
        run(&args, &global).unwrap();
        let seq = std::fs::read_to_string(dir.path().join("closure_seq.sv")).unwrap();
        assert!(seq.contains("class uart_coverage_closure_seq"));
    }

    #[test]
    fn target_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let global = quiet_globals(dir.path());
        let mut args = args(dir.path());
        args.target = Some(150.0);
        let err = run(&args, &global).unwrap_err();
        assert!(err.to_string().contains("0-100"));
    }

    #[test]
    fn missing_report() {
        let dir = tempfile::tempdir().unwrap();
        let global = quiet_globals(dir.path());
        let mut args = args(dir.path());
        args.report = dir.path().join("nope.txt");
        assert!(run(&args, &global).is_err());
    }
}
