//! `verifai bundle` — write a testbench bundle for one RTL file.

use std::path::PathBuf;

use verifai_gen::{placeholder_package, predict_bugs, quality_score, TestbenchBundle};
use verifai_sva::generate_sva_from_parsed;

use crate::pipeline::{load_config, load_rtl};
use crate::{BundleArgs, GlobalArgs};

/// Runs the `verifai bundle` command.
///
/// Without `--testbench` the package is a placeholder. Returns exit code 0.
pub fn run(args: &BundleArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let rtl = load_rtl(&args.file)?;

    let testbench = match &args.testbench {
        Some(path) => Some(std::fs::read_to_string(path).map_err(|e| {
            format!("failed to read testbench {}: {e}", path.display())
        })?),
        None => None,
    };
    let code = testbench
        .clone()
        .unwrap_or_else(|| placeholder_package(&rtl.module_name));

    let mut bundle = TestbenchBundle::new(&rtl, &code);
    if args.with_sva {
        bundle = bundle.with_sva(&generate_sva_from_parsed(&rtl));
    }

    let dir = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.dir));
    let written = bundle.write_to(&dir)?;

    if !global.quiet {
        eprintln!(
            "   Bundled {} ({} files) into {}",
            bundle.module_name(),
            written.len(),
            dir.display()
        );
        for path in &written {
            eprintln!("     Created {}", path.display());
        }
        match &testbench {
            Some(code) => {
                let score = quality_score(&rtl, code);
                eprintln!(
                    "   Quality score: {}/100 (completeness {}, protocol {}, coverage {}, quality {})",
                    score.score,
                    score.breakdown.completeness,
                    score.breakdown.protocol,
                    score.breakdown.coverage,
                    score.breakdown.quality
                );
            }
            None => eprintln!("warning: no --testbench given, wrote a placeholder package"),
        }
        for bug in predict_bugs(&rtl) {
            eprintln!("   [{}] {}: {}", bug.severity, bug.title, bug.description);
        }
    }

    Ok(0)
}
