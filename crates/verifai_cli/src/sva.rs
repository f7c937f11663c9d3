//! `verifai sva` — generate a bound assertion checker for one RTL file.

use verifai_sva::{AssertionType, SvaGenerator};

use crate::pipeline::{emit, load_rtl};
use crate::{GlobalArgs, SvaArgs};

/// Runs the `verifai sva` command. Returns exit code 0.
pub fn run(args: &SvaArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let rtl = load_rtl(&args.file)?;
    let module = SvaGenerator::new(&rtl).generate_all();

    if !global.quiet {
        let count = |kind: AssertionType| {
            module
                .properties
                .iter()
                .filter(|p| p.assertion_type == kind)
                .count()
        };
        eprintln!(
            "   Generated {} for {}: {} asserts, {} assumes, {} covers",
            module.checker_name(),
            module.module_name,
            count(AssertionType::Assert),
            count(AssertionType::Assume),
            count(AssertionType::Cover)
        );
    }

    emit(args.output.as_deref(), &module.to_sv(), global)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::*;

    #[test]
    fn writes_checker_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("apb_slave.sv");
        std::fs::write(&file, APB_SLAVE).unwrap();
        let out = dir.path().join("sva/apb_slave_sva.sv");

        let args = SvaArgs {
            file,
            output: Some(out.clone()),
        };
        assert_eq!(run(&args, &quiet_globals(dir.path())).unwrap(), 0);

        let sv = std::fs::read_to_string(out).unwrap();
        assert!(sv.contains("module apb_slave_sva ("));
        assert!(sv.contains("apb_penable_needs_psel"));
        assert!(sv.contains("bind apb_slave apb_slave_sva u_apb_slave_sva (.*);"));
    }
}
