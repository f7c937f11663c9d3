//! `verifai scan` — analyze every RTL file under a directory.
//!
//! Files are parsed in parallel; parsing is pure, so each file is
//! independent. Results are reported in path order.

use std::path::PathBuf;

use rayon::prelude::*;
use serde::Serialize;
use verifai_rtl::RtlSummary;

use crate::pipeline::discover_rtl_files;
use crate::{GlobalArgs, ReportFormat, ScanArgs};

/// The outcome for one scanned file.
#[derive(Debug, Serialize)]
pub struct ScanEntry {
    /// The file.
    pub path: PathBuf,
    /// The summary, when the file could be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RtlSummary>,
    /// The read error otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Runs the `verifai scan` command.
///
/// Returns exit code 0 when every file was read, 1 otherwise.
pub fn run(args: &ScanArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let files = discover_rtl_files(&args.dir)?;
    if files.is_empty() {
        if !global.quiet {
            eprintln!("warning: no RTL files found in {}", args.dir.display());
        }
        return Ok(0);
    }

    let entries = scan_files(files);
    let failures = entries.iter().filter(|e| e.error.is_some()).count();

    match args.format {
        ReportFormat::Text => {
            for entry in &entries {
                println!("{}", render_line(entry));
            }
            if !global.quiet {
                eprintln!("   Scanned {} files, {} failed", entries.len(), failures);
            }
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }

    Ok(if failures == 0 { 0 } else { 1 })
}

/// Parses `files` in parallel and returns entries sorted by path.
pub fn scan_files(files: Vec<PathBuf>) -> Vec<ScanEntry> {
    let mut entries: Vec<ScanEntry> = files
        .into_par_iter()
        .map(|path| match verifai_rtl::parse_file(&path) {
            Ok(rtl) => ScanEntry {
                summary: Some(RtlSummary::from(&rtl)),
                error: None,
                path,
            },
            Err(e) => ScanEntry {
                summary: None,
                error: Some(e.to_string()),
                path,
            },
        })
        .collect();
    entries.sort_by(|a, b| a.path.cmp(&b.path));
    tracing::debug!(files = entries.len(), "scan complete");
    entries
}

fn render_line(entry: &ScanEntry) -> String {
    let path = entry.path.display();
    match (&entry.summary, &entry.error) {
        (Some(summary), _) => {
            let groups = &summary.ports;
            let ports = groups.inputs.len() + groups.outputs.len() + groups.inouts.len();
            let protocol = summary
                .protocol_hints
                .first()
                .map_or("-", |hint| hint.protocol.display_name());
            let fsm = if summary.fsm.detected { ", fsm" } else { "" };
            format!("{path}: {} ({ports} ports, {protocol}{fsm})", summary.module_name)
        }
        (None, Some(error)) => format!("{path}: error: {error}"),
        (None, None) => format!("{path}: -"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::test_support::*;

    fn write_tree(root: &std::path::Path) {
        std::fs::create_dir_all(root.join("periph")).unwrap();
        std::fs::write(root.join("periph/apb_slave.sv"), APB_SLAVE).unwrap();
        std::fs::write(
            root.join("ctrl.v"),
            "module ctrl (input clk, input rst_n, output reg done);\n\
             localparam IDLE = 2'd0;\n\
             localparam ST_BUSY = 2'd1;\n\
             reg [1:0] state;\n\
             always @(posedge clk) state <= IDLE;\n\
             endmodule",
        )
        .unwrap();
    }

    #[test]
    fn entries_sorted_by_path() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(dir.path());
        let files = discover_rtl_files(dir.path()).unwrap();
        let entries = scan_files(files.into_iter().rev().collect());
        let names: Vec<_> = entries
            .iter()
            .map(|e| e.summary.as_ref().unwrap().module_name.clone())
            .collect();
        assert_eq!(names, vec!["ctrl", "apb_slave"]);
    }

    #[test]
    fn line_format() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(dir.path());
        let entries = scan_files(discover_rtl_files(dir.path()).unwrap());
        let line = render_line(&entries[1]);
        assert!(line.ends_with("apb_slave (10 ports, APB)"), "{line}");
        let line = render_line(&entries[0]);
        assert!(line.ends_with("ctrl (3 ports, -, fsm)"), "{line}");
    }

    #[test]
    fn unreadable_file_is_reported() {
        let entries = scan_files(vec![PathBuf::from("/nonexistent/x.sv")]);
        assert!(entries[0].error.is_some());
        assert!(render_line(&entries[0]).contains("error:"));
    }

    #[test]
    fn run_on_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let global = quiet_globals(dir.path());
        let args = ScanArgs {
            dir: dir.path().to_path_buf(),
            format: ReportFormat::Json,
        };
        assert_eq!(run(&args, &global).unwrap(), 0);
    }
}
