//! Testbench bundle layout.
//!
//! A bundle is the set of files handed to the user: the testbench package,
//! an interface and top module derived from the design's real ports,
//! simulator makefiles, a README, and optionally the bound assertion module.

use std::fs;
use std::path::{Path, PathBuf};

use verifai_rtl::{ParsedRtl, Port, PortDirection};
use verifai_sva::SvaGenerator;

use crate::error::GenError;

/// One file of a bundle, relative to the bundle root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleFile {
    /// Relative path, e.g. `tb/uart_if.sv`.
    pub path: PathBuf,
    /// File contents.
    pub contents: String,
}

/// The files of a testbench delivery for one design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestbenchBundle {
    module_name: String,
    files: Vec<BundleFile>,
}

impl TestbenchBundle {
    /// Lays out the bundle around a generated testbench package.
    pub fn new(rtl: &ParsedRtl, testbench_code: &str) -> Self {
        let m = rtl.module_name.as_str();
        let sva = SvaGenerator::new(rtl);
        let files = vec![
            file(format!("tb/{m}_tb_pkg.sv"), testbench_code.to_string()),
            file(format!("tb/{m}_if.sv"), interface_source(rtl, &sva)),
            file(format!("tb/{m}_tb_top.sv"), top_source(rtl, &sva)),
        ];
        let mut bundle = Self {
            module_name: m.to_string(),
            files,
        };
        bundle.refresh_scripts();
        bundle
    }

    /// Adds the assertion module as `tb/<module>_sva.sv` and lists it in the
    /// makefiles and README.
    pub fn with_sva(mut self, sva_code: &str) -> Self {
        let path = PathBuf::from(format!("tb/{}_sva.sv", self.module_name));
        self.files.retain(|f| f.path != path);
        self.files.push(file(path, sva_code.to_string()));
        self.refresh_scripts();
        self
    }

    /// The design module this bundle verifies.
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// All files in layout order.
    pub fn files(&self) -> &[BundleFile] {
        &self.files
    }

    /// Looks up a file by its relative path.
    pub fn file(&self, path: &str) -> Option<&BundleFile> {
        self.files.iter().find(|f| f.path == Path::new(path))
    }

    /// Writes every file under `dir`, creating directories as needed.
    /// Returns the written paths.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, GenError> {
        let mut written = Vec::with_capacity(self.files.len());
        for f in &self.files {
            let target = dir.join(&f.path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|source| GenError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            fs::write(&target, &f.contents).map_err(|source| GenError::Io {
                path: target.clone(),
                source,
            })?;
            tracing::debug!(path = %target.display(), bytes = f.contents.len(), "wrote bundle file");
            written.push(target);
        }
        Ok(written)
    }

    /// Testbench sources in compile order, as names relative to `tb/`.
    fn tb_sources(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| f.path.extension().is_some_and(|ext| ext == "sv"))
            .filter_map(|f| f.path.file_name()?.to_str().map(str::to_string))
            .collect()
    }

    /// Regenerates the makefiles and README from the current source list.
    fn refresh_scripts(&mut self) {
        self.files
            .retain(|f| f.path.extension().is_some_and(|ext| ext == "sv"));
        let sources = self.tb_sources();
        let m = self.module_name.clone();
        self.files.push(file("tb/Makefile.vcs", vcs_makefile(&m, &sources)));
        self.files.push(file("tb/Makefile.questa", questa_makefile(&m, &sources)));
        self.files.push(file("README.md", readme(&m, &sources)));
    }
}

/// A compilable stand-in package with an empty `<module>_base_test`, for
/// bundles built before a testbench has been generated.
pub fn placeholder_package(module_name: &str) -> String {
    let m = module_name;
    format!(
        r#"// Placeholder package for {m}. Replace with a generated testbench.
package {m}_tb_pkg;
  import uvm_pkg::*;
  `include "uvm_macros.svh"

  class {m}_base_test extends uvm_test;
    `uvm_component_utils({m}_base_test)

    function new(string name = "{m}_base_test", uvm_component parent = null);
      super.new(name, parent);
    endfunction
  endclass
endpackage
"#
    )
}

fn file(path: impl Into<PathBuf>, contents: String) -> BundleFile {
    BundleFile {
        path: path.into(),
        contents,
    }
}

fn declaration(port: &Port) -> String {
    let width = port.width_str();
    if width.is_empty() {
        format!("logic {}", port.name)
    } else {
        format!("logic {width} {}", port.name)
    }
}

/// The interface carries every port except the clock, which is an
/// interface port. Reset is left out of the driver clocking block since the
/// top module drives it.
fn interface_source(rtl: &ParsedRtl, sva: &SvaGenerator<'_>) -> String {
    let m = &rtl.module_name;
    let clock = sva.clock();
    let edge = sva.clock_edge();
    let reset = sva.reset();

    let signals: Vec<&Port> = rtl.ports.iter().filter(|p| p.name != clock).collect();

    let mut out = format!("// Interface for {m}\ninterface {m}_if (input logic {clock});\n");
    for port in &signals {
        out.push_str(&format!("  {};\n", declaration(port)));
    }

    let drive: Vec<String> = signals
        .iter()
        .filter(|p| Some(p.name.as_str()) != reset)
        .map(|p| {
            let dir = match p.direction {
                PortDirection::Input => "output",
                PortDirection::Output => "input",
                PortDirection::Inout => "inout",
            };
            format!("    {dir} {};\n", p.name)
        })
        .collect();
    out.push_str(&format!(
        "\n  clocking drv_cb @({edge} {clock});\n    default input #1step output #1;\n{}  endclocking\n",
        drive.concat()
    ));

    let observe: Vec<String> = signals
        .iter()
        .map(|p| format!("    input {};\n", p.name))
        .collect();
    out.push_str(&format!(
        "\n  clocking mon_cb @({edge} {clock});\n    default input #1step;\n{}  endclocking\n",
        observe.concat()
    ));

    out.push_str(&format!(
        "\n  modport DRV (clocking drv_cb, input {clock});\n  modport MON (clocking mon_cb, input {clock});\nendinterface\n"
    ));
    out
}

fn top_source(rtl: &ParsedRtl, sva: &SvaGenerator<'_>) -> String {
    let m = &rtl.module_name;
    let clock = sva.clock();

    let reset_block = match sva.reset() {
        Some(reset) => {
            let (active, inactive) = if sva.is_reset_active_low() {
                ("1'b0", "1'b1")
            } else {
                ("1'b1", "1'b0")
            };
            format!(
                "\n  initial begin\n    vif.{reset} = {active};\n    repeat (5) @(posedge {clock});\n    vif.{reset} = {inactive};\n  end\n"
            )
        }
        None => String::new(),
    };

    let connections: Vec<String> = rtl
        .ports
        .iter()
        .map(|p| {
            if p.name == clock {
                format!("    .{0} ({0})", p.name)
            } else {
                format!("    .{0} (vif.{0})", p.name)
            }
        })
        .collect();

    format!(
        r#"`timescale 1ns/1ps

module {m}_tb_top;
  import uvm_pkg::*;
  `include "uvm_macros.svh"
  import {m}_tb_pkg::*;

  logic {clock};

  {m}_if vif ({clock});

  initial begin
    {clock} = 1'b0;
    forever #5 {clock} = ~{clock};
  end
{reset_block}
  {m} dut (
{ports}
  );

  initial begin
    uvm_config_db#(virtual {m}_if)::set(null, "*", "vif", vif);
    run_test("{m}_base_test");
  end
endmodule
"#,
        ports = connections.join(",\n")
    )
}

fn source_lines(sources: &[String]) -> String {
    sources
        .iter()
        .map(|s| format!(" \\\n\t\t{s}"))
        .collect()
}

fn vcs_makefile(m: &str, sources: &[String]) -> String {
    format!(
        "# Makefile for VCS simulation
TB_TOP = {m}_tb_top
DUT = ../rtl/{m}.sv

# VCS flags
VCS_FLAGS = -full64 -sverilog -timescale=1ns/1ps
VCS_FLAGS += +define+UVM_NO_DEPRECATED
VCS_FLAGS += -ntb_opts uvm-1.2

# Compile
compile:
\tvcs $(VCS_FLAGS) -top $(TB_TOP) -o simv \\
\t\t$(DUT){files}

# Run
run:
\t./simv +UVM_TESTNAME={m}_base_test +UVM_VERBOSITY=UVM_MEDIUM

# Run with coverage
run_cov:
\t./simv +UVM_TESTNAME={m}_base_test -cm line+cond+fsm+tgl

# Clean
clean:
\trm -rf simv* csrc *.log *.vpd DVEfiles coverage*

.PHONY: compile run run_cov clean
",
        files = source_lines(sources)
    )
}

fn questa_makefile(m: &str, sources: &[String]) -> String {
    format!(
        "# Makefile for Questa simulation
TB_TOP = {m}_tb_top
DUT = ../rtl/{m}.sv

# Questa flags
VLOG_FLAGS = -sv -timescale 1ns/1ps
VSIM_FLAGS = -c -do \"run -all; quit\"

# Compile
compile:
\tvlib work
\tvlog $(VLOG_FLAGS) +define+UVM_NO_DEPRECATED \\
\t\t$(DUT){files}

# Run
run:
\tvsim $(VSIM_FLAGS) +UVM_TESTNAME={m}_base_test $(TB_TOP)

# GUI
gui:
\tvsim +UVM_TESTNAME={m}_base_test $(TB_TOP)

# Clean
clean:
\trm -rf work transcript *.wlf

.PHONY: compile run gui clean
",
        files = source_lines(sources)
    )
}

fn readme(m: &str, sources: &[String]) -> String {
    let tree: String = sources
        .iter()
        .map(|s| format!("├── {s}\n"))
        .collect();
    format!(
        r#"# {m} UVM Testbench

## Directory Structure
```
tb/
{tree}├── Makefile.vcs
└── Makefile.questa
```

## Quick Start

### VCS
```bash
cd tb
make -f Makefile.vcs compile
make -f Makefile.vcs run
```

### Questa
```bash
cd tb
make -f Makefile.questa compile
make -f Makefile.questa run
```

## Test Configuration
- Default test: {m}_base_test
- Verbosity: UVM_MEDIUM (configurable via +UVM_VERBOSITY)
- The makefiles expect the design at `../rtl/{m}.sv`
"#
    )
}
