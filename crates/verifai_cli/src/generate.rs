//! `verifai prompt`, `verifai context`, and `verifai wavedrom` — inputs for
//! testbench generation, printed to stdout.

use verifai_gen::{build_testbench_prompt, wavedrom, TemplateContext, SYSTEM_PROMPT};

use crate::pipeline::{load_config, load_rtl};
use crate::{ContextArgs, GlobalArgs, PromptArgs, WavedromArgs};

/// Runs the `verifai prompt` command. Returns exit code 0.
pub fn run_prompt(args: &PromptArgs, _global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let rtl = load_rtl(&args.file)?;
    if args.system {
        println!("{SYSTEM_PROMPT}\n");
    }
    print!("{}", build_testbench_prompt(&rtl));
    Ok(0)
}

/// Runs the `verifai context` command. Protocol options come from the
/// configuration. Returns exit code 0.
pub fn run_context(args: &ContextArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = load_config(global)?;
    let rtl = load_rtl(&args.file)?;
    let context = TemplateContext::from_parsed(&rtl, &config.protocol);
    println!("{}", serde_json::to_string_pretty(&context)?);
    Ok(0)
}

/// Runs the `verifai wavedrom` command. Returns exit code 0.
pub fn run_wavedrom(args: &WavedromArgs, _global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    println!("{}", wavedrom(&args.protocol));
    Ok(0)
}
