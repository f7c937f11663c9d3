//! Shared plumbing for CLI commands: configuration, file discovery, RTL
//! loading, and output routing.

use std::path::{Path, PathBuf};

use verifai_config::VerifaiConfig;
use verifai_rtl::ParsedRtl;

use crate::GlobalArgs;

/// Resolves the effective configuration from `--config` or the nearest
/// `verifai.toml` above the current directory.
pub fn load_config(global: &GlobalArgs) -> Result<VerifaiConfig, Box<dyn std::error::Error>> {
    let explicit = global.config.as_deref().map(Path::new);
    let cwd = std::env::current_dir()?;
    let (config, source) = verifai_config::discover(explicit, &cwd)?;
    if let Some(path) = source {
        tracing::info!(path = %path.display(), "using configuration");
    }
    Ok(config)
}

/// Parses one RTL file.
pub fn load_rtl(path: &Path) -> Result<ParsedRtl, Box<dyn std::error::Error>> {
    let rtl = verifai_rtl::parse_file(path)?;
    if rtl.is_unknown_module() {
        tracing::warn!(path = %path.display(), "no module declaration found");
    }
    Ok(rtl)
}

/// Recursively collects `.v` and `.sv` files under `dir`, sorted by path.
pub fn discover_rtl_files(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    if !dir.is_dir() {
        return Err(format!("'{}' is not a directory", dir.display()).into());
    }
    let mut files = Vec::new();
    walk_dir(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if is_rtl_source(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Returns `true` for Verilog and SystemVerilog source extensions.
pub fn is_rtl_source(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("v" | "sv")
    )
}

/// Writes `text` to `output`, or to stdout when no path is given.
pub fn emit(
    output: Option<&Path>,
    text: &str,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, text)?;
            if !global.quiet {
                eprintln!("     Wrote {}", path.display());
            }
        }
        None => print!("{text}"),
    }
    Ok(())
}
