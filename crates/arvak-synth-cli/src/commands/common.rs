//! File helpers shared by the commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use arvak_synth::{SynthesisConfig, SynthesisRequest};
use serde::Serialize;

/// Load a synthesis request from a JSON file.
pub fn load_request(path: &Path) -> Result<SynthesisRequest> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid synthesis request in {}", path.display()))
}

/// Load an optimizer configuration; `.json` files are read as JSON,
/// anything else as YAML.
pub fn load_config(path: &Path) -> Result<SynthesisConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let config = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON config {}", path.display()))?
    } else {
        serde_yaml_ng::from_str(&content)
            .with_context(|| format!("Invalid YAML config {}", path.display()))?
    };
    Ok(config)
}

/// Write `value` as pretty JSON to `output`, or to stdout.
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}
