//! Info command implementation.

use anyhow::Result;
use arvak_synth::tensor::{MAX_QUBITS, MIN_QUBITS};
use arvak_synth::{SvdSynthesizer, SynthesisConfig};
use console::style;

/// Execute the info command.
pub fn execute() -> Result<()> {
    let synth = SvdSynthesizer::default();

    println!("{} {}", style("Synthesizer:").bold(), style(synth.name()).cyan());
    println!(
        "{} {}",
        style("Required keys:").bold(),
        synth.required_keys().join(", ")
    );
    println!(
        "{} {MIN_QUBITS}-{MAX_QUBITS}",
        style("Supported qubits:").bold()
    );
    println!();
    println!("{}", style("Default configuration:").bold());
    print!("{}", serde_yaml_ng::to_string(&SynthesisConfig::default())?);
    Ok(())
}
