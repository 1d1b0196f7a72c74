//! Random command implementation.

use std::path::Path;

use anyhow::Result;
use arvak_synth::SynthesisRequest;
use arvak_synth::random::random_unitary;
use arvak_synth::tensor::{MAX_QUBITS, MIN_QUBITS};
use console::style;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::common::write_json;

/// Execute the random command.
pub fn execute(
    qubits: usize,
    num_gates: usize,
    seed: Option<u64>,
    output: Option<&Path>,
) -> Result<()> {
    if !(MIN_QUBITS..=MAX_QUBITS).contains(&qubits) {
        anyhow::bail!("Qubit count must be between {MIN_QUBITS} and {MAX_QUBITS}, got {qubits}");
    }
    if num_gates == 0 {
        anyhow::bail!("num-gates must be at least 1");
    }

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let target = random_unitary(1 << qubits, &mut rng);

    let mut request = SynthesisRequest::new(&target, num_gates);
    if let Some(s) = seed {
        request = request.with_seed(s);
    }

    write_json(&request, output)?;
    if let Some(path) = output {
        eprintln!(
            "{} Wrote {}-qubit request to {}",
            style("✓").green().bold(),
            qubits,
            style(path.display()).green()
        );
    }
    Ok(())
}
