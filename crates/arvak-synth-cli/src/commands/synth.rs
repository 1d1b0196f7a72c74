//! Synth command implementation.

use std::path::Path;

use anyhow::Result;
use arvak_synth::{SvdSynthesizer, SynthesisConfig, TracingObserver};
use clap::Args;
use console::style;
use tracing::debug;

use super::common::{load_config, load_request, write_json};

/// Command-line overrides applied on top of the config file.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Convergence threshold on the cost change
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Maximum number of sweep pairs
    #[arg(long)]
    pub max_iters: Option<usize>,

    /// Damping weight of the current block in each update
    #[arg(long)]
    pub slowdown_factor: Option<f64>,

    /// Rebuild the circuit tensor every N iterations
    #[arg(long)]
    pub reinit_interval: Option<usize>,

    /// Report progress every N iterations
    #[arg(long)]
    pub log_interval: Option<usize>,

    /// Override the request's seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the request's block count
    #[arg(long)]
    pub num_gates: Option<usize>,
}

impl Overrides {
    fn apply(&self, mut config: SynthesisConfig) -> SynthesisConfig {
        if let Some(v) = self.threshold {
            config = config.with_threshold(v);
        }
        if let Some(v) = self.max_iters {
            config = config.with_max_iters(v);
        }
        if let Some(v) = self.slowdown_factor {
            config = config.with_slowdown_factor(v);
        }
        if let Some(v) = self.reinit_interval {
            config = config.with_reinit_interval(v);
        }
        if let Some(v) = self.log_interval {
            config = config.with_log_interval(v);
        }
        config
    }
}

/// Execute the synth command.
pub fn execute(
    input: &Path,
    output: Option<&Path>,
    config: Option<&Path>,
    overrides: &Overrides,
) -> Result<()> {
    let mut request = load_request(input)?;
    if let Some(seed) = overrides.seed {
        request.seed = Some(seed);
    }
    if let Some(n) = overrides.num_gates {
        request.num_gates = n;
    }

    let base = match config {
        Some(path) => load_config(path)?,
        None => SynthesisConfig::default(),
    };
    let config = overrides.apply(base);
    debug!(?config, "resolved synthesis configuration");
    let synth = SvdSynthesizer::new(config)?;

    eprintln!(
        "{} Synthesizing {} with {} blocks ({})",
        style("→").cyan().bold(),
        style(input.display()).green(),
        request.num_gates,
        synth.name()
    );

    let result = synth.expand_request(&request, &mut TracingObserver)?;

    if result.converged {
        eprintln!(
            "{} Converged after {} iterations, cost {:.3e}",
            style("✓").green().bold(),
            result.iterations,
            result.cost
        );
    } else {
        eprintln!(
            "{} Stopped at iteration cap {}, cost {:.3e}",
            style("!").yellow().bold(),
            result.iterations,
            result.cost
        );
    }

    write_json(&result, output)?;
    if let Some(path) = output {
        eprintln!("  Output: {}", style(path.display()).green());
    }
    Ok(())
}
