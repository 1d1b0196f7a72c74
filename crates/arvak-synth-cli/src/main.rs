//! Arvak block synthesis command-line interface.
//!
//! ```text
//!   request.json ──► arvak-synth synth ──► result.json
//!   (unitary, num-gates, blocks?, seed?)   (gates, cost, iterations, converged)
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{info, random, synth, version};

/// Arvak synth - approximate multi-qubit unitaries with two-qubit blocks
#[derive(Parser)]
#[command(name = "arvak-synth")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a request file into a block circuit
    Synth {
        /// Request file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Optimizer configuration (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        overrides: synth::Overrides,
    },

    /// Write a request for a Haar-random target
    Random {
        /// Number of qubits (3-5)
        #[arg(short, long, default_value = "3")]
        qubits: usize,

        /// Number of two-qubit blocks
        #[arg(short, long, default_value = "4")]
        num_gates: usize,

        /// RNG seed for the target; also stored in the request
        #[arg(short, long)]
        seed: Option<u64>,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the synthesizer's name, required keys and default configuration
    Info,

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Synth {
            input,
            output,
            config,
            overrides,
        } => synth::execute(&input, output.as_deref(), config.as_deref(), &overrides),

        Commands::Random {
            qubits,
            num_gates,
            seed,
            output,
        } => random::execute(qubits, num_gates, seed, output.as_deref()),

        Commands::Info => info::execute(),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
