//! Synthesis requests as exchanged with the command line.
//!
//! A request carries the required `unitary` and `num-gates` keys plus an
//! optional explicit block list and RNG seed:
//!
//! ```json
//! {
//!   "unitary": [[[1.0, 0.0], [0.0, 0.0], ...], ...],
//!   "num-gates": 3,
//!   "blocks": [
//!     { "location": [0, 1] },
//!     { "location": [1, 2], "fixed": true, "unitary": [[[1.0, 0.0], ...], ...] },
//!     { "location": [0, 2] }
//!   ],
//!   "seed": 7
//! }
//! ```
//!
//! Blocks without a unitary start from a random one. Without `blocks`,
//! `num-gates` free random blocks are placed on nearest-neighbour pairs.

use ndarray::Array2;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SynthError, SynthResult};
use crate::gate::Gate;
use crate::linalg;
use crate::observer::ProgressObserver;
use crate::random;
use crate::svd::{SvdSynthesizer, SynthesisResult};

/// A target unitary plus the blocks to synthesize it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SynthesisRequest {
    /// Target unitary as nested `[re, im]` rows.
    pub unitary: Vec<Vec<Complex64>>,
    /// Number of two-qubit blocks.
    pub num_gates: usize,
    /// Explicit placements; empty means the default placement.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<BlockSpec>,
    /// Seed for random starting unitaries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Placement of one block, optionally with a preset unitary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSpec {
    /// The two qubits the block acts on.
    pub location: [usize; 2],
    /// Starting unitary; random when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unitary: Option<Vec<Vec<Complex64>>>,
    /// Keep this block out of the optimization.
    #[serde(default)]
    pub fixed: bool,
}

impl SynthesisRequest {
    /// Request for `num_gates` blocks on the default placement.
    pub fn new(target: &Array2<Complex64>, num_gates: usize) -> Self {
        Self {
            unitary: linalg::matrix_to_rows(&target.view()),
            num_gates,
            blocks: Vec::new(),
            seed: None,
        }
    }

    /// Set explicit block placements.
    #[must_use]
    pub fn with_blocks(mut self, blocks: Vec<BlockSpec>) -> Self {
        self.blocks = blocks;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The target unitary as a matrix.
    pub fn target(&self) -> SynthResult<Array2<Complex64>> {
        linalg::matrix_from_rows(&self.unitary)
    }

    /// Build the starting block list.
    pub fn initial_gates<R: Rng>(&self, rng: &mut R) -> SynthResult<Vec<Gate>> {
        if self.num_gates == 0 {
            return Err(SynthError::InvalidConfig(
                "num-gates must be at least 1".into(),
            ));
        }
        if self.blocks.is_empty() {
            return random::initial_blocks(self.unitary.len(), self.num_gates, rng);
        }
        if self.blocks.len() != self.num_gates {
            return Err(SynthError::InvalidConfig(format!(
                "num-gates is {} but {} blocks were given",
                self.num_gates,
                self.blocks.len()
            )));
        }
        self.blocks
            .iter()
            .map(|block| {
                let unitary = match &block.unitary {
                    Some(rows) => linalg::matrix_from_rows(rows)?,
                    None => random::random_unitary(4, rng),
                };
                Gate::new(unitary, block.location.to_vec(), block.fixed)
            })
            .collect()
    }
}

impl SvdSynthesizer {
    /// Run a full request: decode the target, build the starting blocks
    /// and expand them.
    pub fn expand_request(
        &self,
        request: &SynthesisRequest,
        observer: &mut dyn ProgressObserver,
    ) -> SynthResult<SynthesisResult> {
        let target = request.target()?;
        let mut rng = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let gates = request.initial_gates(&mut rng)?;
        debug!(
            num_gates = gates.len(),
            seeded = request.seed.is_some(),
            "expanding synthesis request"
        );
        self.expand_with_observer(target, gates, observer)
    }
}
