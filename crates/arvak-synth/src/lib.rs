//! `arvak-synth` - two-qubit block synthesis of multi-qubit unitaries.
//!
//! Approximates a 3 to 5 qubit unitary by a fixed-length sequence of
//! two-qubit blocks, each a dense `4 x 4` unitary on a chosen pair of
//! qubits. Blocks are refined by alternating right-to-left and
//! left-to-right sweeps; each free block is replaced by the SVD projection
//! of its environment matrix.
//!
//! ```text
//!   target ──► CircuitTensor (T = G_{m-1}···G_0 · target†)
//!                   │
//!                   ├── apply_right / apply_left   (DynamicTensor::contract_gate)
//!                   └── calc_env_matrix            (DynamicTensor::compute_env_for_gate)
//!                   │
//!              SvdSynthesizer::expand ──► SynthesisResult { gates, cost, converged }
//! ```
//!
//! The resulting blocks are hardware-agnostic; lowering them to native
//! gates is left to the compiler passes downstream.
//!
//! # Quick start
//!
//! ```rust
//! use arvak_synth::{SvdSynthesizer, SynthesisConfig, random};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let target = random::random_unitary(8, &mut rng);
//!
//! let synth = SvdSynthesizer::new(SynthesisConfig::default().with_max_iters(50)).unwrap();
//! let result = synth.synthesize(target, 4, &mut rng).unwrap();
//! assert_eq!(result.gates.len(), 4);
//! assert!(result.iterations <= 50);
//! ```

pub mod circuit_tensor;
pub mod config;
pub mod error;
pub mod gate;
pub mod linalg;
pub mod observer;
pub mod random;
pub mod request;
pub mod svd;
pub mod tensor;

pub use circuit_tensor::CircuitTensor;
pub use config::SynthesisConfig;
pub use error::{SynthError, SynthResult};
pub use gate::Gate;
pub use observer::{NoopObserver, Progress, ProgressObserver, TracingObserver};
pub use request::{BlockSpec, SynthesisRequest};
pub use svd::{SvdSynthesizer, SynthesisResult};
pub use tensor::{ContractDirection, DynamicTensor};
