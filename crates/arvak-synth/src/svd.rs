//! Alternating-sweep SVD synthesis of two-qubit block circuits.
//!
//! Given a target unitary and a list of two-qubit blocks, every free block
//! is replaced in turn by the unitary that maximizes `Re Tr(T)` with all
//! other blocks held fixed. That block is available in closed form from
//! the SVD of its environment matrix, so each single-block update never
//! increases the cost
//!
//! ```text
//!   cost = 2^(n+1) - 2·Re Tr(G_{m-1} · ... · G_0 · target†)
//! ```
//!
//! which is `|C - target|_F^2` for the circuit unitary `C`. One iteration
//! is a right-to-left sweep followed by a left-to-right sweep. The loop
//! stops when the cost changes by at most `threshold` between iterations
//! or after `max_iters` iterations. It is a local method: it can stall in
//! a local minimum, and reaching the cap is reported, not treated as an
//! error.
//!
//! # Example
//!
//! ```rust
//! use arvak_synth::{Gate, SvdSynthesizer, SynthesisConfig, linalg};
//!
//! let target = linalg::identity(8);
//! let gates = vec![
//!     Gate::free(linalg::identity(4), vec![0, 1]).unwrap(),
//!     Gate::fixed(linalg::identity(4), vec![1, 2]).unwrap(),
//! ];
//!
//! let synth = SvdSynthesizer::new(SynthesisConfig::default()).unwrap();
//! let result = synth.expand(target, gates).unwrap();
//! assert!(result.converged);
//! assert!(result.cost.abs() < 1e-9);
//! ```

use ndarray::Array2;
use num_complex::Complex64;
use rand::Rng;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::circuit_tensor::CircuitTensor;
use crate::config::SynthesisConfig;
use crate::error::{SynthError, SynthResult};
use crate::gate::Gate;
use crate::linalg;
use crate::observer::{Progress, ProgressObserver, TracingObserver};
use crate::random;

/// Name under which the synthesizer is registered.
pub const NAME: &str = "svd";

/// Options a caller must supply: the target unitary and the number of
/// two-qubit blocks.
pub const REQUIRED_KEYS: [&str; 2] = ["unitary", "num-gates"];

/// Outcome of one synthesis run.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisResult {
    /// The block circuit in application order. Fixed blocks are unchanged.
    pub gates: Vec<Gate>,
    /// Final cost `2^(n+1) - 2·Re Tr(T)`; zero for an exact synthesis.
    pub cost: f64,
    /// Number of completed iterations (sweep pairs).
    pub iterations: usize,
    /// Number of times the circuit tensor was rebuilt from scratch.
    pub reinitializations: usize,
    /// Whether the cost settled within the threshold before the cap.
    pub converged: bool,
}

/// Direction of a sweep over the gate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sweep {
    /// Last block to first: blocks move from the row side to the column side.
    RightToLeft,
    /// First block to last: blocks move back to the row side.
    LeftToRight,
}

/// Two-qubit block synthesizer.
#[derive(Debug, Clone, Default)]
pub struct SvdSynthesizer {
    config: SynthesisConfig,
}

impl SvdSynthesizer {
    /// Create a synthesizer, validating the configuration.
    pub fn new(config: SynthesisConfig) -> SynthResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Registered name.
    pub fn name(&self) -> &'static str {
        NAME
    }

    /// Options a caller must supply.
    pub fn required_keys(&self) -> &'static [&'static str] {
        &REQUIRED_KEYS
    }

    /// Active configuration.
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Refine the free blocks of `gates` towards `target`, reporting
    /// progress through `tracing`.
    pub fn expand(
        &self,
        target: Array2<Complex64>,
        gates: Vec<Gate>,
    ) -> SynthResult<SynthesisResult> {
        self.expand_with_observer(target, gates, &mut TracingObserver)
    }

    /// Refine the free blocks of `gates` towards `target`, reporting
    /// progress to `observer` every `log_interval` iterations.
    #[instrument(skip_all, fields(dim = target.nrows(), num_gates = gates.len()))]
    pub fn expand_with_observer(
        &self,
        target: Array2<Complex64>,
        gates: Vec<Gate>,
        observer: &mut dyn ProgressObserver,
    ) -> SynthResult<SynthesisResult> {
        let cfg = &self.config;
        let mut circuit = CircuitTensor::new(target, gates)?;
        let num_gates = circuit.gates().len();
        let max_trace = 2.0 * (1usize << circuit.num_qubits()) as f64;

        let mut c1 = 0.0_f64;
        let mut c2 = 1.0_f64;
        let mut iter = 0usize;
        let mut reinitializations = 0usize;

        while (c1 - c2).abs() > cfg.threshold && iter < cfg.max_iters {
            for k in (0..num_gates).rev() {
                self.update_block(&mut circuit, k, Sweep::RightToLeft)?;
            }
            for k in 0..num_gates {
                self.update_block(&mut circuit, k, Sweep::LeftToRight)?;
            }

            c2 = c1;
            c1 = max_trace - 2.0 * circuit.trace().re;
            iter += 1;

            if iter % cfg.reinit_interval == 0 {
                circuit.reinitialize()?;
                reinitializations += 1;
                // Report the cost of the rebuilt tensor, free of accumulated drift.
                c1 = max_trace - 2.0 * circuit.trace().re;
            }
            if iter % cfg.log_interval == 0 {
                observer.on_progress(&Progress {
                    iteration: iter,
                    cost: c1,
                    previous_cost: c2,
                    reinitializations,
                });
            }
        }

        let converged = (c1 - c2).abs() <= cfg.threshold;
        if converged {
            info!(iterations = iter, cost = c1, "svd synthesis converged");
        } else {
            warn!(
                iterations = iter,
                cost = c1,
                delta = (c1 - c2).abs(),
                "svd synthesis hit the iteration cap before converging"
            );
        }

        Ok(SynthesisResult {
            gates: circuit.into_gates(),
            cost: c1,
            iterations: iter,
            reinitializations,
            converged,
        })
    }

    /// Synthesize `target` with `num_blocks` random free blocks on the
    /// default nearest-neighbour placement.
    pub fn synthesize<R: Rng>(
        &self,
        target: Array2<Complex64>,
        num_blocks: usize,
        rng: &mut R,
    ) -> SynthResult<SynthesisResult> {
        let gates = random::initial_blocks(target.nrows(), num_blocks, rng)?;
        self.expand(target, gates)
    }

    /// Pull block `index` out of one end of the product, re-optimize it
    /// unless fixed, and push it back in at the other end.
    fn update_block(
        &self,
        circuit: &mut CircuitTensor,
        index: usize,
        sweep: Sweep,
    ) -> SynthResult<()> {
        let len = circuit.gates().len();
        let gate = circuit
            .gate(index)
            .cloned()
            .ok_or(SynthError::GateIndexOutOfRange { index, len })?;
        let inverse = gate.inverse();

        match sweep {
            Sweep::RightToLeft => circuit.apply_right(&inverse)?,
            Sweep::LeftToRight => circuit.apply_left(&inverse)?,
        }

        let gate = if gate.is_fixed() {
            gate
        } else {
            let env = circuit.calc_env_matrix(gate.location())?;
            let slowdown = self.config.slowdown_factor;
            let svd_mat = env + inverse.unitary().mapv(|z| z * slowdown);
            let updated = gate.with_unitary(trace_maximizer(&svd_mat)?)?;
            circuit.replace_gate(index, updated.clone())?;
            updated
        };

        match sweep {
            Sweep::RightToLeft => circuit.apply_left(&gate),
            Sweep::LeftToRight => circuit.apply_right(&gate),
        }
    }
}

/// The unitary `G` maximizing `Re Tr(G · M)`.
///
/// With `M = U Σ V*` this is `V U*`, the adjoint of `M`'s polar factor.
pub fn trace_maximizer(mat: &Array2<Complex64>) -> SynthResult<Array2<Complex64>> {
    let svd = linalg::to_nalgebra(&mat.view())
        .try_svd(true, true, f64::EPSILON, 0)
        .ok_or(SynthError::SvdFailed)?;
    let u = svd.u.ok_or(SynthError::SvdFailed)?;
    let v_t = svd.v_t.ok_or(SynthError::SvdFailed)?;
    Ok(linalg::from_nalgebra(&(v_t.adjoint() * u.adjoint())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_trace_maximizer_of_unitary_is_inverse() {
        let mut rng = StdRng::seed_from_u64(3);
        let u = random::random_unitary(4, &mut rng);
        let g = trace_maximizer(&u).unwrap();
        assert!(linalg::all_close(
            &g.view(),
            &linalg::adjoint(&u.view()).view(),
            1e-9
        ));
    }

    #[test]
    fn test_trace_maximizer_beats_random_unitaries() {
        let mut rng = StdRng::seed_from_u64(11);
        let m = Array2::from_shape_fn((4, 4), |(r, c)| {
            Complex64::new((r + 2 * c) as f64 * 0.3 - 1.0, (r as f64 - c as f64) * 0.2)
        });
        let best = linalg::trace(&trace_maximizer(&m).unwrap().dot(&m).view()).re;
        for _ in 0..20 {
            let g = random::random_unitary(4, &mut rng);
            assert!(linalg::trace(&g.dot(&m).view()).re <= best + 1e-9);
        }
    }

    #[test]
    fn test_damped_update_uses_weighted_inverse() {
        let mut rng = StdRng::seed_from_u64(13);
        let target = random::random_unitary(8, &mut rng);
        let gate = Gate::free(random::random_unitary(4, &mut rng), vec![2, 0]).unwrap();
        let slowdown = 0.75;

        // Expected: pull the block off the row side, then project
        // env + s·G† back onto the unitaries.
        let mut reference = CircuitTensor::new(target.clone(), vec![gate.clone()]).unwrap();
        reference.apply_right(&gate.inverse()).unwrap();
        let env = reference.calc_env_matrix(gate.location()).unwrap();
        let damped_input = &env + &gate.inverse().unitary().mapv(|z| z * slowdown);
        let expected = trace_maximizer(&damped_input).unwrap();
        let undamped = trace_maximizer(&env).unwrap();
        assert!(!linalg::all_close(&expected.view(), &undamped.view(), 1e-6));

        let synth =
            SvdSynthesizer::new(SynthesisConfig::default().with_slowdown_factor(slowdown)).unwrap();
        let mut circuit = CircuitTensor::new(target, vec![gate]).unwrap();
        synth
            .update_block(&mut circuit, 0, Sweep::RightToLeft)
            .unwrap();
        let updated = circuit.gate(0).unwrap().unitary();
        assert!(linalg::all_close(&updated.view(), &expected.view(), 1e-9));
    }

    #[test]
    fn test_fixed_block_skips_update() {
        let mut rng = StdRng::seed_from_u64(14);
        let target = random::random_unitary(8, &mut rng);
        let gate = Gate::fixed(random::random_unitary(4, &mut rng), vec![0, 1]).unwrap();
        let mut circuit = CircuitTensor::new(target, vec![gate.clone()]).unwrap();
        let before = circuit.current_unitary().clone();

        let synth = SvdSynthesizer::default();
        synth
            .update_block(&mut circuit, 0, Sweep::RightToLeft)
            .unwrap();
        assert_eq!(circuit.gate(0), Some(&gate));
        // A single fixed block moved from one end to the other leaves a
        // cyclically equivalent product with the same trace.
        assert!((linalg::trace(&before.view()) - circuit.trace()).norm() < 1e-9);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = SynthesisConfig::default().with_max_iters(0);
        assert!(matches!(
            SvdSynthesizer::new(cfg),
            Err(SynthError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_name_and_keys() {
        let synth = SvdSynthesizer::default();
        assert_eq!(synth.name(), "svd");
        assert_eq!(synth.required_keys(), &["unitary", "num-gates"]);
    }

    #[test]
    fn test_empty_gate_list_terminates() {
        let synth = SvdSynthesizer::default();
        let result = synth.expand(linalg::identity(8), vec![]).unwrap();
        assert!(result.gates.is_empty());
        assert!(result.converged);
        assert!(result.cost.abs() < 1e-12);
    }

    #[test]
    fn test_cap_reported_as_not_converged() {
        let mut rng = StdRng::seed_from_u64(5);
        let target = random::random_unitary(8, &mut rng);
        let gates = random::random_blocks(&[[0, 1]], &mut rng).unwrap();
        let cfg = SynthesisConfig::default()
            .with_max_iters(1)
            .with_threshold(1e-300);
        let result = SvdSynthesizer::new(cfg)
            .unwrap()
            .expand(target, gates)
            .unwrap();
        assert_eq!(result.iterations, 1);
        assert!(!result.converged);
    }
}
