//! Running tensor of a block circuit against its target.
//!
//! The tensor starts as `target†` and every block in the gate list is
//! applied on the right in order, so for blocks `g_0 .. g_{m-1}`
//!
//! ```text
//!   T = G_{m-1} · ... · G_0 · target†
//! ```
//!
//! and `Re Tr(T)` reaches `2^n` exactly when the circuit equals the target.
//! The optimizer moves blocks between the two ends of this product with
//! [`CircuitTensor::apply_right`] and [`CircuitTensor::apply_left`]; the
//! trace is invariant under those moves.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::{debug, trace};

use crate::error::{SynthError, SynthResult};
use crate::gate::Gate;
use crate::linalg;
use crate::tensor::{ContractDirection, DynamicTensor, supported_qubits};

/// Incrementally maintained product of a block circuit and `target†`.
#[derive(Debug, Clone)]
pub struct CircuitTensor {
    target_unitary: Array2<Complex64>,
    tensor: Array2<Complex64>,
    num_qubits: usize,
    gate_list: Vec<Gate>,
}

impl CircuitTensor {
    /// Build the tensor for `target` and the initial `gates`.
    ///
    /// Fails if the target is not a supported-size unitary or any gate is
    /// not a two-qubit block inside the operator.
    pub fn new(target_unitary: Array2<Complex64>, gates: Vec<Gate>) -> SynthResult<Self> {
        let view = target_unitary.view();
        if !linalg::is_square(&view) {
            return Err(SynthError::NotSquare {
                rows: target_unitary.nrows(),
                cols: target_unitary.ncols(),
            });
        }
        let num_qubits = supported_qubits(target_unitary.nrows())?;
        if !linalg::is_finite(&view) {
            return Err(SynthError::NonFinite);
        }
        if !linalg::is_unitary(&view) {
            return Err(SynthError::NotUnitary);
        }
        for gate in &gates {
            validate_block(gate, num_qubits)?;
        }

        let mut circuit = Self {
            tensor: linalg::adjoint(&view),
            target_unitary,
            num_qubits,
            gate_list: gates,
        };
        circuit.reinitialize()?;
        debug!(
            num_qubits,
            num_gates = circuit.gate_list.len(),
            "built circuit tensor"
        );
        Ok(circuit)
    }

    /// Rebuild the tensor from scratch: `target†`, then every gate in the
    /// list applied on the right in order.
    pub fn reinitialize(&mut self) -> SynthResult<()> {
        self.tensor = linalg::adjoint(&self.target_unitary.view());
        for gate in &self.gate_list {
            self.tensor = contract(&self.tensor, gate, ContractDirection::Right)?;
        }
        trace!(num_gates = self.gate_list.len(), "reinitialized circuit tensor");
        Ok(())
    }

    /// `T ← embed(gate) · T`.
    pub fn apply_right(&mut self, gate: &Gate) -> SynthResult<()> {
        validate_block(gate, self.num_qubits)?;
        self.tensor = contract(&self.tensor, gate, ContractDirection::Right)?;
        Ok(())
    }

    /// `T ← T · embed(gate)`.
    pub fn apply_left(&mut self, gate: &Gate) -> SynthResult<()> {
        validate_block(gate, self.num_qubits)?;
        self.tensor = contract(&self.tensor, gate, ContractDirection::Left)?;
        Ok(())
    }

    /// The `4 x 4` environment of the current tensor at a two-qubit
    /// location.
    pub fn calc_env_matrix(&self, location: &[usize]) -> SynthResult<Array2<Complex64>> {
        let &[idx1, idx2] = location else {
            return Err(SynthError::InvalidBlockLocation {
                len: location.len(),
            });
        };
        DynamicTensor::from_matrix(&self.tensor.view())?.compute_env_for_gate(idx1, idx2)
    }

    /// Replace the gate at `index`. The replacement must sit on the same
    /// location; the tensor itself is not touched.
    pub fn replace_gate(&mut self, index: usize, gate: Gate) -> SynthResult<()> {
        let len = self.gate_list.len();
        let slot = self
            .gate_list
            .get_mut(index)
            .ok_or(SynthError::GateIndexOutOfRange { index, len })?;
        if slot.location() != gate.location() {
            return Err(SynthError::LocationChanged { index });
        }
        *slot = gate;
        Ok(())
    }

    /// Current running matrix.
    pub fn current_unitary(&self) -> &Array2<Complex64> {
        &self.tensor
    }

    /// The operator being approximated.
    pub fn target_unitary(&self) -> &Array2<Complex64> {
        &self.target_unitary
    }

    /// Trace of the running matrix.
    pub fn trace(&self) -> Complex64 {
        linalg::trace(&self.tensor.view())
    }

    /// Width of the operator.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The gate list in circuit order.
    pub fn gates(&self) -> &[Gate] {
        &self.gate_list
    }

    /// The gate at `index`, if any.
    pub fn gate(&self, index: usize) -> Option<&Gate> {
        self.gate_list.get(index)
    }

    /// Consume the tensor and return the gate list.
    pub fn into_gates(self) -> Vec<Gate> {
        self.gate_list
    }
}

fn validate_block(gate: &Gate, num_qubits: usize) -> SynthResult<()> {
    if gate.num_qubits() != 2 {
        return Err(SynthError::InvalidBlockLocation {
            len: gate.num_qubits(),
        });
    }
    if let Some(&qubit) = gate.location().iter().find(|&&q| q >= num_qubits) {
        return Err(SynthError::QubitOutOfRange { qubit, num_qubits });
    }
    Ok(())
}

fn contract(
    tensor: &Array2<Complex64>,
    gate: &Gate,
    direction: ContractDirection,
) -> SynthResult<Array2<Complex64>> {
    DynamicTensor::from_matrix(&tensor.view())?.contract_gate(
        &gate.unitary().view(),
        gate.location(),
        direction,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::linalg::kron;

    fn cz() -> Array2<Complex64> {
        let mut m = linalg::identity(4);
        m[[3, 3]] = Complex64::new(-1.0, 0.0);
        m
    }

    #[test]
    fn test_initial_tensor_is_target_adjoint() {
        let ct = CircuitTensor::new(linalg::identity(8), vec![]).unwrap();
        assert_eq!(ct.current_unitary(), &linalg::identity(8));
        assert_eq!(ct.num_qubits(), 3);
        assert_eq!(ct.trace(), Complex64::new(8.0, 0.0));
    }

    #[test]
    fn test_gate_out_of_range_rejected() {
        let g = Gate::free(cz(), vec![1, 3]).unwrap();
        assert!(matches!(
            CircuitTensor::new(linalg::identity(8), vec![g]),
            Err(SynthError::QubitOutOfRange {
                qubit: 3,
                num_qubits: 3
            })
        ));
    }

    #[test]
    fn test_non_block_gate_rejected() {
        let g = Gate::free(linalg::identity(8), vec![0, 1, 2]).unwrap();
        assert!(matches!(
            CircuitTensor::new(linalg::identity(16), vec![g]),
            Err(SynthError::InvalidBlockLocation { len: 3 })
        ));
    }

    #[test]
    fn test_non_unitary_target_rejected() {
        let target = linalg::identity(8).mapv(|z| z * 2.0);
        assert!(matches!(
            CircuitTensor::new(target, vec![]),
            Err(SynthError::NotUnitary)
        ));
    }

    #[test]
    fn test_unsupported_width_rejected() {
        assert!(matches!(
            CircuitTensor::new(linalg::identity(4), vec![]),
            Err(SynthError::UnsupportedQubitCount(2))
        ));
        assert!(matches!(
            CircuitTensor::new(linalg::identity(64), vec![]),
            Err(SynthError::UnsupportedQubitCount(6))
        ));
    }

    #[test]
    fn test_replace_gate_checks_location() {
        let g = Gate::free(cz(), vec![0, 1]).unwrap();
        let mut ct = CircuitTensor::new(linalg::identity(8), vec![g]).unwrap();
        let moved = Gate::free(cz(), vec![1, 2]).unwrap();
        assert!(matches!(
            ct.replace_gate(0, moved),
            Err(SynthError::LocationChanged { index: 0 })
        ));
        assert!(matches!(
            ct.replace_gate(4, Gate::free(cz(), vec![0, 1]).unwrap()),
            Err(SynthError::GateIndexOutOfRange { index: 4, len: 1 })
        ));
        let fixed = Gate::fixed(cz(), vec![0, 1]).unwrap();
        ct.replace_gate(0, fixed).unwrap();
        assert!(ct.gate(0).unwrap().is_fixed());
    }

    #[test]
    fn test_reinitialize_replays_gates() {
        let g = Gate::free(cz(), vec![0, 1]).unwrap();
        let ct = CircuitTensor::new(linalg::identity(8), vec![g]).unwrap();
        let expected = kron(&cz(), &linalg::identity(2));
        assert!(linalg::all_close(
            &ct.current_unitary().view(),
            &expected.view(),
            1e-12
        ));
    }

    #[test]
    fn test_env_requires_pair() {
        let ct = CircuitTensor::new(linalg::identity(8), vec![]).unwrap();
        assert!(matches!(
            ct.calc_env_matrix(&[0, 1, 2]),
            Err(SynthError::InvalidBlockLocation { len: 3 })
        ));
    }
}
