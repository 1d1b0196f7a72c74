//! Dynamic-rank tensor view of a multi-qubit operator.
//!
//! A `2^k x 2^k` matrix is reshaped into a rank-`2k` tensor in which every
//! axis has length 2:
//!
//! ```text
//!   axes 0 .. k      row (output) legs,    axis q     belongs to qubit q
//!   axes k .. 2k     column (input) legs,  axis k + q belongs to qubit q
//! ```
//!
//! Qubit 0 is the most significant bit of the matrix index, so the row-major
//! reshape needs no index arithmetic. A two-qubit block is contracted by
//! permuting its two target legs to the front (or back), flattening the
//! remaining legs, doing a single `4 x 4` matrix product, and undoing the
//! permutation.
//!
//! Supported widths are 3 to 5 qubits (rank 6, 8 or 10). The implementation
//! is rank-generic over [`ArrayD`]; the range is enforced in
//! [`supported_qubits`] so that every other size fails up front.

use ndarray::{Array2, ArrayD, ArrayView2, IxDyn};
use num_complex::Complex64;

use crate::error::{SynthError, SynthResult};
use crate::linalg;

/// Smallest supported operator width.
pub const MIN_QUBITS: usize = 3;
/// Largest supported operator width.
pub const MAX_QUBITS: usize = 5;

/// Which side of the operator a block is contracted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractDirection {
    /// Contract into the column legs: `T · embed(G)`.
    Left,
    /// Contract into the row legs: `embed(G) · T`.
    Right,
}

/// Number of qubits for an operator of dimension `dim`, if supported.
pub fn supported_qubits(dim: usize) -> SynthResult<usize> {
    let num_qubits = linalg::qubits_for_dim(dim).ok_or(SynthError::NotPowerOfTwo(dim))?;
    if !(MIN_QUBITS..=MAX_QUBITS).contains(&num_qubits) {
        return Err(SynthError::UnsupportedQubitCount(num_qubits));
    }
    Ok(num_qubits)
}

/// Rank-`2k` view of a `2^k x 2^k` operator.
#[derive(Debug, Clone)]
pub struct DynamicTensor {
    data: ArrayD<Complex64>,
    num_qubits: usize,
}

impl DynamicTensor {
    /// Reshape a square matrix into tensor form.
    pub fn from_matrix(mat: &ArrayView2<'_, Complex64>) -> SynthResult<Self> {
        if !linalg::is_square(mat) {
            return Err(SynthError::NotSquare {
                rows: mat.nrows(),
                cols: mat.ncols(),
            });
        }
        let num_qubits = supported_qubits(mat.nrows())?;
        let shape = vec![2; 2 * num_qubits];
        let data = mat
            .as_standard_layout()
            .into_owned()
            .into_shape_with_order(IxDyn(&shape))?;
        Ok(Self { data, num_qubits })
    }

    /// Number of qubits `k`.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Tensor rank `2k`.
    pub fn rank(&self) -> usize {
        2 * self.num_qubits
    }

    /// Collapse back to matrix form.
    pub fn into_matrix(self) -> SynthResult<Array2<Complex64>> {
        let dim = 1usize << self.num_qubits;
        Ok(self.data.into_shape_with_order((dim, dim))?)
    }

    /// Contract a two-qubit block into two legs and return the resulting
    /// matrix.
    ///
    /// `location[0]` binds to the gate's first (most significant) leg and
    /// `location[1]` to its second.
    pub fn contract_gate(
        &self,
        gate: &ArrayView2<'_, Complex64>,
        location: &[usize],
        direction: ContractDirection,
    ) -> SynthResult<Array2<Complex64>> {
        let (q0, q1) = self.block_pair(location)?;
        if gate.dim() != (4, 4) {
            if !linalg::is_square(gate) {
                return Err(SynthError::NotSquare {
                    rows: gate.nrows(),
                    cols: gate.ncols(),
                });
            }
            return Err(SynthError::DimensionMismatch {
                expected: 4,
                got: gate.nrows(),
            });
        }

        let k = self.num_qubits;
        let rank = self.rank();
        let (a, b) = match direction {
            ContractDirection::Right => (q0, q1),
            ContractDirection::Left => (k + q0, k + q1),
        };
        let rest: Vec<usize> = (0..rank).filter(|&ax| ax != a && ax != b).collect();
        let rest_len = 1usize << (rank - 2);

        let perm: Vec<usize> = match direction {
            ContractDirection::Right => [a, b].into_iter().chain(rest).collect(),
            ContractDirection::Left => rest.into_iter().chain([a, b]).collect(),
        };

        let moved = self
            .data
            .view()
            .permuted_axes(IxDyn(&perm))
            .as_standard_layout()
            .into_owned();

        let product = match direction {
            ContractDirection::Right => {
                let flat = moved.into_shape_with_order((4, rest_len))?;
                gate.dot(&flat)
            }
            ContractDirection::Left => {
                let flat = moved.into_shape_with_order((rest_len, 4))?;
                flat.dot(gate)
            }
        };

        let mut inverse = vec![0; rank];
        for (i, &axis) in perm.iter().enumerate() {
            inverse[axis] = i;
        }
        let restored = product
            .into_shape_with_order(IxDyn(&vec![2; rank]))?
            .permuted_axes(IxDyn(&inverse))
            .as_standard_layout()
            .into_owned();

        Self {
            data: restored,
            num_qubits: k,
        }
        .into_matrix()
    }

    /// Trace out every row/column leg pair except those of `idx1` and
    /// `idx2`, giving the `4 x 4` environment seen by a block there.
    pub fn compute_env_for_gate(&self, idx1: usize, idx2: usize) -> SynthResult<Array2<Complex64>> {
        let (q0, q1) = self.block_pair(&[idx1, idx2])?;
        let k = self.num_qubits;
        let others: Vec<usize> = (0..k).filter(|&q| q != q0 && q != q1).collect();

        let perm: Vec<usize> = [q0, q1]
            .into_iter()
            .chain(others.iter().copied())
            .chain([k + q0, k + q1])
            .chain(others.iter().map(|&q| k + q))
            .collect();

        let traced = 1usize << others.len();
        let moved = self
            .data
            .view()
            .permuted_axes(IxDyn(&perm))
            .as_standard_layout()
            .into_owned()
            .into_shape_with_order((4, traced, 4, traced))?;

        Ok(Array2::from_shape_fn((4, 4), |(row, col)| {
            (0..traced).map(|x| moved[[row, x, col, x]]).sum()
        }))
    }

    fn block_pair(&self, location: &[usize]) -> SynthResult<(usize, usize)> {
        let &[q0, q1] = location else {
            return Err(SynthError::InvalidBlockLocation {
                len: location.len(),
            });
        };
        if q0 == q1 {
            return Err(SynthError::DuplicateQubit { qubit: q0 });
        }
        for qubit in [q0, q1] {
            if qubit >= self.num_qubits {
                return Err(SynthError::QubitOutOfRange {
                    qubit,
                    num_qubits: self.num_qubits,
                });
            }
        }
        Ok((q0, q1))
    }
}
