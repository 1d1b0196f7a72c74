//! Random unitaries and starting block lists.

use nalgebra::DMatrix;
use ndarray::Array2;
use num_complex::Complex64;
use rand::Rng;

use crate::error::{SynthError, SynthResult};
use crate::gate::Gate;
use crate::linalg;
use crate::tensor::supported_qubits;

/// Random `dim x dim` unitary from the QR decomposition of a matrix with
/// uniform entries in `[-1, 1) + i[-1, 1)`.
///
/// The phases of `R`'s diagonal are folded back into `Q` so the result
/// does not depend on the sign convention of the QR routine.
pub fn random_unitary<R: Rng>(dim: usize, rng: &mut R) -> Array2<Complex64> {
    let mat = DMatrix::<Complex64>::from_fn(dim, dim, |_, _| {
        Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0))
    });
    let qr = mat.qr();
    let r = qr.r();
    let mut q = qr.q();
    for (j, mut column) in q.column_iter_mut().enumerate() {
        let d = r[(j, j)];
        let norm = d.norm();
        if norm > 0.0 {
            column *= d / norm;
        }
    }
    linalg::from_nalgebra(&q)
}

/// Nearest-neighbour placements cycling through `(0,1), (1,2), ...,
/// (n-2, n-1)`.
pub fn default_locations(num_qubits: usize, num_blocks: usize) -> Vec<[usize; 2]> {
    let pairs = num_qubits.saturating_sub(1).max(1);
    (0..num_blocks)
        .map(|i| {
            let q = i % pairs;
            [q, q + 1]
        })
        .collect()
}

/// Free blocks with random unitaries on the given locations.
pub fn random_blocks<R: Rng>(
    locations: &[[usize; 2]],
    rng: &mut R,
) -> SynthResult<Vec<Gate>> {
    locations
        .iter()
        .map(|loc| Gate::free(random_unitary(4, rng), loc.to_vec()))
        .collect()
}

/// `num_blocks` free random blocks on the default placement for an
/// operator of dimension `dim`.
pub fn initial_blocks<R: Rng>(
    dim: usize,
    num_blocks: usize,
    rng: &mut R,
) -> SynthResult<Vec<Gate>> {
    let num_qubits = supported_qubits(dim)?;
    if num_blocks == 0 {
        return Err(SynthError::InvalidConfig(
            "num-gates must be at least 1".into(),
        ));
    }
    random_blocks(&default_locations(num_qubits, num_blocks), rng)
}
