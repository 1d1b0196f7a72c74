//! Dense matrix predicates and helpers.
//!
//! The predicates answer "is this matrix square / finite / diagonal /
//! hermitian / unitary / orthogonal" within an absolute element-wise
//! tolerance. None of them modify their input. Gate and tensor
//! construction use the square, finite and unitary checks; the rest are
//! exported for callers validating their own matrices.

use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;

use crate::error::{SynthError, SynthResult};

/// Default absolute tolerance for element-wise comparisons.
pub const TOLERANCE: f64 = 1e-9;

/// Check that the matrix has as many rows as columns.
pub fn is_square(mat: &ArrayView2<'_, Complex64>) -> bool {
    mat.nrows() == mat.ncols()
}

/// Check that no entry is NaN or infinite.
pub fn is_finite(mat: &ArrayView2<'_, Complex64>) -> bool {
    mat.iter().all(|z| z.re.is_finite() && z.im.is_finite())
}

/// Check that every off-diagonal entry is within `tol` of zero.
pub fn is_diagonal(mat: &ArrayView2<'_, Complex64>, tol: f64) -> bool {
    if !is_finite(mat) {
        return false;
    }
    mat.indexed_iter()
        .all(|((i, j), z)| i == j || z.norm() <= tol)
}

/// Element-wise comparison of two matrices of identical shape.
///
/// Returns `false` when the shapes differ or either matrix is non-finite.
pub fn all_close(a: &ArrayView2<'_, Complex64>, b: &ArrayView2<'_, Complex64>, tol: f64) -> bool {
    if !is_finite(a) || !is_finite(b) || a.dim() != b.dim() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).norm() <= tol)
}

/// Check `M == M†` within [`TOLERANCE`].
pub fn is_hermitian(mat: &ArrayView2<'_, Complex64>) -> bool {
    if !is_square(mat) || !is_finite(mat) {
        return false;
    }
    all_close(mat, &adjoint(mat).view(), TOLERANCE)
}

/// Check `M · M† == I` within [`TOLERANCE`].
pub fn is_unitary(mat: &ArrayView2<'_, Complex64>) -> bool {
    if !is_square(mat) || !is_finite(mat) {
        return false;
    }
    let product = mat.dot(&adjoint(mat));
    all_close(&product.view(), &identity(mat.nrows()).view(), TOLERANCE)
}

/// Check that the matrix is real and `M · Mᵀ == I` within `tol`.
pub fn is_orthogonal(mat: &ArrayView2<'_, Complex64>, tol: f64) -> bool {
    if !is_square(mat) || !is_finite(mat) {
        return false;
    }
    if mat.iter().any(|z| z.im.abs() > tol) {
        return false;
    }
    let product = mat.dot(&mat.t());
    all_close(&product.view(), &identity(mat.nrows()).view(), tol)
}

/// The `dim x dim` identity matrix.
pub fn identity(dim: usize) -> Array2<Complex64> {
    Array2::from_diag_elem(dim, Complex64::new(1.0, 0.0))
}

/// Conjugate transpose.
pub fn adjoint(mat: &ArrayView2<'_, Complex64>) -> Array2<Complex64> {
    mat.t().mapv(|z| z.conj())
}

/// Sum of the diagonal.
pub fn trace(mat: &ArrayView2<'_, Complex64>) -> Complex64 {
    mat.diag().sum()
}

/// Number of qubits for a `dim`-dimensional operator, or `None` if `dim`
/// is not a power of two.
pub fn qubits_for_dim(dim: usize) -> Option<usize> {
    if dim == 0 || !dim.is_power_of_two() {
        return None;
    }
    Some(dim.trailing_zeros() as usize)
}

/// Dimension `2^num_qubits` of an operator, or `None` if it does not fit
/// in a `usize`.
pub fn dim_for_qubits(num_qubits: usize) -> Option<usize> {
    u32::try_from(num_qubits)
        .ok()
        .and_then(|n| 1usize.checked_shl(n))
}

/// Build a matrix from nested rows, as read from JSON.
///
/// Every row must have as many entries as there are rows.
pub fn matrix_from_rows(rows: &[Vec<Complex64>]) -> SynthResult<Array2<Complex64>> {
    let n = rows.len();
    if let Some(bad) = rows.iter().find(|row| row.len() != n) {
        return Err(SynthError::NotSquare {
            rows: n,
            cols: bad.len(),
        });
    }
    let flat: Vec<Complex64> = rows.iter().flatten().copied().collect();
    Ok(Array2::from_shape_vec((n, n), flat)?)
}

/// Split a matrix into nested rows.
pub fn matrix_to_rows(mat: &ArrayView2<'_, Complex64>) -> Vec<Vec<Complex64>> {
    mat.rows().into_iter().map(|row| row.to_vec()).collect()
}

/// Copy an ndarray matrix into a nalgebra matrix.
pub(crate) fn to_nalgebra(mat: &ArrayView2<'_, Complex64>) -> nalgebra::DMatrix<Complex64> {
    nalgebra::DMatrix::from_fn(mat.nrows(), mat.ncols(), |r, c| mat[[r, c]])
}

/// Copy a nalgebra matrix into an ndarray matrix.
pub(crate) fn from_nalgebra(mat: &nalgebra::DMatrix<Complex64>) -> Array2<Complex64> {
    Array2::from_shape_fn((mat.nrows(), mat.ncols()), |(r, c)| mat[(r, c)])
}
