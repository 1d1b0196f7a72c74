//! Block gates: a validated local unitary plus the qubits it acts on.
//!
//! A [`Gate`] is an immutable value. The optimizer never mutates a gate in
//! place; it builds a replacement with [`Gate::with_unitary`] and swaps the
//! list entry.

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{SynthError, SynthResult};
use crate::linalg;

/// A unitary restricted to an explicit, ordered set of qubit positions.
///
/// `location[0]` is the most significant qubit of `unitary`'s index, so a
/// gate at `[0, 1]` embeds into a larger operator as `U ⊗ I`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GateRepr", into = "GateRepr")]
pub struct Gate {
    unitary: Array2<Complex64>,
    location: Vec<usize>,
    is_fixed: bool,
}

impl Gate {
    /// Create a gate, validating the location and the unitary.
    ///
    /// Fails if `location` is empty or has duplicates, or if `unitary` is
    /// not a finite unitary of dimension `2^location.len()`.
    pub fn new(
        unitary: Array2<Complex64>,
        location: Vec<usize>,
        is_fixed: bool,
    ) -> SynthResult<Self> {
        validate_location(&location)?;
        validate_unitary(&unitary, location.len())?;
        Ok(Self {
            unitary,
            location,
            is_fixed,
        })
    }

    /// A gate the optimizer may update.
    pub fn free(unitary: Array2<Complex64>, location: Vec<usize>) -> SynthResult<Self> {
        Self::new(unitary, location, false)
    }

    /// A gate the optimizer must leave untouched.
    pub fn fixed(unitary: Array2<Complex64>, location: Vec<usize>) -> SynthResult<Self> {
        Self::new(unitary, location, true)
    }

    /// Identity block on `location`.
    pub fn identity(location: Vec<usize>, is_fixed: bool) -> SynthResult<Self> {
        // The matrix needs dim * dim entries.
        let dim = match linalg::dim_for_qubits(location.len()) {
            Some(dim) if dim.checked_mul(dim).is_some() => dim,
            _ => {
                return Err(SynthError::LocationTooLarge {
                    len: location.len(),
                });
            }
        };
        Self::new(linalg::identity(dim), location, is_fixed)
    }

    /// The inverse gate: conjugate-transposed unitary, same location and
    /// fixed flag.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            unitary: linalg::adjoint(&self.unitary.view()),
            location: self.location.clone(),
            is_fixed: self.is_fixed,
        }
    }

    /// Build the replacement for this gate with a new unitary at the same
    /// location and with the same fixed flag.
    pub fn with_unitary(&self, unitary: Array2<Complex64>) -> SynthResult<Self> {
        Self::new(unitary, self.location.clone(), self.is_fixed)
    }

    /// The gate's unitary matrix.
    pub fn unitary(&self) -> &Array2<Complex64> {
        &self.unitary
    }

    /// Qubit positions, in the order they bind to the unitary's legs.
    pub fn location(&self) -> &[usize] {
        &self.location
    }

    /// Whether the optimizer must leave this gate alone.
    pub fn is_fixed(&self) -> bool {
        self.is_fixed
    }

    /// Number of qubits the gate acts on.
    pub fn num_qubits(&self) -> usize {
        self.location.len()
    }
}

fn validate_location(location: &[usize]) -> SynthResult<()> {
    if location.is_empty() {
        return Err(SynthError::EmptyLocation);
    }
    for (i, &qubit) in location.iter().enumerate() {
        if location[..i].contains(&qubit) {
            return Err(SynthError::DuplicateQubit { qubit });
        }
    }
    Ok(())
}

fn validate_unitary(unitary: &Array2<Complex64>, num_qubits: usize) -> SynthResult<()> {
    let view = unitary.view();
    if !linalg::is_square(&view) {
        return Err(SynthError::NotSquare {
            rows: unitary.nrows(),
            cols: unitary.ncols(),
        });
    }
    let expected = linalg::dim_for_qubits(num_qubits)
        .ok_or(SynthError::LocationTooLarge { len: num_qubits })?;
    if unitary.nrows() != expected {
        return Err(SynthError::DimensionMismatch {
            expected,
            got: unitary.nrows(),
        });
    }
    if !linalg::is_finite(&view) {
        return Err(SynthError::NonFinite);
    }
    if !linalg::is_unitary(&view) {
        return Err(SynthError::NotUnitary);
    }
    Ok(())
}

/// Wire form of a [`Gate`]: nested `[re, im]` rows.
#[derive(Serialize, Deserialize)]
struct GateRepr {
    location: Vec<usize>,
    #[serde(default)]
    fixed: bool,
    unitary: Vec<Vec<Complex64>>,
}

impl TryFrom<GateRepr> for Gate {
    type Error = SynthError;

    fn try_from(repr: GateRepr) -> SynthResult<Self> {
        let unitary = linalg::matrix_from_rows(&repr.unitary)?;
        Gate::new(unitary, repr.location, repr.fixed)
    }
}

impl From<Gate> for GateRepr {
    fn from(gate: Gate) -> Self {
        Self {
            unitary: linalg::matrix_to_rows(&gate.unitary.view()),
            location: gate.location,
            fixed: gate.is_fixed,
        }
    }
}
