//! Tests for block gate construction and inversion.

use arvak_synth::random::random_unitary;
use arvak_synth::{Gate, SynthError, linalg};
use rand::SeedableRng;
use rand::rngs::StdRng;

// ---------------------------------------------------------------------------
// Inversion
// ---------------------------------------------------------------------------

#[test]
fn inverse_of_three_qubit_gate_is_adjoint() {
    let mut rng = StdRng::seed_from_u64(2019);
    let utry = random_unitary(8, &mut rng);
    let gate = Gate::free(utry.clone(), vec![0, 1, 2]).unwrap();
    let inv = gate.inverse();

    let id = linalg::identity(8);
    let left = utry.dot(inv.unitary());
    let right = inv.unitary().dot(&utry);
    assert!(linalg::all_close(&left.view(), &id.view(), 1e-9));
    assert!(linalg::all_close(&right.view(), &id.view(), 1e-9));
    assert_eq!(gate.location(), inv.location());
    assert_eq!(gate.is_fixed(), inv.is_fixed());
}

#[test]
fn inverse_preserves_fixed_flag_and_order() {
    let mut rng = StdRng::seed_from_u64(8);
    let gate = Gate::fixed(random_unitary(4, &mut rng), vec![4, 2]).unwrap();
    let inv = gate.inverse();
    assert!(inv.is_fixed());
    assert_eq!(inv.location(), &[4, 2]);
}

#[test]
fn double_inverse_is_identity_operation() {
    let mut rng = StdRng::seed_from_u64(9);
    let gate = Gate::free(random_unitary(4, &mut rng), vec![0, 1]).unwrap();
    assert_eq!(gate.inverse().inverse(), gate);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn rejects_malformed_gates() {
    let mut rng = StdRng::seed_from_u64(10);
    let u4 = random_unitary(4, &mut rng);

    assert!(matches!(
        Gate::free(u4.clone(), vec![]),
        Err(SynthError::EmptyLocation)
    ));
    assert!(matches!(
        Gate::free(u4.clone(), vec![2, 2]),
        Err(SynthError::DuplicateQubit { qubit: 2 })
    ));
    assert!(matches!(
        Gate::free(u4.clone(), vec![0]),
        Err(SynthError::DimensionMismatch {
            expected: 2,
            got: 4
        })
    ));

    let mut nan = u4;
    nan[[0, 0]].re = f64::NAN;
    assert!(matches!(
        Gate::free(nan, vec![0, 1]),
        Err(SynthError::NonFinite)
    ));
}

#[test]
fn identity_constructor() {
    let gate = Gate::identity(vec![1, 3], true).unwrap();
    assert_eq!(gate.unitary(), &linalg::identity(4));
    assert!(gate.is_fixed());
}

#[test]
fn rejects_location_wider_than_usize() {
    let wide: Vec<usize> = (0..64).collect();
    assert!(matches!(
        Gate::free(linalg::identity(1), wide.clone()),
        Err(SynthError::LocationTooLarge { len: 64 })
    ));
    assert!(matches!(
        Gate::identity(wide, false),
        Err(SynthError::LocationTooLarge { len: 64 })
    ));
    assert!(matches!(
        Gate::free(linalg::identity(1), (0..63).collect()),
        Err(SynthError::DimensionMismatch { got: 1, .. })
    ));
    // Identity on 40 qubits would need 2^80 entries.
    assert!(matches!(
        Gate::identity((0..40).collect(), true),
        Err(SynthError::LocationTooLarge { len: 40 })
    ));
}

#[test]
fn deserializing_wide_location_is_rejected() {
    let location: Vec<String> = (0..64).map(|q| q.to_string()).collect();
    let json = format!(
        r#"{{"location": [{}], "unitary": [[[1.0, 0.0]]]}}"#,
        location.join(",")
    );
    assert!(serde_json::from_str::<Gate>(&json).is_err());
}
