//! Benchmarks for block contraction and SVD sweeps
//!
//! Run with: cargo bench -p arvak-synth

use arvak_synth::random::{default_locations, random_blocks, random_unitary};
use arvak_synth::{
    CircuitTensor, ContractDirection, DynamicTensor, Gate, NoopObserver, SvdSynthesizer,
    SynthesisConfig,
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Benchmark contracting one block into each supported width
fn bench_contract_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("contract_gate");
    let mut rng = StdRng::seed_from_u64(0);
    let block = random_unitary(4, &mut rng);

    for num_qubits in [3usize, 4, 5] {
        let op = random_unitary(1 << num_qubits, &mut rng);
        let tensor = DynamicTensor::from_matrix(&op.view()).unwrap();
        group.bench_with_input(
            BenchmarkId::new("right", num_qubits),
            &num_qubits,
            |b, _| {
                b.iter(|| {
                    tensor
                        .contract_gate(
                            black_box(&block.view()),
                            black_box(&[0usize, 2][..]),
                            ContractDirection::Right,
                        )
                        .unwrap()
                });
            },
        );
        group.bench_with_input(BenchmarkId::new("left", num_qubits), &num_qubits, |b, _| {
            b.iter(|| {
                tensor
                    .contract_gate(
                        black_box(&block.view()),
                        black_box(&[1usize, 2][..]),
                        ContractDirection::Left,
                    )
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark environment extraction
fn bench_env_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("env_matrix");
    let mut rng = StdRng::seed_from_u64(1);

    for num_qubits in [3usize, 4, 5] {
        let ct = CircuitTensor::new(random_unitary(1 << num_qubits, &mut rng), vec![]).unwrap();
        group.bench_with_input(
            BenchmarkId::from_parameter(num_qubits),
            &num_qubits,
            |b, _| {
                b.iter(|| ct.calc_env_matrix(black_box(&[0usize, 1][..])).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark a fixed number of sweep pairs
fn bench_sweeps(c: &mut Criterion) {
    let mut group = c.benchmark_group("svd_sweeps");
    group.sample_size(20);
    let mut rng = StdRng::seed_from_u64(2);

    for num_qubits in [3usize, 4] {
        let target = random_unitary(1 << num_qubits, &mut rng);
        let gates: Vec<Gate> =
            random_blocks(&default_locations(num_qubits, 2 * num_qubits), &mut rng).unwrap();
        let synth = SvdSynthesizer::new(
            SynthesisConfig::default()
                .with_max_iters(10)
                .with_threshold(1e-300),
        )
        .unwrap();

        group.bench_with_input(
            BenchmarkId::new("10_iters", num_qubits),
            &num_qubits,
            |b, _| {
                b.iter(|| {
                    synth
                        .expand_with_observer(target.clone(), gates.clone(), &mut NoopObserver)
                        .unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_contract_gate, bench_env_matrix, bench_sweeps);
criterion_main!(benches);
