//! Benchmarks for statevector evolution and sampling
//!
//! Run with: cargo bench -p qentangle-sim

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qentangle_ir::{Circuit, CircuitBuilder, QubitId};
use qentangle_sim::{Sampler, StatevectorEngine};

/// H on every qubit followed by a CX ladder.
fn ghz_like(num_qubits: u32) -> Circuit {
    let mut builder = CircuitBuilder::new("bench", num_qubits);
    for q in 0..num_qubits {
        builder.h(QubitId(q)).unwrap();
    }
    for q in 0..num_qubits.saturating_sub(1) {
        builder.cx(QubitId(q), QubitId(q + 1)).unwrap();
    }
    builder.measure_all();
    builder.build()
}

fn bench_evolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolution");
    let engine = StatevectorEngine::new();

    for num_qubits in &[2, 6, 10, 14, 18] {
        let circuit = ghz_like(*num_qubits);
        group.bench_with_input(
            BenchmarkId::new("ghz_like", num_qubits),
            &circuit,
            |b, circuit| {
                b.iter(|| engine.evolve(black_box(circuit)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");
    let state = StatevectorEngine::new().evolve(&ghz_like(10)).unwrap();

    for shots in &[100_u32, 1_000, 10_000, 100_000] {
        group.bench_with_input(BenchmarkId::new("shots", shots), shots, |b, &shots| {
            let mut sampler = Sampler::seeded(42);
            b.iter(|| sampler.sample(black_box(&state), shots).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evolution, bench_sampling);
criterion_main!(benches);
