//! Property-based tests for state evolution.

use proptest::prelude::*;
use qentangle_ir::{CircuitBuilder, QubitId, StandardGate};
use qentangle_sim::{NormalizationPolicy, Sampler, StatevectorEngine};

/// One gate application: gate kind plus two raw operand picks.
fn arb_gate() -> impl Strategy<Value = (StandardGate, u32, u32)> {
    (
        prop_oneof![
            Just(StandardGate::H),
            Just(StandardGate::X),
            Just(StandardGate::Y),
            Just(StandardGate::Z),
            Just(StandardGate::CX),
        ],
        0_u32..64,
        0_u32..64,
    )
}

fn build(num_qubits: u32, gates: &[(StandardGate, u32, u32)]) -> qentangle_ir::Circuit {
    let mut builder = CircuitBuilder::new("random", num_qubits);
    for &(gate, a, b) in gates {
        let q0 = QubitId(a % num_qubits);
        match gate {
            StandardGate::CX => {
                if num_qubits < 2 {
                    continue;
                }
                // Second operand never equals the first.
                let q1 = QubitId((q0.0 + 1 + b % (num_qubits - 1)) % num_qubits);
                builder.cx(q0, q1).unwrap();
            }
            _ => {
                builder.apply(qentangle_ir::Instruction::single_qubit_gate(gate, q0)).unwrap();
            }
        }
    }
    builder.measure_all();
    builder.build()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Total probability stays at 1 through any gate sequence.
    #[test]
    fn random_circuits_preserve_norm(
        num_qubits in 1_u32..=6,
        gates in prop::collection::vec(arb_gate(), 0..=40),
    ) {
        let circuit = build(num_qubits, &gates);
        let engine = StatevectorEngine::new().with_policy(NormalizationPolicy::Strict);
        let state = engine.evolve(&circuit).unwrap();
        prop_assert!((state.norm_sqr() - 1.0).abs() < 1e-9);
    }

    /// Same circuit, same seed, same histogram.
    #[test]
    fn seeded_runs_are_reproducible(
        num_qubits in 1_u32..=4,
        gates in prop::collection::vec(arb_gate(), 0..=12),
        seed in any::<u64>(),
    ) {
        let circuit = build(num_qubits, &gates);
        let state = StatevectorEngine::new().evolve(&circuit).unwrap();
        let a = Sampler::seeded(seed).sample(&state, 200).unwrap();
        let b = Sampler::seeded(seed).sample(&state, 200).unwrap();
        prop_assert_eq!(a.total_shots(), 200);
        prop_assert_eq!(a, b);
    }

    /// Sampled outcomes always have non-zero probability.
    #[test]
    fn samples_stay_in_support(
        num_qubits in 1_u32..=4,
        gates in prop::collection::vec(arb_gate(), 0..=12),
        seed in any::<u64>(),
    ) {
        let circuit = build(num_qubits, &gates);
        let state = StatevectorEngine::new().evolve(&circuit).unwrap();
        let probs = state.probabilities();
        let mut sampler = Sampler::seeded(seed);
        for _ in 0..50 {
            let outcome = sampler.sample_once(&state).unwrap();
            prop_assert!(probs[outcome.index() as usize] > 1e-15);
            prop_assert_eq!(outcome.bitstring().len(), num_qubits as usize);
        }
    }
}
