//! Teleportation-style demonstration circuit.
//!
//! Qubit 0 holds the message |+⟩, qubits 1 and 2 share a Bell pair. A barrier
//! closes the preparation phase and every qubit is measured. No Bell-basis
//! rotation or classically controlled correction follows: the message bit is
//! uniform and qubits 1 and 2 always agree, giving four equally likely
//! outcomes.

use tracing::debug;

use qentangle_ir::{Circuit, CircuitBuilder, QubitId};
use qentangle_sim::{Counts, Sampler, StatevectorEngine};

use crate::error::ProtocolResult;

/// Build the three-qubit demonstration circuit.
pub fn build_teleportation_demo() -> ProtocolResult<Circuit> {
    let (message, alice, bob) = (QubitId(0), QubitId(1), QubitId(2));
    let mut builder = CircuitBuilder::new("teleportation", 3);

    // ── Phase 1: message state ──────────────────────────────────────
    builder.h(message)?;

    // ── Phase 2: shared Bell pair ───────────────────────────────────
    builder.h(alice)?.cx(alice, bob)?;

    // ── Phase 3: measurement ────────────────────────────────────────
    builder.barrier_all().measure_all();

    Ok(builder.build())
}

/// Run the demonstration circuit for `shots` shots with a default engine.
pub fn run_teleportation_demo(shots: u32, sampler: &mut Sampler) -> ProtocolResult<Counts> {
    run_teleportation_demo_with(&StatevectorEngine::new(), shots, sampler)
}

/// Run the demonstration circuit on `engine`.
pub fn run_teleportation_demo_with(
    engine: &StatevectorEngine,
    shots: u32,
    sampler: &mut Sampler,
) -> ProtocolResult<Counts> {
    let circuit = build_teleportation_demo()?;
    debug!("Running teleportation demo: {} shots", shots);
    let state = engine.evolve(&circuit)?;
    Ok(sampler.sample(&state, shots)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qentangle_ir::InstructionKind;

    #[test]
    fn test_structure() {
        let circuit = build_teleportation_demo().unwrap();
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.num_gates(), 3);

        let kinds: Vec<_> = circuit.instructions().iter().map(|i| &i.kind).collect();
        let barrier_at = kinds
            .iter()
            .position(|k| matches!(k, InstructionKind::Barrier))
            .unwrap();
        assert_eq!(barrier_at, 3);
        assert_eq!(circuit.instructions()[barrier_at].qubits.len(), 3);
        assert!(circuit.has_measurements());
    }

    #[test]
    fn test_final_state_is_uniform() {
        let state = StatevectorEngine::new()
            .evolve(&build_teleportation_demo().unwrap())
            .unwrap();
        // |+⟩ ⊗ Φ+ has weight 1/4 on four basis states.
        let probs = state.probabilities();
        let nonzero: Vec<_> = probs.iter().filter(|&&p| p > 1e-12).collect();
        assert_eq!(nonzero.len(), 4);
        for p in nonzero {
            assert!((p - 0.25).abs() < 1e-12);
        }
    }
}
