//! Property-based tests for circuit construction.

use proptest::prelude::*;
use qentangle_ir::{CircuitBuilder, IrError, QubitId};

proptest! {
    /// Any in-range single-qubit gate is accepted and lands in order.
    #[test]
    fn in_range_gates_are_accepted(
        num_qubits in 1_u32..=6,
        targets in prop::collection::vec(0_u32..64, 1..=20),
    ) {
        let mut builder = CircuitBuilder::new("prop", num_qubits);
        let mut accepted = 0;
        for t in targets {
            let q = QubitId(t % num_qubits);
            builder.h(q).unwrap();
            accepted += 1;
        }
        let circuit = builder.build();
        prop_assert_eq!(circuit.num_gates(), accepted);
        prop_assert!(circuit.depth() <= accepted);
    }

    /// Any operand at or beyond the register width is rejected.
    #[test]
    fn out_of_range_operands_are_rejected(
        num_qubits in 1_u32..=6,
        overshoot in 0_u32..10,
    ) {
        let mut builder = CircuitBuilder::new("prop", num_qubits);
        let bad = QubitId(num_qubits + overshoot);
        let is_invalid_index = matches!(
            builder.x(bad),
            Err(IrError::InvalidQubitIndex { .. })
        );
        prop_assert!(is_invalid_index);
        prop_assert_eq!(builder.build().num_gates(), 0);
    }
}
