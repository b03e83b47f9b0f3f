//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::StandardGate;
use crate::qubit::{ClbitId, QubitId};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A unitary gate.
    Gate(StandardGate),
    /// Barrier (scheduling marker, no effect on the state).
    Barrier,
    /// Measurement of `qubits[i]` into `clbits[i]`.
    Measure,
}

/// A complete instruction with operands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
    /// Classical bits this instruction writes (measurement only).
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a measurement mapping each qubit to the same-indexed clbit.
    pub fn measure_all(num_qubits: u32) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: (0..num_qubits).map(QubitId).collect(),
            clbits: (0..num_qubits).map(ClbitId).collect(),
        }
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match &self.kind {
            InstructionKind::Gate(gate) => gate.name(),
            InstructionKind::Barrier => "barrier",
            InstructionKind::Measure => "measure",
        }
    }

    /// The gate, if this instruction is one.
    pub fn as_gate(&self) -> Option<StandardGate> {
        match self.kind {
            InstructionKind::Gate(gate) => Some(gate),
            _ => None,
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self.kind, InstructionKind::Measure)
    }
}
