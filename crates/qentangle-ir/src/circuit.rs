//! Circuit builder and the immutable circuit it produces.

use serde::Serialize;

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::QubitId;

/// An immutable quantum circuit.
///
/// Holds a fixed register width and the ordered instruction list. Only a
/// [`CircuitBuilder`] can create one, and every operand it contains has been
/// validated against the register width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Circuit {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// All instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Gate applications in program order, with their operands.
    pub fn gates(&self) -> impl Iterator<Item = (StandardGate, &[QubitId])> + '_ {
        self.instructions
            .iter()
            .filter_map(|inst| inst.as_gate().map(|g| (g, inst.qubits.as_slice())))
    }

    /// Number of gate applications.
    pub fn num_gates(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Whether the circuit ends in a measurement step.
    pub fn has_measurements(&self) -> bool {
        self.instructions.iter().any(Instruction::is_measure)
    }

    /// Get the circuit depth.
    ///
    /// Gates and measurements occupy one layer on each operand; a barrier
    /// aligns its qubits to the deepest among them without adding a layer.
    pub fn depth(&self) -> usize {
        let mut layers = vec![0usize; self.num_qubits()];
        for inst in &self.instructions {
            let front = inst
                .qubits
                .iter()
                .map(|q| layers[q.index()])
                .max()
                .unwrap_or(0);
            let next = match inst.kind {
                InstructionKind::Barrier => front,
                InstructionKind::Gate(_) | InstructionKind::Measure => front + 1,
            };
            for q in &inst.qubits {
                layers[q.index()] = next;
            }
        }
        layers.into_iter().max().unwrap_or(0)
    }
}

/// Incremental, validating builder for [`Circuit`].
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    name: String,
    num_qubits: u32,
    num_clbits: u32,
    instructions: Vec<Instruction>,
}

impl CircuitBuilder {
    /// Start a circuit over `num_qubits` qubits, all in |0⟩.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits: 0,
            instructions: vec![],
        }
    }

    /// Append an instruction after validating its operands.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        let gate_name = instruction.as_gate().map(|g| g.name().to_string());

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits();
            let got = instruction.qubits.len() as u32;
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected,
                    got,
                });
            }
        }

        for (pos, &qubit) in instruction.qubits.iter().enumerate() {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::InvalidQubitIndex {
                    qubit,
                    num_qubits: self.num_qubits,
                    gate_name,
                });
            }
            if instruction.qubits[..pos].contains(&qubit) {
                return Err(IrError::DuplicateQubit { qubit, gate_name });
            }
        }

        self.instructions.push(instruction);
        Ok(self)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Y, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))
    }

    /// Apply a barrier to all qubits.
    pub fn barrier_all(&mut self) -> &mut Self {
        self.instructions
            .push(Instruction::barrier((0..self.num_qubits).map(QubitId)));
        self
    }

    /// Measure every qubit into the same-indexed classical bit.
    pub fn measure_all(&mut self) -> &mut Self {
        self.num_clbits = self.num_clbits.max(self.num_qubits);
        self.instructions
            .push(Instruction::measure_all(self.num_qubits));
        self
    }

    /// Number of qubits declared for this circuit.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Freeze the circuit.
    pub fn build(self) -> Circuit {
        Circuit {
            name: self.name,
            num_qubits: self.num_qubits,
            num_clbits: self.num_clbits,
            instructions: self.instructions,
        }
    }
}
