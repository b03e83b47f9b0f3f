//! qentangle Circuit Representation
//!
//! This crate provides the data structures the simulator consumes: qubit
//! addressing, the gate set, instructions, and the immutable [`Circuit`].
//!
//! # Overview
//!
//! Circuits are assembled with a [`CircuitBuilder`], which validates every
//! operand as it is appended, and then frozen with
//! [`CircuitBuilder::build`]. A built [`Circuit`] cannot be mutated, so it can
//! be replayed across shots or shared between worker threads freely.
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use qentangle_ir::{CircuitBuilder, QubitId};
//!
//! let mut builder = CircuitBuilder::new("bell", 2);
//!
//! // |00⟩ → (|00⟩ + |11⟩)/√2
//! builder.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
//! builder.measure_all();
//!
//! let circuit = builder.build();
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.num_gates(), 2);
//! assert!(circuit.has_measurements());
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `CX` | 2 | Controlled-NOT (CNOT) |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::{Circuit, CircuitBuilder};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
