//! Error types for the sim crate.

use thiserror::Error;

/// Errors produced while evolving or sampling a state.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Total probability drifted away from 1 beyond tolerance.
    #[error("Normalization violated {context}: |ψ|² = {norm:.12} (tolerance {tolerance:e})")]
    NumericalInvariantViolation {
        /// Observed sum of squared magnitudes.
        norm: f64,
        /// Allowed absolute deviation from 1.
        tolerance: f64,
        /// Where the check failed.
        context: String,
    },

    /// Sampling needs at least one shot.
    #[error("shots must be at least 1, got {0}")]
    InvalidShots(u32),

    /// Circuit is wider than the engine accepts.
    #[error("Circuit has {requested} qubits but the engine supports at most {max}")]
    TooManyQubits {
        /// Width of the offending circuit.
        requested: usize,
        /// Configured limit.
        max: usize,
    },

    /// Basis-state index outside the state vector.
    #[error("Basis state {index} does not exist in a {num_qubits}-qubit register")]
    InvalidBasisState {
        /// The offending index.
        index: u64,
        /// Register width.
        num_qubits: usize,
    },

    /// Raw amplitude input whose length is not a power of two.
    #[error("Amplitude vector length {0} is not a power of two")]
    InvalidAmplitudeCount(usize),

    /// Circuit IR error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] qentangle_ir::IrError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
