//! Error types for the protocol layer.

use thiserror::Error;

/// Errors raised by the protocol drivers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// Bell-state tag outside the four supported kinds.
    #[error("Unknown Bell state type '{0}' (expected phi+, phi-, psi+ or psi-)")]
    UnknownBellStateType(String),

    /// A protocol run needs at least one round.
    #[error("Round count must be at least 1, got {0}")]
    InvalidRoundCount(usize),

    /// Circuit construction failed.
    #[error("Circuit error: {0}")]
    Ir(#[from] qentangle_ir::IrError),

    /// Evolution or sampling failed.
    #[error("Simulation error: {0}")]
    Sim(#[from] qentangle_sim::SimError),
}

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
