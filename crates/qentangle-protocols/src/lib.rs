//! qentangle Protocols
//!
//! Small quantum-information protocols driven on the statevector simulator.
//!
//! - [`bell`]: the four maximally entangled two-qubit states
//! - [`teleport`]: a three-qubit teleportation-style circuit
//! - [`bb84`]: BB84 key exchange over Bell pairs, with the sifted outcomes
//!   kept for correlation checks
//!
//! # Example
//!
//! ```rust
//! use qentangle_protocols::bell::{BellKind, generate_bell_counts};
//! use qentangle_sim::Sampler;
//!
//! let kind: BellKind = "psi-".parse().unwrap();
//! let counts = generate_bell_counts(kind, 500, &mut Sampler::seeded(3)).unwrap();
//! assert_eq!(counts.get("01") + counts.get("10"), 500);
//! ```

pub mod bb84;
pub mod bell;
pub mod error;
pub mod teleport;

pub use bb84::{Basis, Bb84Options, Bb84Outcome, run_bb84};
pub use bell::{BellKind, DEFAULT_SHOTS, build_bell_state, generate_bell_counts};
pub use error::{ProtocolError, ProtocolResult};
pub use teleport::{build_teleportation_demo, run_teleportation_demo};
