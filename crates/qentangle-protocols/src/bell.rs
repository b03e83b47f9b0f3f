//! Bell-state preparation.
//!
//! Every kind starts from H(0), CX(0,1), which gives |Φ+⟩, and then applies
//! Pauli corrections on qubit 1:
//!
//! | Kind | Extra gates | Support |
//! |------|-------------|---------|
//! | Φ+   | none        | 00, 11  |
//! | Φ−   | Z(1)        | 00, 11  |
//! | Ψ+   | X(1)        | 01, 10  |
//! | Ψ−   | X(1), Z(1)  | 01, 10  |

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use qentangle_ir::{Circuit, CircuitBuilder, QubitId};
use qentangle_sim::{Counts, Sampler, StatevectorEngine};

use crate::error::{ProtocolError, ProtocolResult};

/// Shots used when the caller does not choose a count.
pub const DEFAULT_SHOTS: u32 = 1000;

/// One of the four Bell states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BellKind {
    /// (|00⟩ + |11⟩)/√2
    #[serde(rename = "phi+")]
    PhiPlus,
    /// (|00⟩ − |11⟩)/√2
    #[serde(rename = "phi-")]
    PhiMinus,
    /// (|01⟩ + |10⟩)/√2
    #[serde(rename = "psi+")]
    PsiPlus,
    /// (|01⟩ − |10⟩)/√2
    #[serde(rename = "psi-")]
    PsiMinus,
}

impl BellKind {
    /// All four kinds, in canonical order.
    pub const ALL: [BellKind; 4] = [
        BellKind::PhiPlus,
        BellKind::PhiMinus,
        BellKind::PsiPlus,
        BellKind::PsiMinus,
    ];

    /// Short tag accepted by [`FromStr`].
    pub fn tag(&self) -> &'static str {
        match self {
            BellKind::PhiPlus => "phi+",
            BellKind::PhiMinus => "phi-",
            BellKind::PsiPlus => "psi+",
            BellKind::PsiMinus => "psi-",
        }
    }

    /// The two bitstrings a noiseless measurement can produce.
    pub fn expected_outcomes(&self) -> [&'static str; 2] {
        match self {
            BellKind::PhiPlus | BellKind::PhiMinus => ["00", "11"],
            BellKind::PsiPlus | BellKind::PsiMinus => ["01", "10"],
        }
    }

    fn flips_target(&self) -> bool {
        matches!(self, BellKind::PsiPlus | BellKind::PsiMinus)
    }

    fn flips_phase(&self) -> bool {
        matches!(self, BellKind::PhiMinus | BellKind::PsiMinus)
    }
}

impl fmt::Display for BellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BellKind::PhiPlus => "Φ+",
            BellKind::PhiMinus => "Φ-",
            BellKind::PsiPlus => "Ψ+",
            BellKind::PsiMinus => "Ψ-",
        };
        f.write_str(symbol)
    }
}

impl FromStr for BellKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "phi+" | "phi_plus" => Ok(BellKind::PhiPlus),
            "phi-" | "phi_minus" => Ok(BellKind::PhiMinus),
            "psi+" | "psi_plus" => Ok(BellKind::PsiPlus),
            "psi-" | "psi_minus" => Ok(BellKind::PsiMinus),
            _ => Err(ProtocolError::UnknownBellStateType(s.to_string())),
        }
    }
}

/// Build the measured two-qubit circuit preparing `kind`.
pub fn build_bell_state(kind: BellKind) -> ProtocolResult<Circuit> {
    let (q0, q1) = (QubitId(0), QubitId(1));
    let mut builder = CircuitBuilder::new(format!("bell_{}", kind.tag()), 2);

    builder.h(q0)?.cx(q0, q1)?;
    if kind.flips_target() {
        builder.x(q1)?;
    }
    if kind.flips_phase() {
        builder.z(q1)?;
    }
    builder.measure_all();

    Ok(builder.build())
}

/// Prepare `kind` and sample it `shots` times with a default engine.
pub fn generate_bell_counts(
    kind: BellKind,
    shots: u32,
    sampler: &mut Sampler,
) -> ProtocolResult<Counts> {
    generate_bell_counts_with(&StatevectorEngine::new(), kind, shots, sampler)
}

/// Prepare `kind` on `engine` and sample it `shots` times.
pub fn generate_bell_counts_with(
    engine: &StatevectorEngine,
    kind: BellKind,
    shots: u32,
    sampler: &mut Sampler,
) -> ProtocolResult<Counts> {
    let circuit = build_bell_state(kind)?;
    debug!("Generating {} counts over {} shots", kind, shots);
    let state = engine.evolve(&circuit)?;
    Ok(sampler.sample(&state, shots)?)
}
