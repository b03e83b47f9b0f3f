//! State evolution engine.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument, warn};

use qentangle_ir::{Circuit, InstructionKind};

use crate::error::{SimError, SimResult};
use crate::statevector::QuantumState;

/// Default allowed drift of Σ|a|² away from 1.
pub const DEFAULT_NORM_TOLERANCE: f64 = 1e-9;

/// Default maximum register width (2^24 amplitudes, 256 MiB).
pub const DEFAULT_MAX_QUBITS: usize = 24;

/// Widest register the engine will ever allocate.
pub const MAX_SUPPORTED_QUBITS: usize = 30;

/// What to do when total probability drifts beyond tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationPolicy {
    /// Check after every gate and fail with
    /// [`SimError::NumericalInvariantViolation`].
    Strict,
    /// Check once after evolution, log a warning and rescale.
    Renormalize,
}

impl Default for NormalizationPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            NormalizationPolicy::Strict
        } else {
            NormalizationPolicy::Renormalize
        }
    }
}

impl std::str::FromStr for NormalizationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(NormalizationPolicy::Strict),
            "renormalize" => Ok(NormalizationPolicy::Renormalize),
            other => Err(format!(
                "unknown normalization policy '{other}' (expected strict or renormalize)"
            )),
        }
    }
}

/// Stateless statevector evolution engine.
///
/// The engine only carries immutable options, so a single value can be
/// shared by reference across threads. [`StatevectorEngine::evolve`] is a pure
/// function of its circuit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatevectorEngine {
    tolerance: f64,
    policy: NormalizationPolicy,
    max_qubits: usize,
}

impl StatevectorEngine {
    /// Create an engine with default settings.
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_NORM_TOLERANCE,
            policy: NormalizationPolicy::default(),
            max_qubits: DEFAULT_MAX_QUBITS,
        }
    }

    /// Set the normalization tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the normalization policy.
    pub fn with_policy(mut self, policy: NormalizationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the maximum accepted register width, capped at
    /// [`MAX_SUPPORTED_QUBITS`].
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits.min(MAX_SUPPORTED_QUBITS);
        self
    }

    /// Maximum accepted register width.
    pub fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    /// Normalization tolerance in use.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Normalization policy in use.
    pub fn policy(&self) -> NormalizationPolicy {
        self.policy
    }

    /// Evolve |0...0⟩ through every gate of `circuit`, in order.
    ///
    /// Barriers and the measurement step leave the state untouched; the
    /// returned state is the one measurement would collapse.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn evolve(&self, circuit: &Circuit) -> SimResult<QuantumState> {
        let start = Instant::now();
        let num_qubits = circuit.num_qubits();
        if num_qubits > self.max_qubits {
            return Err(SimError::TooManyQubits {
                requested: num_qubits,
                max: self.max_qubits,
            });
        }

        debug!(
            "Starting evolution: {} qubits, {} gates",
            num_qubits,
            circuit.num_gates()
        );

        let mut state = QuantumState::new(num_qubits);
        for (step, inst) in circuit.instructions().iter().enumerate() {
            match &inst.kind {
                InstructionKind::Gate(gate) => {
                    state.apply_gate(*gate, &inst.qubits)?;
                    if self.policy == NormalizationPolicy::Strict {
                        self.enforce_norm(&mut state, || {
                            format!("after {} at step {step}", inst.name())
                        })?;
                    }
                }
                InstructionKind::Barrier | InstructionKind::Measure => {}
            }
        }

        if self.policy == NormalizationPolicy::Renormalize {
            self.enforce_norm(&mut state, || "after evolution".to_string())?;
        }

        debug!("Evolution completed in {:?}", start.elapsed());
        Ok(state)
    }

    fn enforce_norm(
        &self,
        state: &mut QuantumState,
        context: impl FnOnce() -> String,
    ) -> SimResult<()> {
        let norm = state.norm_sqr();
        if (norm - 1.0).abs() <= self.tolerance {
            return Ok(());
        }
        match self.policy {
            NormalizationPolicy::Strict => Err(SimError::NumericalInvariantViolation {
                norm,
                tolerance: self.tolerance,
                context: context(),
            }),
            NormalizationPolicy::Renormalize => {
                warn!(
                    norm,
                    tolerance = self.tolerance,
                    "Normalization drift {}; renormalizing",
                    context()
                );
                state.renormalize();
                Ok(())
            }
        }
    }
}

impl Default for StatevectorEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Evolve `circuit` with a default-configured engine.
pub fn evolve(circuit: &Circuit) -> SimResult<QuantumState> {
    StatevectorEngine::new().evolve(circuit)
}
