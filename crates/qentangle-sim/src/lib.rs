//! qentangle Statevector Simulator
//!
//! Exact, noiseless simulation of small circuits built with `qentangle-ir`.
//!
//! # Features
//!
//! - **Exact Evolution**: Full statevector representation, gates applied in
//!   place with normalization checked against a configurable tolerance
//! - **Born-Rule Sampling**: Per-shot draws from the final state, fanned out
//!   across the rayon pool for large batches
//! - **Explicit Randomness**: Every [`Sampler`] owns its generator and can be
//!   seeded for reproducible runs
//!
//! # Performance
//!
//! | Qubits | Memory | Simulation Speed |
//! |--------|--------|------------------|
//! | 10 | ~16 KB | Instant |
//! | 15 | ~512 KB | Fast |
//! | 20 | ~16 MB | Moderate |
//! | 24 | ~256 MB | Slow |
//!
//! # Example
//!
//! ```rust
//! use qentangle_ir::{CircuitBuilder, QubitId};
//! use qentangle_sim::{Sampler, StatevectorEngine};
//!
//! let mut builder = CircuitBuilder::new("bell", 2);
//! builder.h(QubitId(0)).unwrap().cx(QubitId(0), QubitId(1)).unwrap();
//! builder.measure_all();
//! let circuit = builder.build();
//!
//! let state = StatevectorEngine::new().evolve(&circuit).unwrap();
//! let counts = Sampler::seeded(1).sample(&state, 1000).unwrap();
//!
//! // Expect ~50% "00" and ~50% "11"
//! assert_eq!(counts.get("00") + counts.get("11"), 1000);
//! ```

pub mod config;
pub mod counts;
pub mod engine;
pub mod error;
pub mod sampler;
pub mod statevector;

pub use config::{ConfigError, SimConfig};
pub use counts::{Counts, MeasurementOutcome};
pub use engine::{NormalizationPolicy, StatevectorEngine, evolve};
pub use error::{SimError, SimResult};
pub use sampler::{Distribution, Sampler};
pub use statevector::QuantumState;
