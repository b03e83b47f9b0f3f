//! BB84 key exchange over Bell pairs.
//!
//! Each round shares a fresh |Φ+⟩ pair between Alice (qubit 0) and Bob
//! (qubit 1). Both parties pick a measurement basis at random; choosing the
//! X basis applies H to their qubit before the joint measurement. When the
//! bases agree the two bits are perfectly correlated, so Bob's bit joins the
//! shared key and the full outcome is kept for verification. Rounds with
//! mismatched bases are discarded.
//!
//! Rounds are independent. Their seeds are drawn in order from one master
//! sampler before any round runs, so a seeded run produces the same outcome
//! whether rounds execute serially or on the rayon pool.

use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument};

use qentangle_ir::{Circuit, CircuitBuilder, QubitId};
use qentangle_sim::{MeasurementOutcome, Sampler, SimConfig, StatevectorEngine};

use crate::error::{ProtocolError, ProtocolResult};

/// Measurement basis chosen by one party in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Basis {
    /// Computational basis (Z): |0⟩, |1⟩
    Z,
    /// Hadamard basis (X): |+⟩, |−⟩
    X,
}

impl Basis {
    /// Map a random bit to a basis: 0 is Z, 1 is X.
    pub fn from_bit(bit: u8) -> Self {
        if bit == 0 { Basis::Z } else { Basis::X }
    }

    /// 0 for Z, 1 for X.
    pub fn bit(&self) -> u8 {
        match self {
            Basis::Z => 0,
            Basis::X => 1,
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bit())
    }
}

impl Serialize for Basis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bit())
    }
}

/// Knobs for a BB84 run.
#[derive(Debug, Clone, Copy)]
pub struct Bb84Options {
    /// Master seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Run rounds on the rayon pool.
    pub parallel: bool,
    /// Engine evolving each round.
    pub engine: StatevectorEngine,
}

impl Default for Bb84Options {
    fn default() -> Self {
        Self {
            seed: None,
            parallel: true,
            engine: StatevectorEngine::new(),
        }
    }
}

impl Bb84Options {
    /// Reproducible options with the given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Options taken from a loaded configuration.
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            seed: config.seed,
            parallel: config.parallel_rounds,
            engine: config.engine(),
        }
    }

    /// Toggle parallel round execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn master_sampler(&self) -> Sampler {
        match self.seed {
            Some(seed) => Sampler::seeded(seed),
            None => Sampler::from_entropy(),
        }
    }
}

/// Result of a BB84 run.
///
/// `alice_bases`, `bob_bases` and `alice_bits` are indexed by round.
/// `shared_key[k]` and `verifications[k]` come from the k-th round whose
/// bases matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bb84Outcome {
    /// Sifted key bits (0 or 1).
    pub shared_key: Vec<u8>,
    /// Alice's basis per round.
    pub alice_bases: Vec<Basis>,
    /// Bob's basis per round.
    pub bob_bases: Vec<Basis>,
    /// Alice's random bit per round.
    pub alice_bits: Vec<u8>,
    /// Full two-qubit outcome of every sifted round.
    pub verifications: Vec<MeasurementOutcome>,
}

impl Bb84Outcome {
    /// Number of rounds played.
    pub fn rounds(&self) -> usize {
        self.alice_bases.len()
    }

    /// Key rendered as a string of '0' and '1'.
    pub fn key_string(&self) -> String {
        self.shared_key
            .iter()
            .map(|&b| if b == 0 { '0' } else { '1' })
            .collect()
    }

    /// Fraction of rounds that survived sifting.
    pub fn sift_rate(&self) -> f64 {
        if self.rounds() == 0 {
            return 0.0;
        }
        self.shared_key.len() as f64 / self.rounds() as f64
    }

    /// Fraction of verification outcomes whose two bits agree.
    ///
    /// Returns 1.0 when nothing survived sifting.
    pub fn verification_correlation(&self) -> f64 {
        if self.verifications.is_empty() {
            return 1.0;
        }
        let agreeing = self
            .verifications
            .iter()
            .filter(|o| o.bit(0) == o.bit(1))
            .count();
        agreeing as f64 / self.verifications.len() as f64
    }

    /// Split into `(shared_key, alice_bases, bob_bases, verifications)`.
    pub fn into_parts(self) -> (Vec<u8>, Vec<Basis>, Vec<Basis>, Vec<MeasurementOutcome>) {
        (
            self.shared_key,
            self.alice_bases,
            self.bob_bases,
            self.verifications,
        )
    }
}

/// One executed round.
#[derive(Debug, Clone, Copy)]
struct Round {
    alice_basis: Basis,
    bob_basis: Basis,
    alice_bit: u8,
    outcome: MeasurementOutcome,
}

/// Build the circuit for one round.
pub fn bb84_round_circuit(alice_basis: Basis, bob_basis: Basis) -> ProtocolResult<Circuit> {
    let (alice, bob) = (QubitId(0), QubitId(1));
    let mut builder = CircuitBuilder::new("bb84_round", 2);

    builder.h(alice)?.cx(alice, bob)?;
    if alice_basis == Basis::X {
        builder.h(alice)?;
    }
    if bob_basis == Basis::X {
        builder.h(bob)?;
    }
    builder.measure_all();

    Ok(builder.build())
}

fn run_round(engine: &StatevectorEngine, seed: u64) -> ProtocolResult<Round> {
    let mut sampler = Sampler::seeded(seed).with_tolerance(engine.tolerance());
    let alice_basis = Basis::from_bit(sampler.random_bit());
    let bob_basis = Basis::from_bit(sampler.random_bit());
    let alice_bit = sampler.random_bit();

    let circuit = bb84_round_circuit(alice_basis, bob_basis)?;
    let state = engine.evolve(&circuit)?;
    let outcome = sampler.sample_once(&state)?;

    Ok(Round {
        alice_basis,
        bob_basis,
        alice_bit,
        outcome,
    })
}

/// Run `n_bits` BB84 rounds.
///
/// Any failing round aborts the whole batch.
#[instrument(skip(options), fields(parallel = options.parallel))]
pub fn run_bb84(n_bits: usize, options: &Bb84Options) -> ProtocolResult<Bb84Outcome> {
    if n_bits == 0 {
        return Err(ProtocolError::InvalidRoundCount(n_bits));
    }
    let start = Instant::now();

    let mut master = options.master_sampler();
    let seeds: Vec<u64> = (0..n_bits).map(|_| master.next_seed()).collect();

    let engine = &options.engine;
    let rounds: Vec<Round> = if options.parallel {
        seeds
            .into_par_iter()
            .map(|seed| run_round(engine, seed))
            .collect::<ProtocolResult<_>>()?
    } else {
        seeds
            .into_iter()
            .map(|seed| run_round(engine, seed))
            .collect::<ProtocolResult<_>>()?
    };
    debug!("Executed {} rounds in {:?}", rounds.len(), start.elapsed());

    let mut outcome = Bb84Outcome {
        shared_key: Vec::new(),
        alice_bases: Vec::with_capacity(n_bits),
        bob_bases: Vec::with_capacity(n_bits),
        alice_bits: Vec::with_capacity(n_bits),
        verifications: Vec::new(),
    };
    for round in rounds {
        outcome.alice_bases.push(round.alice_basis);
        outcome.bob_bases.push(round.bob_basis);
        outcome.alice_bits.push(round.alice_bit);
        if round.alice_basis == round.bob_basis {
            // Bob's bit: second character of the outcome string.
            outcome.shared_key.push(round.outcome.bit(1));
            outcome.verifications.push(round.outcome);
        }
    }

    info!(
        "BB84 sifted {} of {} rounds (correlation {:.3})",
        outcome.shared_key.len(),
        n_bits,
        outcome.verification_correlation()
    );
    Ok(outcome)
}
