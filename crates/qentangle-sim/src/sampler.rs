//! Born-rule measurement sampling.
//!
//! A [`Distribution`] is built once per final state and shared read-only by
//! every shot. Large batches are split into fixed-size chunks that run on the
//! rayon pool; each chunk draws from its own generator seeded by the
//! sampler's master generator, so a seeded sampler reproduces the same counts
//! regardless of how many worker threads are available.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, instrument};

use crate::counts::{Counts, MeasurementOutcome};
use crate::engine::DEFAULT_NORM_TOLERANCE;
use crate::error::{SimError, SimResult};
use crate::statevector::QuantumState;

/// Shots handled by one parallel work item.
pub const SHOT_CHUNK: u32 = 1024;

/// Default batch size at which sampling fans out across threads.
pub const DEFAULT_PARALLEL_SHOT_THRESHOLD: u32 = 4096;

/// Cumulative outcome distribution of a state.
#[derive(Debug, Clone)]
pub struct Distribution {
    cumulative: Vec<f64>,
    last_nonzero: usize,
    num_qubits: usize,
}

impl Distribution {
    /// Build the distribution `|amplitude|²` of `state`.
    ///
    /// Fails with [`SimError::NumericalInvariantViolation`] unless the total
    /// probability is finite, positive and within `tolerance` of 1.
    /// Probabilities are divided by their sum, and the bound of the last
    /// non-zero bucket is pinned to exactly 1.0 so every draw in [0, 1)
    /// lands in a bucket with non-zero probability.
    pub fn from_state(state: &QuantumState, tolerance: f64) -> SimResult<Self> {
        let probs = state.probabilities();
        let total: f64 = probs.iter().sum();
        if !total.is_finite() || total <= 0.0 || (total - 1.0).abs() > tolerance {
            return Err(SimError::NumericalInvariantViolation {
                norm: total,
                tolerance,
                context: "before sampling".to_string(),
            });
        }
        let last_nonzero = probs.iter().rposition(|&p| p > 0.0).unwrap_or(0);

        let mut acc = 0.0;
        let mut cumulative: Vec<f64> = probs
            .iter()
            .map(|&p| {
                acc += p / total;
                acc
            })
            .collect();
        for bound in &mut cumulative[last_nonzero..] {
            *bound = 1.0;
        }

        Ok(Self {
            cumulative,
            last_nonzero,
            num_qubits: state.num_qubits(),
        })
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Probability of basis state `index`.
    pub fn probability(&self, index: usize) -> f64 {
        match index {
            0 => self.cumulative.first().copied().unwrap_or(0.0),
            i if i < self.cumulative.len() => self.cumulative[i] - self.cumulative[i - 1],
            _ => 0.0,
        }
    }

    /// Draw one basis-state index.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let r: f64 = rng.r#gen();
        // First bucket whose upper bound exceeds r; zero-width buckets are skipped.
        let index = self.cumulative.partition_point(|&bound| bound <= r);
        index.min(self.last_nonzero) as u64
    }
}

/// Measurement sampler owning an explicit random generator.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: StdRng,
    parallel_threshold: u32,
    tolerance: f64,
}

impl Sampler {
    /// Sampler with a reproducible generator.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            parallel_threshold: DEFAULT_PARALLEL_SHOT_THRESHOLD,
            tolerance: DEFAULT_NORM_TOLERANCE,
        }
    }

    /// Sampler seeded from operating-system entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            parallel_threshold: DEFAULT_PARALLEL_SHOT_THRESHOLD,
            tolerance: DEFAULT_NORM_TOLERANCE,
        }
    }

    /// Set the batch size at which shots fan out across threads.
    pub fn with_parallel_threshold(mut self, threshold: u32) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    /// Set the normalization tolerance checked before sampling.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Draw a fresh seed from the master generator.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.r#gen()
    }

    /// Independent sampler for one unit of work (a round, a chunk).
    pub fn fork(&mut self) -> Sampler {
        Sampler {
            rng: StdRng::seed_from_u64(self.next_seed()),
            parallel_threshold: self.parallel_threshold,
            tolerance: self.tolerance,
        }
    }

    /// Uniform random bit.
    pub fn random_bit(&mut self) -> u8 {
        u8::from(self.rng.gen_bool(0.5))
    }

    /// Measure `state` once.
    pub fn sample_once(&mut self, state: &QuantumState) -> SimResult<MeasurementOutcome> {
        let dist = Distribution::from_state(state, self.tolerance)?;
        Ok(MeasurementOutcome::new(
            dist.draw(&mut self.rng),
            state.num_qubits(),
        ))
    }

    /// Measure `state` `shots` times.
    #[instrument(skip(self, state), fields(num_qubits = state.num_qubits()))]
    pub fn sample(&mut self, state: &QuantumState, shots: u32) -> SimResult<Counts> {
        if shots == 0 {
            return Err(SimError::InvalidShots(shots));
        }
        let start = Instant::now();
        let dist = Distribution::from_state(state, self.tolerance)?;
        let counts = self.sample_distribution(&dist, shots);
        debug!("Sampled {} shots in {:?}", shots, start.elapsed());
        Ok(counts)
    }

    /// Draw `shots` outcomes from a prepared distribution.
    pub fn sample_distribution(&mut self, dist: &Distribution, shots: u32) -> Counts {
        if shots < self.parallel_threshold {
            let mut counts = Counts::new(dist.num_qubits());
            for _ in 0..shots {
                counts.record(dist.draw(&mut self.rng));
            }
            return counts;
        }

        let chunks: Vec<(u64, u32)> = (0..shots.div_ceil(SHOT_CHUNK))
            .map(|chunk| {
                let len = SHOT_CHUNK.min(shots - chunk * SHOT_CHUNK);
                (self.next_seed(), len)
            })
            .collect();
        debug!("Fanning out {} shots over {} chunks", shots, chunks.len());

        chunks
            .into_par_iter()
            .map(|(seed, len)| {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut counts = Counts::new(dist.num_qubits());
                for _ in 0..len {
                    counts.record(dist.draw(&mut rng));
                }
                counts
            })
            .reduce(
                || Counts::new(dist.num_qubits()),
                |mut acc, part| {
                    acc.merge(&part);
                    acc
                },
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    fn state(amps: &[f64]) -> QuantumState {
        QuantumState::from_amplitudes(amps.iter().map(|&a| Complex64::new(a, 0.0)).collect())
            .unwrap()
    }

    #[test]
    fn test_sample_deterministic() {
        // |1⟩ state should always sample to 1
        let sv = QuantumState::basis_state(1, 1).unwrap();
        let mut sampler = Sampler::seeded(7);
        for _ in 0..100 {
            assert_eq!(sampler.sample_once(&sv).unwrap().index(), 1);
        }
    }

    #[test]
    fn test_zero_probability_never_drawn() {
        let half = std::f64::consts::FRAC_1_SQRT_2;
        let sv = state(&[0.0, half, 0.0, half]);
        let mut sampler = Sampler::seeded(11);
        let counts = sampler.sample(&sv, 5000).unwrap();
        assert_eq!(counts.get_index(0), 0);
        assert_eq!(counts.get_index(2), 0);
        assert_eq!(counts.total_shots(), 5000);
    }

    #[test]
    fn test_distribution_pins_last_bucket() {
        // Slightly sub-normalized input still covers [0, 1).
        let sv = state(&[0.6, 0.0, 0.79999, 0.0]);
        let dist = Distribution::from_state(&sv, 1e-3).unwrap();
        assert_eq!(dist.cumulative[2], 1.0);
        assert_eq!(dist.cumulative[3], 1.0);
        assert_eq!(dist.probability(1), 0.0);
        assert_eq!(dist.probability(3), 0.0);

        struct AlmostOne;
        impl rand::RngCore for AlmostOne {
            fn next_u32(&mut self) -> u32 {
                u32::MAX
            }
            fn next_u64(&mut self) -> u64 {
                u64::MAX
            }
            fn fill_bytes(&mut self, dest: &mut [u8]) {
                dest.fill(0xff);
            }
            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
                dest.fill(0xff);
                Ok(())
            }
        }
        assert_eq!(dist.draw(&mut AlmostOne), 2);
    }

    #[test]
    fn test_zero_vector_rejected() {
        let sv = state(&[0.0; 4]);
        let mut sampler = Sampler::seeded(1);
        assert!(matches!(
            sampler.sample(&sv, 10),
            Err(SimError::NumericalInvariantViolation { .. })
        ));
        assert!(matches!(
            sampler.sample_once(&sv),
            Err(SimError::NumericalInvariantViolation { .. })
        ));
    }

    #[test]
    fn test_unnormalized_state_rejected() {
        // Total probability 9.
        let sv = state(&[3.0, 0.0]);
        let err = Sampler::seeded(1).sample(&sv, 5).unwrap_err();
        match err {
            SimError::NumericalInvariantViolation { norm, .. } => {
                assert!((norm - 9.0).abs() < 1e-12);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_tolerance_is_configurable() {
        let sv = state(&[0.6, 0.0, 0.79999, 0.0]);
        assert!(Sampler::seeded(2).sample(&sv, 10).is_err());
        let counts = Sampler::seeded(2)
            .with_tolerance(1e-3)
            .sample(&sv, 10)
            .unwrap();
        assert_eq!(counts.get_index(1) + counts.get_index(3), 0);
    }

    #[test]
    fn test_zero_shots_rejected() {
        let mut sampler = Sampler::seeded(0);
        assert!(matches!(
            sampler.sample(&QuantumState::new(1), 0),
            Err(SimError::InvalidShots(0))
        ));
    }

    #[test]
    fn test_seeded_sampling_reproducible() {
        let sv = state(&[0.5, 0.5, 0.5, 0.5]);
        let a = Sampler::seeded(42).sample(&sv, 2000).unwrap();
        let b = Sampler::seeded(42).sample(&sv, 2000).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_path_counts_every_shot() {
        let sv = state(&[0.5, 0.5, 0.5, 0.5]);
        let mut sampler = Sampler::seeded(3).with_parallel_threshold(1);
        let counts = sampler.sample(&sv, 10_000).unwrap();
        assert_eq!(counts.total_shots(), 10_000);
        for index in 0..4 {
            let freq = counts.get_index(index) as f64 / 10_000.0;
            assert!((freq - 0.25).abs() < 0.05, "index {index}: {freq}");
        }
    }

    #[test]
    fn test_parallel_path_reproducible() {
        let sv = state(&[0.5, 0.5, 0.5, 0.5]);
        let a = Sampler::seeded(9)
            .with_parallel_threshold(1)
            .sample(&sv, 5000)
            .unwrap();
        let b = Sampler::seeded(9)
            .with_parallel_threshold(1)
            .sample(&sv, 5000)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fork_is_deterministic() {
        let mut a = Sampler::seeded(5);
        let mut b = Sampler::seeded(5);
        assert_eq!(a.fork().next_seed(), b.fork().next_seed());
    }
}
