//! Simulation configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QENTANGLE_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::engine::{
    DEFAULT_MAX_QUBITS, DEFAULT_NORM_TOLERANCE, MAX_SUPPORTED_QUBITS, NormalizationPolicy,
    StatevectorEngine,
};
use crate::sampler::{DEFAULT_PARALLEL_SHOT_THRESHOLD, Sampler};

/// Simulator and protocol settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Shots per sampled circuit.
    pub shots: u32,

    /// Master seed; `None` draws from OS entropy.
    pub seed: Option<u64>,

    /// Allowed drift of total probability away from 1.
    pub norm_tolerance: f64,

    /// Reaction to normalization drift.
    pub normalization: NormalizationPolicy,

    /// Widest circuit the engine accepts.
    pub max_qubits: usize,

    /// Batch size at which shot sampling fans out across threads.
    pub parallel_shot_threshold: u32,

    /// Run independent protocol rounds on the thread pool.
    pub parallel_rounds: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            shots: 1000,
            seed: None,
            norm_tolerance: DEFAULT_NORM_TOLERANCE,
            normalization: NormalizationPolicy::default(),
            max_qubits: DEFAULT_MAX_QUBITS,
            parallel_shot_threshold: DEFAULT_PARALLEL_SHOT_THRESHOLD,
            parallel_rounds: true,
        }
    }
}

impl SimConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: SimConfig = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => SimConfig::default(),
        };

        let config = config.merge_vars(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay variables from `lookup` onto this configuration.
    ///
    /// Only variables that are present override the current values. A value
    /// that is present but unparsable is an error.
    pub fn merge_vars(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("QENTANGLE_SHOTS") {
            self.shots = parse_var("QENTANGLE_SHOTS", &v)?;
        }
        if let Some(v) = lookup("QENTANGLE_SEED") {
            self.seed = Some(parse_var("QENTANGLE_SEED", &v)?);
        }
        if let Some(v) = lookup("QENTANGLE_NORM_TOLERANCE") {
            self.norm_tolerance = parse_var("QENTANGLE_NORM_TOLERANCE", &v)?;
        }
        if let Some(v) = lookup("QENTANGLE_NORMALIZATION") {
            self.normalization = parse_var("QENTANGLE_NORMALIZATION", &v)?;
        }
        if let Some(v) = lookup("QENTANGLE_MAX_QUBITS") {
            self.max_qubits = parse_var("QENTANGLE_MAX_QUBITS", &v)?;
        }
        if let Some(v) = lookup("QENTANGLE_PARALLEL_SHOT_THRESHOLD") {
            self.parallel_shot_threshold = parse_var("QENTANGLE_PARALLEL_SHOT_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("QENTANGLE_PARALLEL_ROUNDS") {
            self.parallel_rounds = parse_var("QENTANGLE_PARALLEL_ROUNDS", &v)?;
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shots == 0 {
            return Err(ConfigError::ValidationError(
                "shots must be greater than 0".to_string(),
            ));
        }

        if !self.norm_tolerance.is_finite()
            || self.norm_tolerance <= 0.0
            || self.norm_tolerance > 1e-3
        {
            return Err(ConfigError::ValidationError(format!(
                "norm_tolerance must be in (0, 1e-3], got {}",
                self.norm_tolerance
            )));
        }

        if self.max_qubits == 0 || self.max_qubits > MAX_SUPPORTED_QUBITS {
            return Err(ConfigError::ValidationError(format!(
                "max_qubits must be in 1..={MAX_SUPPORTED_QUBITS}, got {}",
                self.max_qubits
            )));
        }

        if self.parallel_shot_threshold == 0 {
            return Err(ConfigError::ValidationError(
                "parallel_shot_threshold must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Engine configured from these settings.
    pub fn engine(&self) -> StatevectorEngine {
        StatevectorEngine::new()
            .with_tolerance(self.norm_tolerance)
            .with_policy(self.normalization)
            .with_max_qubits(self.max_qubits)
    }

    /// Sampler configured from these settings.
    pub fn sampler(&self) -> Sampler {
        let sampler = match self.seed {
            Some(seed) => Sampler::seeded(seed),
            None => Sampler::from_entropy(),
        };
        sampler
            .with_parallel_threshold(self.parallel_shot_threshold)
            .with_tolerance(self.norm_tolerance)
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ConfigError::ParseError(format!("{key}={value}: {e}")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
