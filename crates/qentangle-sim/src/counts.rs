//! Measurement outcomes and shot histograms.
//!
//! Outcomes are stored as basis-state indices. Bitstrings only appear at the
//! API boundary: character `i` of a bitstring is the value of qubit `i`, so
//! the basis index `0b01` of a 2-qubit register prints as `"10"`.

use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Render a basis index as a bitstring with qubit 0 first.
pub fn index_to_bitstring(index: u64, num_qubits: usize) -> String {
    (0..num_qubits)
        .map(|q| if (index >> q) & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// Parse a qubit-0-first bitstring back into a basis index.
pub fn bitstring_to_index(bits: &str) -> Option<u64> {
    if bits.len() > 64 {
        return None;
    }
    bits.chars().enumerate().try_fold(0u64, |acc, (q, c)| match c {
        '0' => Some(acc),
        '1' => Some(acc | (1 << q)),
        _ => None,
    })
}

/// One classical result of measuring every qubit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeasurementOutcome {
    index: u64,
    num_qubits: usize,
}

impl MeasurementOutcome {
    /// Create an outcome for basis state `index` of an n-qubit register.
    pub fn new(index: u64, num_qubits: usize) -> Self {
        Self { index, num_qubits }
    }

    /// The measured basis-state index.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Register width.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Classical bit recorded for `qubit` (0 or 1).
    pub fn bit(&self, qubit: usize) -> u8 {
        ((self.index >> qubit) & 1) as u8
    }

    /// Bitstring form, qubit 0 first.
    pub fn bitstring(&self) -> String {
        index_to_bitstring(self.index, self.num_qubits)
    }
}

impl fmt::Display for MeasurementOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bitstring())
    }
}

impl Serialize for MeasurementOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Histogram of measurement outcomes over a batch of shots.
///
/// Built by the sampler; read-only for everyone else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counts {
    num_qubits: usize,
    counts: FxHashMap<u64, u64>,
    total: u64,
}

impl Counts {
    pub(crate) fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            counts: FxHashMap::default(),
            total: 0,
        }
    }

    pub(crate) fn record(&mut self, index: u64) {
        *self.counts.entry(index).or_insert(0) += 1;
        self.total += 1;
    }

    /// Add every count of `other` into this histogram.
    pub fn merge(&mut self, other: &Counts) {
        for (&index, &count) in &other.counts {
            *self.counts.entry(index).or_insert(0) += count;
        }
        self.total += other.total;
    }

    /// Register width of the measured circuit.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Count for a bitstring; unknown or malformed strings count zero.
    pub fn get(&self, bitstring: &str) -> u64 {
        if bitstring.len() != self.num_qubits {
            return 0;
        }
        bitstring_to_index(bitstring).map_or(0, |i| self.get_index(i))
    }

    /// Count for a basis-state index.
    pub fn get_index(&self, index: u64) -> u64 {
        self.counts.get(&index).copied().unwrap_or(0)
    }

    /// Total number of shots recorded.
    pub fn total_shots(&self) -> u64 {
        self.total
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no shots were recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Observed frequency of a bitstring.
    pub fn probability(&self, bitstring: &str) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.get(bitstring) as f64 / self.total as f64
    }

    /// Observed frequency of every outcome, keyed by bitstring.
    pub fn probabilities(&self) -> BTreeMap<String, f64> {
        let total = self.total.max(1) as f64;
        self.iter()
            .map(|(bits, count)| (bits, count as f64 / total))
            .collect()
    }

    /// Iterate `(bitstring, count)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (String, u64)> + '_ {
        self.counts
            .iter()
            .map(|(&index, &count)| (index_to_bitstring(index, self.num_qubits), count))
    }

    /// Observed bitstrings in no particular order.
    pub fn bitstrings(&self) -> impl Iterator<Item = String> + '_ {
        self.iter().map(|(bits, _)| bits)
    }

    /// Outcomes sorted by count (descending), ties broken by bitstring.
    pub fn sorted(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    /// The most frequent outcome, if any shot was recorded.
    pub fn most_frequent(&self) -> Option<(String, u64)> {
        self.sorted().into_iter().next()
    }

    /// Bitstring-keyed copy, ordered by bitstring.
    pub fn to_map(&self) -> BTreeMap<String, u64> {
        self.iter().collect()
    }
}

impl Serialize for Counts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ordered = self.to_map();
        let mut map = serializer.serialize_map(Some(ordered.len()))?;
        for (bits, count) in &ordered {
            map.serialize_entry(bits, count)?;
        }
        map.end()
    }
}
