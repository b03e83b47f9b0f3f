//! Statevector representation and gate kernels.

use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

use qentangle_ir::{IrError, QubitId, StandardGate};

use crate::error::{SimError, SimResult};

/// A statevector representing an n-qubit quantum state.
///
/// Amplitude `i` belongs to the basis state whose bit `q` is the value of
/// qubit `q`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantumState {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl QuantumState {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Create the computational basis state `|index⟩`.
    pub fn basis_state(num_qubits: usize, index: u64) -> SimResult<Self> {
        let mut state = Self::new(num_qubits);
        let slot = usize::try_from(index)
            .ok()
            .filter(|&i| i < state.amplitudes.len())
            .ok_or(SimError::InvalidBasisState { index, num_qubits })?;
        state.amplitudes[0] = Complex64::new(0.0, 0.0);
        state.amplitudes[slot] = Complex64::new(1.0, 0.0);
        Ok(state)
    }

    /// Wrap raw amplitudes. The length must be a power of two.
    ///
    /// Normalization is not checked here; see [`QuantumState::check_normalized`].
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> SimResult<Self> {
        let len = amplitudes.len();
        if !len.is_power_of_two() {
            return Err(SimError::InvalidAmplitudeCount(len));
        }
        Ok(Self {
            amplitudes,
            num_qubits: len.trailing_zeros() as usize,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of amplitudes (2^n).
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// All amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Amplitude of basis state `index`, if it exists.
    pub fn amplitude(&self, index: usize) -> Option<Complex64> {
        self.amplitudes.get(index).copied()
    }

    /// Overwrite the amplitude of basis state `index`.
    pub fn set_amplitude(&mut self, index: usize, value: Complex64) -> SimResult<()> {
        let num_qubits = self.num_qubits;
        let slot = self
            .amplitudes
            .get_mut(index)
            .ok_or(SimError::InvalidBasisState {
                index: index as u64,
                num_qubits,
            })?;
        *slot = value;
        Ok(())
    }

    /// Born-rule probability of every basis state.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    /// Sum of squared magnitudes.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Fail unless the total probability is within `tolerance` of 1.
    pub fn check_normalized(&self, tolerance: f64) -> SimResult<()> {
        let norm = self.norm_sqr();
        if (norm - 1.0).abs() > tolerance {
            return Err(SimError::NumericalInvariantViolation {
                norm,
                tolerance,
                context: "on state check".into(),
            });
        }
        Ok(())
    }

    /// Rescale so the total probability is exactly 1 (up to rounding).
    ///
    /// A zero vector is left untouched.
    pub fn renormalize(&mut self) {
        let norm = self.norm_sqr().sqrt();
        if norm > 0.0 {
            for amp in &mut self.amplitudes {
                *amp /= norm;
            }
        }
    }

    /// Apply a gate to the given operands.
    pub fn apply_gate(&mut self, gate: StandardGate, qubits: &[QubitId]) -> SimResult<()> {
        let expected = gate.num_qubits() as usize;
        if qubits.len() != expected {
            return Err(IrError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected: expected as u32,
                got: qubits.len() as u32,
            }
            .into());
        }
        if let Some(&qubit) = qubits.iter().find(|q| q.index() >= self.num_qubits) {
            return Err(IrError::InvalidQubitIndex {
                qubit,
                num_qubits: self.num_qubits as u32,
                gate_name: Some(gate.name().to_string()),
            }
            .into());
        }

        match gate {
            StandardGate::H => self.apply_h(qubits[0].index()),
            StandardGate::X => self.apply_x(qubits[0].index()),
            StandardGate::Y => self.apply_y(qubits[0].index()),
            StandardGate::Z => self.apply_z(qubits[0].index()),
            StandardGate::CX => {
                if qubits[0] == qubits[1] {
                    return Err(IrError::DuplicateQubit {
                        qubit: qubits[0],
                        gate_name: Some(gate.name().to_string()),
                    }
                    .into());
                }
                self.apply_cx(qubits[0].index(), qubits[1].index());
            }
        }
        Ok(())
    }

    // =========================================================================
    // Single-qubit gate implementations
    // =========================================================================

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = FRAC_1_SQRT_2 * (a + b);
                self.amplitudes[j] = FRAC_1_SQRT_2 * (a - b);
            }
        }
    }

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let i_val = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -i_val * self.amplitudes[j];
                self.amplitudes[j] = i_val * tmp;
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    // =========================================================================
    // Two-qubit gate implementations
    // =========================================================================

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                self.amplitudes.swap(i, i | tgt_mask);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = QuantumState::new(2);
        assert_eq!(sv.dimension(), 4);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        for amp in &sv.amplitudes[1..] {
            assert!(approx_eq(*amp, Complex64::new(0.0, 0.0)));
        }
    }

    #[test]
    fn test_hadamard() {
        let mut sv = QuantumState::new(1);
        sv.apply_h(0);

        assert!(approx_eq(sv.amplitudes[0], Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_hadamard_twice_is_identity() {
        let mut sv = QuantumState::new(1);
        sv.apply_h(0);
        sv.apply_h(0);

        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = QuantumState::new(2);
        sv.apply_h(0);
        sv.apply_cx(0, 1);

        assert!(approx_eq(sv.amplitudes[0], Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_x_gate() {
        let mut sv = QuantumState::new(1);
        sv.apply_x(0);

        assert!(approx_eq(sv.amplitudes[0], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_z_gate_negates_one_component() {
        let mut sv = QuantumState::new(1);
        sv.apply_h(0);
        sv.apply_z(0);

        assert!(approx_eq(sv.amplitudes[0], Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(-FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_y_gate() {
        let mut sv = QuantumState::new(1);
        sv.apply_y(0);

        // Y|0⟩ = i|1⟩
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 1.0)));
    }

    #[test]
    fn test_cx_permutes_basis_state() {
        // Qubit 0 set, qubit 1 clear: index 0b01.
        let mut sv = QuantumState::basis_state(2, 0b01).unwrap();
        sv.apply_cx(0, 1);
        assert_eq!(sv.amplitudes[0b11], Complex64::new(1.0, 0.0));
        assert_eq!(sv.norm_sqr(), 1.0);
    }

    #[test]
    fn test_cx_ignores_cleared_control() {
        let mut sv = QuantumState::basis_state(2, 0b10).unwrap();
        sv.apply_cx(0, 1);
        assert_eq!(sv.amplitudes[0b10], Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_apply_gate_validates_operands() {
        let mut sv = QuantumState::new(2);
        assert!(matches!(
            sv.apply_gate(StandardGate::H, &[QubitId(2)]),
            Err(SimError::Ir(IrError::InvalidQubitIndex { .. }))
        ));
        assert!(matches!(
            sv.apply_gate(StandardGate::CX, &[QubitId(0)]),
            Err(SimError::Ir(IrError::QubitCountMismatch { .. }))
        ));
        assert!(matches!(
            sv.apply_gate(StandardGate::CX, &[QubitId(1), QubitId(1)]),
            Err(SimError::Ir(IrError::DuplicateQubit { .. }))
        ));
        // The state is untouched by rejected gates.
        assert_eq!(sv, QuantumState::new(2));
    }

    #[test]
    fn test_basis_state_out_of_range() {
        assert!(matches!(
            QuantumState::basis_state(2, 4),
            Err(SimError::InvalidBasisState { index: 4, .. })
        ));
    }

    #[test]
    fn test_from_amplitudes_requires_power_of_two() {
        let amps = vec![Complex64::new(1.0, 0.0); 3];
        assert!(matches!(
            QuantumState::from_amplitudes(amps),
            Err(SimError::InvalidAmplitudeCount(3))
        ));

        let sv = QuantumState::from_amplitudes(vec![Complex64::new(0.5, 0.0); 4]).unwrap();
        assert_eq!(sv.num_qubits(), 2);
    }

    #[test]
    fn test_renormalize() {
        let mut sv = QuantumState::from_amplitudes(vec![Complex64::new(2.0, 0.0); 2]).unwrap();
        assert!(sv.check_normalized(1e-9).is_err());
        sv.renormalize();
        assert!(sv.check_normalized(1e-9).is_ok());
    }

    #[test]
    fn test_set_amplitude_out_of_range() {
        let mut sv = QuantumState::new(1);
        assert!(sv.set_amplitude(2, Complex64::new(1.0, 0.0)).is_err());
        sv.set_amplitude(1, Complex64::new(0.0, 1.0)).unwrap();
        assert_eq!(sv.amplitude(1), Some(Complex64::new(0.0, 1.0)));
    }
}
