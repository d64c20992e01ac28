//! Clifford gate types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The supported Clifford gates.
///
/// The single-qubit kinds plus the one supported two-qubit entangling
/// family ([`CliffordGate::Cx`]). The identity is an explicit member so
/// that "no operation" is representable as a gate choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CliffordGate {
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// Controlled-X (CNOT) gate.
    Cx,
}

impl CliffordGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            CliffordGate::I => "id",
            CliffordGate::X => "x",
            CliffordGate::Y => "y",
            CliffordGate::Z => "z",
            CliffordGate::H => "h",
            CliffordGate::S => "s",
            CliffordGate::Sdg => "sdg",
            CliffordGate::Cx => "cx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            CliffordGate::Cx => 2,
            _ => 1,
        }
    }

    /// Check if this is a two-qubit gate.
    #[inline]
    pub fn is_two_qubit(&self) -> bool {
        self.num_qubits() == 2
    }

    /// Check if this is a (non-identity) Pauli gate.
    #[inline]
    pub fn is_pauli(&self) -> bool {
        matches!(self, CliffordGate::X | CliffordGate::Y | CliffordGate::Z)
    }

    /// Get the inverse of this gate.
    ///
    /// All supported gates are self-inverse except S and S-dagger, which
    /// invert each other.
    #[inline]
    pub fn inverse(&self) -> Self {
        match self {
            CliffordGate::S => CliffordGate::Sdg,
            CliffordGate::Sdg => CliffordGate::S,
            _ => *self,
        }
    }
}

impl fmt::Display for CliffordGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_properties() {
        assert_eq!(CliffordGate::H.num_qubits(), 1);
        assert_eq!(CliffordGate::Cx.num_qubits(), 2);
        assert!(CliffordGate::Cx.is_two_qubit());
        assert!(!CliffordGate::S.is_two_qubit());

        assert!(CliffordGate::X.is_pauli());
        assert!(CliffordGate::Z.is_pauli());
        assert!(!CliffordGate::I.is_pauli());
        assert!(!CliffordGate::H.is_pauli());
    }

    #[test]
    fn test_gate_inverse() {
        assert_eq!(CliffordGate::S.inverse(), CliffordGate::Sdg);
        assert_eq!(CliffordGate::Sdg.inverse(), CliffordGate::S);
        assert_eq!(CliffordGate::H.inverse(), CliffordGate::H);
        assert_eq!(CliffordGate::X.inverse(), CliffordGate::X);
        assert_eq!(CliffordGate::Cx.inverse(), CliffordGate::Cx);
    }

    #[test]
    fn test_gate_names() {
        assert_eq!(CliffordGate::Sdg.name(), "sdg");
        assert_eq!(format!("{}", CliffordGate::Cx), "cx");
    }
}
