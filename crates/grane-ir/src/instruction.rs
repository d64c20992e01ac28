//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::CliffordGate;
use crate::qubit::QubitId;

/// A gate together with the qubits it acts on.
///
/// For two-qubit gates the operand order is significant: the first operand
/// is the control, the second the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// The gate to apply.
    pub gate: CliffordGate,
    /// Operand qubits, control first for two-qubit gates.
    pub qubits: Vec<QubitId>,
}

impl Instruction {
    /// Create a single-qubit gate instruction.
    pub fn single(gate: CliffordGate, qubit: QubitId) -> Self {
        debug_assert_eq!(gate.num_qubits(), 1);
        Self {
            gate,
            qubits: vec![qubit],
        }
    }

    /// Create a two-qubit gate instruction with explicit roles.
    pub fn two_qubit(gate: CliffordGate, control: QubitId, target: QubitId) -> Self {
        debug_assert_eq!(gate.num_qubits(), 2);
        Self {
            gate,
            qubits: vec![control, target],
        }
    }

    /// The control qubit, if this is a two-qubit instruction.
    pub fn control(&self) -> Option<QubitId> {
        (self.qubits.len() == 2).then(|| self.qubits[0])
    }

    /// The target qubit: the acted-on qubit of a single-qubit gate, or the
    /// target role of a two-qubit gate.
    pub fn target(&self) -> QubitId {
        self.qubits[self.qubits.len() - 1]
    }

    /// The inverse instruction (same operands, inverted gate).
    pub fn inverse(&self) -> Self {
        Self {
            gate: self.gate.inverse(),
            qubits: self.qubits.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_qubit_instruction() {
        let instr = Instruction::single(CliffordGate::H, QubitId(1));
        assert_eq!(instr.control(), None);
        assert_eq!(instr.target(), QubitId(1));
    }

    #[test]
    fn test_two_qubit_instruction() {
        let instr = Instruction::two_qubit(CliffordGate::Cx, QubitId(0), QubitId(2));
        assert_eq!(instr.control(), Some(QubitId(0)));
        assert_eq!(instr.target(), QubitId(2));
    }

    #[test]
    fn test_inverse() {
        let instr = Instruction::single(CliffordGate::S, QubitId(0));
        assert_eq!(instr.inverse().gate, CliffordGate::Sdg);
        assert_eq!(instr.inverse().qubits, instr.qubits);
    }
}
