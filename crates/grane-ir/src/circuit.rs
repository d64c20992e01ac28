//! Append-only circuit builder API.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::CliffordGate;
use crate::instruction::Instruction;
use crate::qubit::QubitId;

/// A Clifford circuit.
///
/// Circuits are ordered instruction lists with a fixed qubit count.
/// Instructions can only be appended, never edited in place; this matches
/// how the synthesis core emits gates (timestep by timestep, in order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Instructions in append order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit with the given qubit count.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            instructions: vec![],
        }
    }

    /// The name of the circuit.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Append an instruction, validating its operands.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<()> {
        let gate_name = instruction.gate.name();
        let expected = instruction.gate.num_qubits();
        let got = u32::try_from(instruction.qubits.len()).unwrap_or(u32::MAX);
        if expected != got {
            return Err(IrError::QubitCountMismatch {
                gate_name,
                expected,
                got,
            });
        }
        for (i, &qubit) in instruction.qubits.iter().enumerate() {
            if qubit.0 >= self.num_qubits {
                return Err(IrError::QubitOutOfRange {
                    qubit,
                    num_qubits: self.num_qubits,
                    gate_name,
                });
            }
            if instruction.qubits[..i].contains(&qubit) {
                return Err(IrError::DuplicateQubit { qubit, gate_name });
            }
        }
        self.instructions.push(instruction);
        Ok(())
    }

    // =========================================================================
    // Gate builder methods
    // =========================================================================

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single(CliffordGate::X, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single(CliffordGate::Y, qubit))?;
        Ok(self)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single(CliffordGate::Z, qubit))?;
        Ok(self)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single(CliffordGate::H, qubit))?;
        Ok(self)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single(CliffordGate::S, qubit))?;
        Ok(self)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::single(CliffordGate::Sdg, qubit))?;
        Ok(self)
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.append(Instruction::two_qubit(CliffordGate::Cx, control, target))?;
        Ok(self)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Iterate over instructions in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Total number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if the circuit contains no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Number of non-identity gates.
    pub fn gate_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.gate != CliffordGate::I)
            .count()
    }

    /// Number of non-identity single-qubit gates.
    pub fn single_qubit_gate_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.gate != CliffordGate::I && !i.gate.is_two_qubit())
            .count()
    }

    /// Number of two-qubit gates.
    pub fn two_qubit_gate_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.gate.is_two_qubit())
            .count()
    }

    /// Circuit depth under greedy layering.
    ///
    /// Identity instructions do not contribute to depth.
    pub fn depth(&self) -> usize {
        let mut level = vec![0usize; self.num_qubits as usize];
        for instruction in &self.instructions {
            if instruction.gate == CliffordGate::I {
                continue;
            }
            let layer = 1 + instruction
                .qubits
                .iter()
                .map(|q| level[q.0 as usize])
                .max()
                .unwrap_or(0);
            for q in &instruction.qubits {
                level[q.0 as usize] = layer;
            }
        }
        level.into_iter().max().unwrap_or(0)
    }

    /// The inverse circuit: reversed instruction order, each gate inverted.
    pub fn inverse(&self) -> Self {
        Self {
            name: format!("{}_dg", self.name),
            num_qubits: self.num_qubits,
            instructions: self.instructions.iter().rev().map(Instruction::inverse).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} qubits):", self.name, self.num_qubits)?;
        for instruction in &self.instructions {
            write!(f, "  {}", instruction.gate)?;
            for q in &instruction.qubits {
                write!(f, " {q}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let mut circuit = Circuit::new("test", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        assert_eq!(circuit.len(), 2);
        assert_eq!(circuit.gate_count(), 2);
        assert_eq!(circuit.single_qubit_gate_count(), 1);
        assert_eq!(circuit.two_qubit_gate_count(), 1);
    }

    #[test]
    fn test_append_validation() {
        let mut circuit = Circuit::new("test", 2);
        assert!(matches!(
            circuit.x(QubitId(5)),
            Err(IrError::QubitOutOfRange { .. })
        ));
        assert!(matches!(
            circuit.cx(QubitId(1), QubitId(1)),
            Err(IrError::DuplicateQubit { .. })
        ));
        let bad_arity = Instruction {
            gate: CliffordGate::Cx,
            qubits: vec![QubitId(0)],
        };
        assert!(matches!(
            circuit.append(bad_arity),
            Err(IrError::QubitCountMismatch { .. })
        ));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_depth_layering() {
        let mut circuit = Circuit::new("test", 3);
        circuit.h(QubitId(0)).unwrap();
        circuit.x(QubitId(1)).unwrap();
        // parallel layer: depth still 1
        assert_eq!(circuit.depth(), 1);
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        assert_eq!(circuit.depth(), 2);
        circuit.z(QubitId(2)).unwrap();
        // independent qubit slots into the first layer
        assert_eq!(circuit.depth(), 2);
    }

    #[test]
    fn test_inverse_order_and_gates() {
        let mut circuit = Circuit::new("test", 2);
        circuit.s(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let inv = circuit.inverse();
        assert_eq!(inv.len(), 2);
        assert_eq!(inv.iter().next().unwrap().gate, CliffordGate::Cx);
        assert_eq!(inv.iter().nth(1).unwrap().gate, CliffordGate::Sdg);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut circuit = Circuit::new("test", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
