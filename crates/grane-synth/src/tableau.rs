//! Stabilizer tableau representation and gate-application rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use grane_ir::{Circuit, CliffordGate, Instruction};

use crate::error::{SynthError, SynthResult};

/// One stabilizer generator: a signed Pauli string in binary form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StabilizerRow {
    pub(crate) x: Vec<bool>,
    pub(crate) z: Vec<bool>,
    pub(crate) sign: bool,
}

impl StabilizerRow {
    fn identity(num_qubits: usize, qubit: usize) -> Self {
        let mut z = vec![false; num_qubits];
        z[qubit] = true;
        Self {
            x: vec![false; num_qubits],
            z,
            sign: false,
        }
    }
}

/// An N-qubit stabilizer tableau: N stabilizer generators, each a signed
/// Pauli string over N qubits.
///
/// The tableau evolves under Clifford gates by conjugation; two circuits
/// are interchangeable for synthesis purposes exactly when they produce the
/// same tableau from the same starting point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tableau {
    num_qubits: usize,
    rows: Vec<StabilizerRow>,
}

impl Tableau {
    /// The identity tableau: row i stabilized by Z_i.
    pub fn identity(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            rows: (0..num_qubits)
                .map(|q| StabilizerRow::identity(num_qubits, q))
                .collect(),
        }
    }

    /// Number of qubits (and stabilizer rows).
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// X component of row `row` at qubit column `qubit`.
    pub fn x(&self, row: usize, qubit: usize) -> bool {
        self.rows[row].x[qubit]
    }

    /// Z component of row `row` at qubit column `qubit`.
    pub fn z(&self, row: usize, qubit: usize) -> bool {
        self.rows[row].z[qubit]
    }

    /// Sign of row `row` (true means negative).
    pub fn sign(&self, row: usize) -> bool {
        self.rows[row].sign
    }

    pub(crate) fn set_x(&mut self, row: usize, qubit: usize, value: bool) {
        self.rows[row].x[qubit] = value;
    }

    pub(crate) fn set_z(&mut self, row: usize, qubit: usize, value: bool) {
        self.rows[row].z[qubit] = value;
    }

    pub(crate) fn set_sign(&mut self, row: usize, value: bool) {
        self.rows[row].sign = value;
    }

    /// Apply one gate, conjugating every stabilizer row.
    pub fn apply(&mut self, instruction: &Instruction) {
        match instruction.gate {
            CliffordGate::I => {}
            CliffordGate::X => {
                let q = instruction.target().0 as usize;
                for row in &mut self.rows {
                    row.sign ^= row.z[q];
                }
            }
            CliffordGate::Y => {
                let q = instruction.target().0 as usize;
                for row in &mut self.rows {
                    row.sign ^= row.x[q] ^ row.z[q];
                }
            }
            CliffordGate::Z => {
                let q = instruction.target().0 as usize;
                for row in &mut self.rows {
                    row.sign ^= row.x[q];
                }
            }
            CliffordGate::H => {
                let q = instruction.target().0 as usize;
                for row in &mut self.rows {
                    row.sign ^= row.x[q] & row.z[q];
                    let x = row.x[q];
                    row.x[q] = row.z[q];
                    row.z[q] = x;
                }
            }
            CliffordGate::S => {
                let q = instruction.target().0 as usize;
                for row in &mut self.rows {
                    row.sign ^= row.x[q] & row.z[q];
                    row.z[q] ^= row.x[q];
                }
            }
            CliffordGate::Sdg => {
                let q = instruction.target().0 as usize;
                for row in &mut self.rows {
                    row.sign ^= row.x[q] & !row.z[q];
                    row.z[q] ^= row.x[q];
                }
            }
            CliffordGate::Cx => {
                let c = instruction.control().map_or(0, |q| q.0 as usize);
                let t = instruction.target().0 as usize;
                for row in &mut self.rows {
                    row.sign ^= row.x[c] & row.z[t] & !(row.x[t] ^ row.z[c]);
                    row.x[t] ^= row.x[c];
                    row.z[c] ^= row.z[t];
                }
            }
        }
    }

    /// The tableau a circuit produces when run from the identity tableau.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        let mut tableau = Self::identity(circuit.num_qubits() as usize);
        for instruction in circuit {
            tableau.apply(instruction);
        }
        tableau
    }

    /// Build a tableau from textual stabilizer descriptions.
    ///
    /// Each description is an optional `+`/`-` sign followed by one letter
    /// from `IXYZ` per qubit, e.g. `"-ZX"`. The number of rows must equal
    /// the string length of each row.
    pub fn from_stabilizers<S: AsRef<str>>(descriptions: &[S]) -> SynthResult<Self> {
        let rows: Vec<StabilizerRow> = descriptions
            .iter()
            .map(|d| parse_row(d.as_ref()))
            .collect::<SynthResult<_>>()?;
        let Some(first) = rows.first() else {
            return Err(SynthError::InvalidStabilizer(
                "empty stabilizer list".into(),
            ));
        };
        let num_qubits = first.x.len();
        if rows.len() != num_qubits || rows.iter().any(|r| r.x.len() != num_qubits) {
            return Err(SynthError::InvalidStabilizer(format!(
                "expected {num_qubits} rows of {num_qubits} qubits"
            )));
        }
        Ok(Self { num_qubits, rows })
    }
}

fn parse_row(description: &str) -> SynthResult<StabilizerRow> {
    let trimmed = description.trim();
    let (sign, paulis) = match trimmed.strip_prefix(['+', '-']) {
        Some(rest) => (trimmed.starts_with('-'), rest),
        None => (false, trimmed),
    };
    let mut x = Vec::with_capacity(paulis.len());
    let mut z = Vec::with_capacity(paulis.len());
    for c in paulis.chars() {
        let (xc, zc) = match c.to_ascii_uppercase() {
            'I' => (false, false),
            'X' => (true, false),
            'Y' => (true, true),
            'Z' => (false, true),
            other => {
                return Err(SynthError::InvalidStabilizer(format!(
                    "unexpected character '{other}' in \"{description}\""
                )));
            }
        };
        x.push(xc);
        z.push(zc);
    }
    if x.is_empty() {
        return Err(SynthError::InvalidStabilizer(format!(
            "empty stabilizer row in \"{description}\""
        )));
    }
    Ok(StabilizerRow { x, z, sign })
}

impl FromStr for Tableau {
    type Err = SynthError;

    /// Parse a bracketed, comma- or semicolon-separated stabilizer list,
    /// e.g. `"[XX, ZZ]"` or `"-Z"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .trim_start_matches('[')
            .trim_end_matches(']');
        let rows: Vec<&str> = inner
            .split([',', ';'])
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect();
        Self::from_stabilizers(&rows)
    }
}

impl fmt::Display for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", if row.sign { '-' } else { '+' })?;
            for q in 0..self.num_qubits {
                let c = match (row.x[q], row.z[q]) {
                    (false, false) => 'I',
                    (true, false) => 'X',
                    (true, true) => 'Y',
                    (false, true) => 'Z',
                };
                write!(f, "{c}")?;
            }
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grane_ir::QubitId;

    #[test]
    fn test_identity_tableau() {
        let tableau = Tableau::identity(2);
        assert_eq!(format!("{tableau}"), "[+ZI, +IZ]");
    }

    #[test]
    fn test_parse_and_display_round_trip() {
        let tableau: Tableau = "[+XZ, -ZX]".parse().unwrap();
        assert_eq!(format!("{tableau}"), "[+XZ, -ZX]");
        let unsigned: Tableau = "XX;ZZ".parse().unwrap();
        assert_eq!(format!("{unsigned}"), "[+XX, +ZZ]");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("[XQ, ZZ]".parse::<Tableau>().is_err());
        assert!("[]".parse::<Tableau>().is_err());
        // row count must match qubit count
        assert!("[XX]".parse::<Tableau>().is_err());
    }

    #[test]
    fn test_single_qubit_rules() {
        let mut tableau = Tableau::identity(1);
        tableau.apply(&Instruction::single(CliffordGate::X, QubitId(0)));
        assert_eq!(format!("{tableau}"), "[-Z]");

        let mut tableau = Tableau::identity(1);
        tableau.apply(&Instruction::single(CliffordGate::H, QubitId(0)));
        assert_eq!(format!("{tableau}"), "[+X]");

        // S acts on an X stabilizer as X -> Y
        let mut tableau: Tableau = "[X]".parse().unwrap();
        tableau.apply(&Instruction::single(CliffordGate::S, QubitId(0)));
        assert_eq!(format!("{tableau}"), "[+Y]");

        // Sdg acts on an X stabilizer as X -> -Y
        let mut tableau: Tableau = "[X]".parse().unwrap();
        tableau.apply(&Instruction::single(CliffordGate::Sdg, QubitId(0)));
        assert_eq!(format!("{tableau}"), "[-Y]");
    }

    #[test]
    fn test_bell_state_tableau() {
        let mut circuit = Circuit::new("bell", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        let tableau = Tableau::from_circuit(&circuit);
        assert_eq!(format!("{tableau}"), "[+XX, +ZZ]");
    }

    #[test]
    fn test_circuit_inverse_restores_identity() {
        let mut circuit = Circuit::new("test", 2);
        circuit.s(QubitId(1)).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(1), QubitId(0)).unwrap();
        circuit.y(QubitId(0)).unwrap();

        let mut tableau = Tableau::from_circuit(&circuit);
        for instruction in circuit.inverse().iter() {
            tableau.apply(instruction);
        }
        assert_eq!(tableau, Tableau::identity(2));
    }

    #[test]
    fn test_serde_round_trip() {
        let tableau: Tableau = "[+XX, -ZZ]".parse().unwrap();
        let json = serde_json::to_string(&tableau).unwrap();
        let back: Tableau = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tableau);
    }
}
