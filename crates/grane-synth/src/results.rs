//! Synthesis quality metrics and the extracted circuit.

use serde::{Deserialize, Serialize};
use std::fmt;

use grane_ir::Circuit;

/// The outcome of a successful extraction: the synthesized circuit plus
/// the quality metrics callers compare candidate solutions by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Results {
    /// The synthesized circuit, gates in timestep order.
    pub circuit: Circuit,
    /// Number of emitted single-qubit gates.
    pub single_qubit_gates: usize,
    /// Number of emitted two-qubit gates.
    pub two_qubit_gates: usize,
    /// Depth of the synthesized circuit under greedy layering.
    pub depth: usize,
}

impl Results {
    /// Total number of emitted gates.
    pub fn gates(&self) -> usize {
        self.single_qubit_gates + self.two_qubit_gates
    }
}

impl fmt::Display for Results {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gates: {} ({} single-qubit, {} two-qubit), depth: {}",
            self.gates(),
            self.single_qubit_gates,
            self.two_qubit_gates,
            self.depth
        )
    }
}
