//! Error types for the synthesis crate.

use grane_ir::IrError;
use thiserror::Error;

/// Errors that can occur during synthesis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    /// Initial and target tableaus disagree on qubit count.
    #[error("Initial tableau has {expected} qubits but target has {got}")]
    QubitCountMismatch {
        /// Qubit count of the initial tableau.
        expected: usize,
        /// Qubit count of the target tableau.
        got: usize,
    },

    /// A stabilizer description could not be parsed.
    #[error("Invalid stabilizer description: {0}")]
    InvalidStabilizer(String),

    /// A satisfying model violates the gate-selection invariants.
    ///
    /// The legality constraints guarantee a unique selection per qubit and
    /// timestep; a model without one means the asserted constraint set was
    /// unsound, so extraction aborts rather than emit a partial circuit.
    #[error("Qubit {qubit} at timestep {pos} has no unique gate selection")]
    InconsistentModel {
        /// The timestep.
        pos: usize,
        /// The qubit without a unique selection.
        qubit: u32,
    },

    /// A satisfying model selects more than one two-qubit gate in a step.
    #[error("More than one two-qubit gate selected at timestep {pos}")]
    ConflictingTwoQubitGates {
        /// The timestep.
        pos: usize,
    },

    /// An IR operation failed while building the output circuit.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;
