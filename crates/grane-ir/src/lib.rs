//! Grane Circuit Intermediate Representation
//!
//! This crate provides the data structures for representing Clifford
//! circuits in Grane. It is the output side of the synthesis stack: the
//! encoder decodes a solver model into an ordered gate sequence, and this
//! crate is the sink that receives it.
//!
//! # Overview
//!
//! Circuits are plain append-only instruction lists. Synthesis emits gates
//! in timestep order and never revisits an already-appended gate, so the IR
//! deliberately offers no random-access mutation.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`] for addressing qubits
//! - **Gates**: [`CliffordGate`] for the supported Clifford gate set
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **Circuit**: [`Circuit`] append-only builder API
//!
//! # Example
//!
//! ```rust
//! use grane_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new("bell_state", 2);
//! circuit.h(QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.gate_count(), 2);
//! assert_eq!(circuit.depth(), 2);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::CliffordGate;
pub use instruction::Instruction;
pub use qubit::QubitId;
