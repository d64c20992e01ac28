//! Boolean encodings of bounded-depth Clifford synthesis.
//!
//! The encoding splits into two halves. [`tableau`] owns the per-timestep
//! tableau state variables and knows the algebra of each gate's action on
//! them. [`gates`] owns the gate-selection decision variables and the
//! legality, symmetry-breaking, and extraction logic built over them; it
//! treats the tableau half as an opaque "assert the transition for this
//! timestep" collaborator.

pub mod gates;
mod symmetry;
pub mod tableau;

pub use gates::{gate_index, GateEncoder, GateVariables, TwoQubitRole, SINGLE_QUBIT_GATES};
pub use tableau::TableauEncoder;
