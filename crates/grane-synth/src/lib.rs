//! Grane Clifford Synthesis Core
//!
//! Bounded-depth synthesis of Clifford circuits as Boolean satisfiability:
//! given a target stabilizer [`Tableau`] and bounds on qubit count N and
//! circuit depth T, this crate builds a constraint instance whose solutions
//! are correct-by-construction circuits realizing the target, then decodes
//! a satisfying model back into a gate sequence.
//!
//! # Architecture
//!
//! - [`tableau`]: the stabilizer tableau and its gate-application rules
//! - [`encoding`]: Boolean decision variables and the constraint system:
//!   gate-selection legality, tableau consistency, symmetry breaking, and
//!   model extraction
//! - [`synthesizer`]: the fixed-(N, T) entry point tying it together
//!
//! Deciding *which* T to try is the caller's concern: each call to
//! [`synthesize`] builds and decides exactly one instance, and instances
//! share no state, so callers can probe several depths in parallel from
//! separate threads.
//!
//! # Example
//!
//! ```rust
//! use grane_synth::{synthesize, Config, Outcome, Tableau};
//!
//! let initial = Tableau::identity(1);
//! let target: Tableau = "[-Z]".parse().unwrap();
//!
//! // a sign flip on the Z stabilizer takes exactly one bit-flip gate
//! let outcome = synthesize(&initial, &target, 1, &Config::default()).unwrap();
//! match outcome {
//!     Outcome::Realizable(results) => assert_eq!(results.gates(), 1),
//!     Outcome::Unrealizable => unreachable!(),
//! }
//! ```

pub mod encoding;
pub mod error;
pub mod results;
pub mod synthesizer;
pub mod tableau;

pub use error::{SynthError, SynthResult};
pub use results::Results;
pub use synthesizer::{synthesize, Config, Outcome, TargetMetric};
pub use tableau::Tableau;
