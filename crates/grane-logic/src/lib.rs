//! Grane Boolean Constraint Engine
//!
//! The solving backend of the synthesis stack. Encoders talk to this crate
//! through four operations and nothing else: Boolean variable creation,
//! logical connective construction, an assertion sink, and a solve call
//! that yields either a satisfying [`Model`] or [`SolveResult::Unsat`].
//!
//! Internally, asserted formulas live in a hash-consed term graph, are
//! lowered to CNF via the Tseitin transformation, and are decided by a
//! DPLL search with two-watched-literal unit propagation.
//!
//! Unsatisfiability is a first-class outcome, not an error: callers that
//! probe a family of instances (say, increasing circuit depths) simply
//! match on the result.
//!
//! # Example
//!
//! ```rust
//! use grane_logic::{Context, SolveResult};
//!
//! let mut ctx = Context::new();
//! let a = ctx.var();
//! let b = ctx.var();
//! let one_of = ctx.exactly_one(&[a, b]);
//! ctx.assert_term(one_of);
//! ctx.assert_term(a);
//!
//! match ctx.solve() {
//!     SolveResult::Sat(model) => {
//!         assert!(model.value(&ctx, a));
//!         assert!(!model.value(&ctx, b));
//!     }
//!     SolveResult::Unsat => unreachable!(),
//! }
//! ```

mod cnf;
pub mod context;
mod solver;
pub mod term;

pub use context::{Context, Model, SolveResult};
pub use term::{Lit, TermId, Var};
