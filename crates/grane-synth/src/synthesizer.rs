//! Fixed-(N, T) synthesis entry point.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use grane_logic::{Context, SolveResult};

use crate::encoding::{GateEncoder, TableauEncoder};
use crate::error::{SynthError, SynthResult};
use crate::results::Results;
use crate::tableau::Tableau;

/// Which cost metric the encoding is specialized for.
///
/// The variants form a closed strategy set: each supplies its own legality
/// and ordering rules inside the encoder, selected by `match` at
/// construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetMetric {
    /// Depth-oriented shape: every qubit may act in every timestep.
    Depth,
    /// Gate-count-oriented shape: at most one operation per timestep.
    GateCount,
}

/// Encoder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// The strategy variant to encode with.
    pub target: TargetMetric,
    /// Whether to assert the symmetry-breaking cuts. On by default; the
    /// cuts only prune redundant solutions, never change satisfiability.
    pub symmetry_breaking: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: TargetMetric::Depth,
            symmetry_breaking: true,
        }
    }
}

/// Outcome of deciding one fixed-(N, T) instance.
///
/// Unrealizability is a first-class outcome: callers probing increasing
/// depths simply try the next T.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A circuit realizing the target within T timesteps, plus metrics.
    Realizable(Results),
    /// No circuit of at most T timesteps realizes the target.
    Unrealizable,
}

/// Build, decide, and decode one synthesis instance.
///
/// Encodes the transformation from `initial` to `target` over exactly
/// `timesteps` layers, invokes the solver once, and either extracts the
/// witness circuit or reports the instance unrealizable. A `timesteps` of
/// zero is permitted: the instance is then realizable (by the empty
/// circuit) exactly when `initial == target`.
#[instrument(skip_all, fields(n = initial.num_qubits(), t = timesteps))]
pub fn synthesize(
    initial: &Tableau,
    target: &Tableau,
    timesteps: usize,
    config: &Config,
) -> SynthResult<Outcome> {
    if initial.num_qubits() != target.num_qubits() {
        return Err(SynthError::QubitCountMismatch {
            expected: initial.num_qubits(),
            got: target.num_qubits(),
        });
    }
    let num_qubits = initial.num_qubits();

    let mut ctx = Context::new();
    // all decision variables exist before the first assertion; selection
    // variables come first so the solver branches on them and lets the
    // tableau states follow by propagation
    let encoder = GateEncoder::new(&mut ctx, num_qubits, timesteps, config.target);
    let tableau = TableauEncoder::new(&mut ctx, num_qubits, timesteps);

    tableau.assert_initial(&mut ctx, initial);
    tableau.assert_target(&mut ctx, target);
    encoder.encode(&mut ctx, &tableau);
    if config.symmetry_breaking {
        encoder.encode_symmetry_breaking(&mut ctx);
    }
    debug!(
        vars = ctx.num_vars(),
        assertions = ctx.num_assertions(),
        "instance encoded"
    );

    match ctx.solve() {
        SolveResult::Sat(model) => {
            let results = encoder.extract_circuit(&ctx, &model)?;
            info!(gates = results.gates(), depth = results.depth, "realizable");
            Ok(Outcome::Realizable(results))
        }
        SolveResult::Unsat => {
            info!("unrealizable");
            Ok(Outcome::Unrealizable)
        }
    }
}
