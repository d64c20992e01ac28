//! Gate-selection variables, legality constraints, and model extraction.

use tracing::debug;

use grane_ir::{Circuit, CliffordGate, Instruction, QubitId};
use grane_logic::{Context, Model, TermId};

use crate::encoding::tableau::TableauEncoder;
use crate::error::{SynthError, SynthResult};
use crate::results::Results;
use crate::synthesizer::TargetMetric;

/// The ordered registry of single-qubit gate kinds.
///
/// Index 0 is the identity; variable matrices and kind lookups are indexed
/// by position in this array. Two-qubit gates are not enumerated here: the
/// ordered qubit pair of a two-qubit selection variable encodes the one
/// supported family (CX) together with its control/target roles.
pub const SINGLE_QUBIT_GATES: [CliffordGate; 7] = [
    CliffordGate::I,
    CliffordGate::X,
    CliffordGate::Y,
    CliffordGate::Z,
    CliffordGate::H,
    CliffordGate::S,
    CliffordGate::Sdg,
];

/// Index of `gate` in [`SINGLE_QUBIT_GATES`].
///
/// Total: a kind that is not registered resolves to the identity's index
/// rather than failing.
pub fn gate_index(gate: CliffordGate) -> usize {
    SINGLE_QUBIT_GATES
        .iter()
        .position(|&g| g == gate)
        .unwrap_or(0)
}

/// Which role a qubit plays in a two-qubit gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoQubitRole {
    /// The control qubit.
    Control,
    /// The target qubit.
    Target,
}

/// The dense gate-selection variable matrices.
///
/// `gS[pos][qubit][kind]` is true iff `qubit` is assigned kind `kind` at
/// timestep `pos`; `gC[pos][ctrl][trgt]` is true iff a CX with those roles
/// runs at `pos`. Both are flat arenas with computed offsets, created once
/// before any constraint is asserted; no slot exists for `ctrl == trgt`.
pub struct GateVariables {
    num_qubits: usize,
    timesteps: usize,
    g_s: Vec<TermId>,
    g_c: Vec<TermId>,
}

impl GateVariables {
    fn allocate(ctx: &mut Context, num_qubits: usize, timesteps: usize) -> Self {
        let kinds = SINGLE_QUBIT_GATES.len();
        let singles = timesteps * num_qubits * kinds;
        let pairs = timesteps * num_qubits * num_qubits.saturating_sub(1);
        Self {
            num_qubits,
            timesteps,
            g_s: (0..singles).map(|_| ctx.var()).collect(),
            g_c: (0..pairs).map(|_| ctx.var()).collect(),
        }
    }

    /// Number of encoded timesteps.
    pub fn timesteps(&self) -> usize {
        self.timesteps
    }

    /// The selection variable for kind index `kind` on `qubit` at `pos`.
    pub fn single(&self, pos: usize, qubit: usize, kind: usize) -> TermId {
        let kinds = SINGLE_QUBIT_GATES.len();
        self.g_s[(pos * self.num_qubits + qubit) * kinds + kind]
    }

    /// The selection variable for a CX with the given roles at `pos`.
    ///
    /// There is no variable for `ctrl == trgt`; callers iterate ordered
    /// pairs of distinct qubits.
    pub fn two_qubit(&self, pos: usize, ctrl: usize, trgt: usize) -> TermId {
        debug_assert_ne!(ctrl, trgt);
        let stride = self.num_qubits - 1;
        let column = if trgt > ctrl { trgt - 1 } else { trgt };
        self.g_c[(pos * self.num_qubits + ctrl) * stride + column]
    }

    /// All single-qubit kind variables of `(pos, qubit)`, in registry order.
    pub fn single_qubit_vars(&self, pos: usize, qubit: usize) -> Vec<TermId> {
        (0..SINGLE_QUBIT_GATES.len())
            .map(|kind| self.single(pos, qubit, kind))
            .collect()
    }

    /// All two-qubit variables of `(pos, qubit)` where `qubit` plays `role`.
    pub fn two_qubit_vars(&self, pos: usize, qubit: usize, role: TwoQubitRole) -> Vec<TermId> {
        (0..self.num_qubits)
            .filter(|&other| other != qubit)
            .map(|other| match role {
                TwoQubitRole::Control => self.two_qubit(pos, qubit, other),
                TwoQubitRole::Target => self.two_qubit(pos, other, qubit),
            })
            .collect()
    }
}

/// Builds the gate-selection side of the encoding and decodes models.
///
/// The strategy variant chosen at construction decides the legality and
/// ordering rules; dispatch is a closed `match` over [`TargetMetric`].
pub struct GateEncoder {
    pub(crate) num_qubits: usize,
    pub(crate) timesteps: usize,
    pub(crate) metric: TargetMetric,
    pub(crate) vars: GateVariables,
}

impl GateEncoder {
    /// Allocate all decision variables for an (N, T) instance.
    pub fn new(
        ctx: &mut Context,
        num_qubits: usize,
        timesteps: usize,
        metric: TargetMetric,
    ) -> Self {
        Self {
            num_qubits,
            timesteps,
            metric,
            vars: GateVariables::allocate(ctx, num_qubits, timesteps),
        }
    }

    /// The variable matrices (read-only handles).
    pub fn variables(&self) -> &GateVariables {
        &self.vars
    }

    /// Assert tableau consistency, then gate legality, for every timestep.
    pub fn encode(&self, ctx: &mut Context, tableau: &TableauEncoder) {
        self.assert_consistency(ctx, tableau);
        self.assert_gate_constraints(ctx);
    }

    /// Hand each timestep's collected selection variables to the tableau
    /// encoder, which asserts the algebraic transition.
    fn assert_consistency(&self, ctx: &mut Context, tableau: &TableauEncoder) {
        for pos in 0..self.timesteps {
            tableau.assert_transition(ctx, pos, &self.vars);
        }
        debug!(timesteps = self.timesteps, "tableau consistency asserted");
    }

    /// Per-(pos, qubit) exactly-one over the kind variables, at most one
    /// two-qubit gate per timestep, and identity selection for two-qubit
    /// participants. The gate-count variant additionally caps each
    /// timestep at one operation overall.
    fn assert_gate_constraints(&self, ctx: &mut Context) {
        for pos in 0..self.timesteps {
            for qubit in 0..self.num_qubits {
                let kinds = self.vars.single_qubit_vars(pos, qubit);
                let one = ctx.exactly_one(&kinds);
                ctx.assert_term(one);
            }

            let pairs = self.pair_vars(pos);
            let amo = ctx.at_most_one(&pairs);
            ctx.assert_term(amo);

            for ctrl in 0..self.num_qubits {
                for trgt in 0..self.num_qubits {
                    if ctrl == trgt {
                        continue;
                    }
                    let selected = self.vars.two_qubit(pos, ctrl, trgt);
                    let ctrl_idle = self.vars.single(pos, ctrl, 0);
                    let trgt_idle = self.vars.single(pos, trgt, 0);
                    let both_idle = ctx.and(&[ctrl_idle, trgt_idle]);
                    let constraint = ctx.implies(selected, both_idle);
                    ctx.assert_term(constraint);
                }
            }

            if self.metric == TargetMetric::GateCount {
                let mut operations = self.nontrivial_single_vars(pos);
                operations.extend(self.pair_vars(pos));
                let amo = ctx.at_most_one(&operations);
                ctx.assert_term(amo);
            }
        }
        debug!(metric = ?self.metric, "gate legality asserted");
    }

    /// All two-qubit selection variables of a timestep.
    pub(crate) fn pair_vars(&self, pos: usize) -> Vec<TermId> {
        let mut pairs = Vec::with_capacity(self.num_qubits * self.num_qubits.saturating_sub(1));
        for ctrl in 0..self.num_qubits {
            for trgt in 0..self.num_qubits {
                if ctrl != trgt {
                    pairs.push(self.vars.two_qubit(pos, ctrl, trgt));
                }
            }
        }
        pairs
    }

    /// All non-identity single-qubit selection variables of a timestep.
    pub(crate) fn nontrivial_single_vars(&self, pos: usize) -> Vec<TermId> {
        let mut vars = Vec::with_capacity(self.num_qubits * (SINGLE_QUBIT_GATES.len() - 1));
        for qubit in 0..self.num_qubits {
            for kind in 1..SINGLE_QUBIT_GATES.len() {
                vars.push(self.vars.single(pos, qubit, kind));
            }
        }
        vars
    }

    // =========================================================================
    // Model extraction
    // =========================================================================

    /// Decode a satisfying model into a circuit, walking timesteps in
    /// order. Aborts with an error if the model violates the legality
    /// invariants; a partial circuit is never returned.
    pub fn extract_circuit(&self, ctx: &Context, model: &Model) -> SynthResult<Results> {
        let mut circuit = Circuit::new("synthesized", self.num_qubits as u32);
        let mut single_qubit_gates = 0;
        let mut two_qubit_gates = 0;
        for pos in 0..self.timesteps {
            self.extract_single_qubit_gates(ctx, model, pos, &mut circuit, &mut single_qubit_gates)?;
            self.extract_two_qubit_gate(ctx, model, pos, &mut circuit, &mut two_qubit_gates)?;
        }
        let depth = circuit.depth();
        debug!(
            gates = single_qubit_gates + two_qubit_gates,
            depth, "circuit extracted"
        );
        Ok(Results {
            circuit,
            single_qubit_gates,
            two_qubit_gates,
            depth,
        })
    }

    fn extract_single_qubit_gates(
        &self,
        ctx: &Context,
        model: &Model,
        pos: usize,
        circuit: &mut Circuit,
        count: &mut usize,
    ) -> SynthResult<()> {
        for qubit in 0..self.num_qubits {
            let gate = self.selected_single_qubit_gate(ctx, model, pos, qubit)?;
            if gate != CliffordGate::I {
                circuit.append(Instruction::single(gate, QubitId::from(qubit)))?;
                *count += 1;
            }
        }
        Ok(())
    }

    /// The unique kind selected for `(pos, qubit)` in the model.
    fn selected_single_qubit_gate(
        &self,
        ctx: &Context,
        model: &Model,
        pos: usize,
        qubit: usize,
    ) -> SynthResult<CliffordGate> {
        let mut selected = None;
        for (kind, &gate) in SINGLE_QUBIT_GATES.iter().enumerate() {
            if model.value(ctx, self.vars.single(pos, qubit, kind))
                && selected.replace(gate).is_some()
            {
                return Err(SynthError::InconsistentModel {
                    pos,
                    qubit: qubit as u32,
                });
            }
        }
        selected.ok_or(SynthError::InconsistentModel {
            pos,
            qubit: qubit as u32,
        })
    }

    fn extract_two_qubit_gate(
        &self,
        ctx: &Context,
        model: &Model,
        pos: usize,
        circuit: &mut Circuit,
        count: &mut usize,
    ) -> SynthResult<()> {
        match self.selected_two_qubit_gate(ctx, model, pos)? {
            Some((ctrl, trgt)) => {
                circuit.append(Instruction::two_qubit(
                    CliffordGate::Cx,
                    QubitId::from(ctrl),
                    QubitId::from(trgt),
                ))?;
                *count += 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// The at-most-one pair selected at `pos` in the model.
    fn selected_two_qubit_gate(
        &self,
        ctx: &Context,
        model: &Model,
        pos: usize,
    ) -> SynthResult<Option<(usize, usize)>> {
        let mut selected = None;
        for ctrl in 0..self.num_qubits {
            for trgt in 0..self.num_qubits {
                if ctrl == trgt {
                    continue;
                }
                if model.value(ctx, self.vars.two_qubit(pos, ctrl, trgt))
                    && selected.replace((ctrl, trgt)).is_some()
                {
                    return Err(SynthError::ConflictingTwoQubitGates { pos });
                }
            }
        }
        Ok(selected)
    }
}
