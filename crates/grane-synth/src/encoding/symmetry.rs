//! Symmetry-breaking cuts over the gate-selection variables.
//!
//! Both families are prune-only: they are layered on top of the legality
//! constraints and forbid redundant members of solution equivalence
//! classes, never all of them. Any solution maps to an equally-good
//! canonical one by a terminating rewrite (cancel an adjacent reducible
//! pair, shift a movable gate one step earlier, or swap a descending
//! disjoint pair), and the canonical form satisfies every cut.

use grane_logic::{Context, TermId};

use grane_ir::CliffordGate;

use crate::encoding::gates::{GateEncoder, SINGLE_QUBIT_GATES};
use crate::synthesizer::TargetMetric;

/// Adjacent same-qubit pairs whose product is again a single registered
/// gate (or the identity). Pauli pairs and {S, Sdg, Z} pairs are closed
/// under composition up to global phase; H cancels only itself.
fn reducible_pair(first: CliffordGate, second: CliffordGate) -> bool {
    let phase_family =
        |g: CliffordGate| matches!(g, CliffordGate::Z | CliffordGate::S | CliffordGate::Sdg);
    (first.is_pauli() && second.is_pauli())
        || (phase_family(first) && phase_family(second))
        || (first == CliffordGate::H && second == CliffordGate::H)
}

impl GateEncoder {
    /// Assert the order and cancellation cuts for every adjacent timestep
    /// pair. Additive on top of the legality constraints.
    pub fn encode_symmetry_breaking(&self, ctx: &mut Context) {
        for pos in 1..self.timesteps {
            match self.metric {
                TargetMetric::Depth => self.assert_push_left_constraints(ctx, pos),
                TargetMetric::GateCount => self.assert_gap_and_order_constraints(ctx, pos),
            }
            self.assert_two_qubit_order_constraints(ctx, pos);
            self.assert_cancellation_constraints(ctx, pos);
        }
    }

    /// Some non-identity single-qubit kind is selected for `(pos, qubit)`.
    fn single_active(&self, ctx: &mut Context, pos: usize, qubit: usize) -> TermId {
        let kinds: Vec<TermId> = (1..SINGLE_QUBIT_GATES.len())
            .map(|kind| self.vars.single(pos, qubit, kind))
            .collect();
        ctx.or(&kinds)
    }

    /// `qubit` performs any operation at `pos` (single-qubit or either
    /// two-qubit role).
    fn active(&self, ctx: &mut Context, pos: usize, qubit: usize) -> TermId {
        use crate::encoding::gates::TwoQubitRole;
        let single = self.single_active(ctx, pos, qubit);
        let controls = self.vars.two_qubit_vars(pos, qubit, TwoQubitRole::Control);
        let targets = self.vars.two_qubit_vars(pos, qubit, TwoQubitRole::Target);
        let as_control = ctx.or(&controls);
        let as_target = ctx.or(&targets);
        ctx.or(&[single, as_control, as_target])
    }

    /// Any operation at all runs at `pos`.
    fn any_active(&self, ctx: &mut Context, pos: usize) -> TermId {
        let per_qubit: Vec<TermId> = (0..self.num_qubits)
            .map(|qubit| self.active(ctx, pos, qubit))
            .collect();
        ctx.or(&per_qubit)
    }

    /// Depth-metric order cuts: a gate whose qubits are all idle in the
    /// previous timestep could run there instead, so forbid the late
    /// placement. A two-qubit gate is also allowed to stay late when the
    /// previous timestep's two-qubit slot is already taken.
    fn assert_push_left_constraints(&self, ctx: &mut Context, pos: usize) {
        for qubit in 0..self.num_qubits {
            let late = self.single_active(ctx, pos, qubit);
            let early = self.active(ctx, pos - 1, qubit);
            let constraint = ctx.implies(late, early);
            ctx.assert_term(constraint);
        }
        let earlier_pairs = self.pair_vars(pos - 1);
        let slot_taken = ctx.or(&earlier_pairs);
        for ctrl in 0..self.num_qubits {
            for trgt in 0..self.num_qubits {
                if ctrl == trgt {
                    continue;
                }
                let selected = self.vars.two_qubit(pos, ctrl, trgt);
                let ctrl_early = self.active(ctx, pos - 1, ctrl);
                let trgt_early = self.active(ctx, pos - 1, trgt);
                let justified = ctx.or(&[ctrl_early, trgt_early, slot_taken]);
                let constraint = ctx.implies(selected, justified);
                ctx.assert_term(constraint);
            }
        }
    }

    /// Gate-count-metric order cuts: no empty timestep before an active
    /// one, and adjacent single-qubit gates on distinct qubits run in
    /// ascending qubit order (they always commute).
    fn assert_gap_and_order_constraints(&self, ctx: &mut Context, pos: usize) {
        let late = self.any_active(ctx, pos);
        let early = self.any_active(ctx, pos - 1);
        let no_gap = ctx.implies(late, early);
        ctx.assert_term(no_gap);

        for high in 0..self.num_qubits {
            for low in 0..high {
                let first = self.single_active(ctx, pos - 1, high);
                let second = self.single_active(ctx, pos, low);
                let descending = ctx.and(&[first, second]);
                let forbidden = ctx.not(descending);
                ctx.assert_term(forbidden);
            }
        }
    }

    /// Adjacent two-qubit gates on disjoint qubit sets commute; keep only
    /// the ascending-control order.
    fn assert_two_qubit_order_constraints(&self, ctx: &mut Context, pos: usize) {
        for ctrl_a in 0..self.num_qubits {
            for trgt_a in 0..self.num_qubits {
                if ctrl_a == trgt_a {
                    continue;
                }
                for ctrl_b in 0..ctrl_a {
                    for trgt_b in 0..self.num_qubits {
                        if ctrl_b == trgt_b
                            || ctrl_b == ctrl_a
                            || ctrl_b == trgt_a
                            || trgt_b == ctrl_a
                            || trgt_b == trgt_a
                        {
                            continue;
                        }
                        let first = self.vars.two_qubit(pos - 1, ctrl_a, trgt_a);
                        let second = self.vars.two_qubit(pos, ctrl_b, trgt_b);
                        let descending = ctx.and(&[first, second]);
                        let forbidden = ctx.not(descending);
                        ctx.assert_term(forbidden);
                    }
                }
            }
        }
    }

    /// Forbid adjacent same-qubit single-qubit pairs that reduce to at
    /// most one gate. Timesteps are adjacent, so no two-qubit interaction
    /// can intervene on the qubit (participants carry identity selection).
    fn assert_cancellation_constraints(&self, ctx: &mut Context, pos: usize) {
        for qubit in 0..self.num_qubits {
            for first in 1..SINGLE_QUBIT_GATES.len() {
                for second in 1..SINGLE_QUBIT_GATES.len() {
                    if !reducible_pair(SINGLE_QUBIT_GATES[first], SINGLE_QUBIT_GATES[second]) {
                        continue;
                    }
                    let a = self.vars.single(pos - 1, qubit, first);
                    let b = self.vars.single(pos, qubit, second);
                    let pair = ctx.and(&[a, b]);
                    let forbidden = ctx.not(pair);
                    ctx.assert_term(forbidden);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reducible_pairs() {
        use CliffordGate::*;
        assert!(reducible_pair(X, X));
        assert!(reducible_pair(X, Y));
        assert!(reducible_pair(Z, Y));
        assert!(reducible_pair(S, Sdg));
        assert!(reducible_pair(S, S));
        assert!(reducible_pair(Z, S));
        assert!(reducible_pair(H, H));
        // not reducible to a single gate
        assert!(!reducible_pair(H, X));
        assert!(!reducible_pair(X, S));
        assert!(!reducible_pair(S, H));
        assert!(!reducible_pair(H, Z));
    }
}
