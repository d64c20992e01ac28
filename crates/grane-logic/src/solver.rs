//! DPLL search with two-watched-literal unit propagation.

use crate::cnf::Clause;
use crate::term::Lit;

/// Backtracking record for one decision.
struct Decision {
    /// Trail length at the moment the decision was made.
    trail_mark: usize,
    /// Whether the opposite polarity has already been tried.
    flipped: bool,
}

/// A complete Boolean satisfiability search.
///
/// Plain DPLL: unit propagation over two watched literals per clause,
/// first-unassigned branching with negative polarity first (the synthesis
/// encodings are overwhelmingly one-hot, so most variables are false in
/// any model), and chronological backtracking. Complete for the instance
/// sizes the encoders produce.
pub(crate) struct Solver {
    clauses: Vec<Clause>,
    /// Clause indices watching each literal, indexed by literal code.
    watches: Vec<Vec<u32>>,
    assign: Vec<Option<bool>>,
    trail: Vec<Lit>,
    head: usize,
    decisions: Vec<Decision>,
    /// Unit clauses found during preprocessing.
    pending: Vec<Lit>,
    unsat: bool,
}

impl Solver {
    pub fn new(num_vars: usize, raw_clauses: Vec<Clause>) -> Self {
        let mut solver = Self {
            clauses: Vec::with_capacity(raw_clauses.len()),
            watches: vec![Vec::new(); num_vars * 2],
            assign: vec![None; num_vars],
            trail: Vec::new(),
            head: 0,
            decisions: Vec::new(),
            pending: Vec::new(),
            unsat: false,
        };
        for mut clause in raw_clauses {
            clause.sort_unstable_by_key(|l| l.code());
            clause.dedup();
            if clause.windows(2).any(|w| w[0] == w[1].negate()) {
                continue; // tautology
            }
            match clause.len() {
                0 => solver.unsat = true,
                1 => solver.pending.push(clause[0]),
                _ => {
                    let ci = u32::try_from(solver.clauses.len()).expect("clause count overflow");
                    solver.watches[clause[0].code()].push(ci);
                    solver.watches[clause[1].code()].push(ci);
                    solver.clauses.push(clause);
                }
            }
        }
        solver
    }

    fn lit_value(&self, l: Lit) -> Option<bool> {
        self.assign[l.var().0 as usize].map(|v| v == l.is_positive())
    }

    /// Assign `l` true and push it on the trail. Returns false if `l` is
    /// already false.
    fn enqueue(&mut self, l: Lit) -> bool {
        match self.lit_value(l) {
            Some(true) => true,
            Some(false) => false,
            None => {
                self.assign[l.var().0 as usize] = Some(l.is_positive());
                self.trail.push(l);
                true
            }
        }
    }

    /// Exhaust unit propagation. Returns false on conflict.
    fn propagate(&mut self) -> bool {
        while self.head < self.trail.len() {
            let lit = self.trail[self.head];
            self.head += 1;
            let falsified = lit.negate();
            let mut watch_list = std::mem::take(&mut self.watches[falsified.code()]);
            let mut i = 0;
            let mut conflict = false;
            while i < watch_list.len() {
                let ci = watch_list[i] as usize;
                if self.clauses[ci][0] == falsified {
                    self.clauses[ci].swap(0, 1);
                }
                // invariant: clauses[ci][1] == falsified
                let first = self.clauses[ci][0];
                if self.lit_value(first) == Some(true) {
                    i += 1;
                    continue;
                }
                let replacement = (2..self.clauses[ci].len())
                    .find(|&k| self.lit_value(self.clauses[ci][k]) != Some(false));
                if let Some(k) = replacement {
                    self.clauses[ci].swap(1, k);
                    let new_watch = self.clauses[ci][1];
                    self.watches[new_watch.code()].push(ci as u32);
                    watch_list.swap_remove(i);
                } else if self.enqueue(first) {
                    i += 1;
                } else {
                    conflict = true;
                    break;
                }
            }
            self.watches[falsified.code()] = watch_list;
            if conflict {
                return false;
            }
        }
        true
    }

    /// Undo the most recent decision, flipping it if still untried.
    /// Returns false when the search space is exhausted.
    fn backtrack(&mut self) -> bool {
        while let Some(decision) = self.decisions.pop() {
            let flip = self.trail[decision.trail_mark].negate();
            while self.trail.len() > decision.trail_mark {
                let l = self.trail.pop().expect("trail underflow");
                self.assign[l.var().0 as usize] = None;
            }
            self.head = decision.trail_mark;
            if !decision.flipped {
                self.decisions.push(Decision {
                    trail_mark: self.trail.len(),
                    flipped: true,
                });
                let enqueued = self.enqueue(flip);
                debug_assert!(enqueued);
                return true;
            }
        }
        false
    }

    fn next_unassigned(&self) -> Option<usize> {
        self.assign.iter().position(Option::is_none)
    }

    pub fn solve(mut self) -> Option<Vec<bool>> {
        if self.unsat {
            return None;
        }
        for l in std::mem::take(&mut self.pending) {
            if !self.enqueue(l) {
                return None;
            }
        }
        loop {
            if !self.propagate() {
                if self.decisions.is_empty() || !self.backtrack() {
                    return None;
                }
                continue;
            }
            match self.next_unassigned() {
                None => {
                    return Some(
                        self.assign
                            .iter()
                            .map(|a| a.unwrap_or(false))
                            .collect(),
                    );
                }
                Some(v) => {
                    self.decisions.push(Decision {
                        trail_mark: self.trail.len(),
                        flipped: false,
                    });
                    let lit = Lit::neg(crate::term::Var(
                        u32::try_from(v).expect("variable index overflow"),
                    ));
                    let enqueued = self.enqueue(lit);
                    debug_assert!(enqueued);
                }
            }
        }
    }
}
