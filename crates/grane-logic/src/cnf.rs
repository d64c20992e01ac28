//! Tseitin lowering of asserted terms to CNF clauses.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::term::{FALSE, Lit, Term, TermGraph, TermId, TRUE, Var};

/// A disjunction of literals.
pub(crate) type Clause = SmallVec<[Lit; 4]>;

/// Lowers a set of asserted terms to clauses, introducing one auxiliary
/// variable per distinct composite sub-term.
///
/// Top-level conjunctions are flattened into separate assertions and
/// top-level disjunctions of literals become plain clauses, so auxiliary
/// variables are only paid for genuinely nested structure.
pub(crate) struct CnfBuilder<'a> {
    graph: &'a TermGraph,
    lowered: FxHashMap<TermId, Lit>,
    clauses: Vec<Clause>,
    next_var: u32,
    unsat: bool,
}

impl<'a> CnfBuilder<'a> {
    pub fn new(graph: &'a TermGraph) -> Self {
        Self {
            graph,
            lowered: FxHashMap::default(),
            clauses: Vec::new(),
            next_var: graph.num_vars(),
            unsat: false,
        }
    }

    /// Total variable count including auxiliaries.
    pub fn num_vars(&self) -> u32 {
        self.next_var
    }

    pub fn into_clauses(self) -> Option<Vec<Clause>> {
        if self.unsat { None } else { Some(self.clauses) }
    }

    fn fresh(&mut self) -> Var {
        let v = Var(self.next_var);
        self.next_var += 1;
        v
    }

    /// Assert `term` at the top level.
    pub fn assert_term(&mut self, term: TermId) {
        if term == TRUE {
            return;
        }
        if term == FALSE {
            self.unsat = true;
            return;
        }
        match self.graph.node(term) {
            Term::And(items) => {
                for &item in items.iter() {
                    self.assert_term(item);
                }
            }
            Term::Or(items) => {
                // a flat disjunction of literals needs no auxiliary
                let items = items.clone();
                let mut clause = Clause::new();
                for &item in items.iter() {
                    clause.push(self.lower(item));
                }
                self.clauses.push(clause);
            }
            _ => {
                let lit = self.lower(term);
                self.clauses.push(Clause::from_slice(&[lit]));
            }
        }
    }

    /// Produce a literal equisatisfiably representing `term`.
    fn lower(&mut self, term: TermId) -> Lit {
        if let Some(&lit) = self.lowered.get(&term) {
            return lit;
        }
        let lit = match self.graph.node(term).clone() {
            Term::True => {
                let v = self.fresh();
                self.clauses.push(Clause::from_slice(&[Lit::pos(v)]));
                Lit::pos(v)
            }
            Term::False => {
                let v = self.fresh();
                self.clauses.push(Clause::from_slice(&[Lit::neg(v)]));
                Lit::pos(v)
            }
            Term::Var(v) => Lit::pos(v),
            Term::Not(inner) => self.lower(inner).negate(),
            Term::And(items) => {
                let lits: Vec<Lit> = items.iter().map(|&t| self.lower(t)).collect();
                let a = Lit::pos(self.fresh());
                let mut big = Clause::from_slice(&[a]);
                for &l in &lits {
                    self.clauses.push(Clause::from_slice(&[a.negate(), l]));
                    big.push(l.negate());
                }
                self.clauses.push(big);
                a
            }
            Term::Or(items) => {
                let lits: Vec<Lit> = items.iter().map(|&t| self.lower(t)).collect();
                let a = Lit::pos(self.fresh());
                let mut big = Clause::from_slice(&[a.negate()]);
                for &l in &lits {
                    self.clauses.push(Clause::from_slice(&[a, l.negate()]));
                    big.push(l);
                }
                self.clauses.push(big);
                a
            }
            Term::Xor(x, y) => {
                let lx = self.lower(x);
                let ly = self.lower(y);
                let a = Lit::pos(self.fresh());
                self.clauses.push(Clause::from_slice(&[a.negate(), lx, ly]));
                self.clauses
                    .push(Clause::from_slice(&[a.negate(), lx.negate(), ly.negate()]));
                self.clauses.push(Clause::from_slice(&[a, lx.negate(), ly]));
                self.clauses.push(Clause::from_slice(&[a, lx, ly.negate()]));
                a
            }
            Term::Iff(x, y) => {
                let lx = self.lower(x);
                let ly = self.lower(y);
                let a = Lit::pos(self.fresh());
                self.clauses
                    .push(Clause::from_slice(&[a.negate(), lx.negate(), ly]));
                self.clauses.push(Clause::from_slice(&[a.negate(), lx, ly.negate()]));
                self.clauses.push(Clause::from_slice(&[a, lx, ly]));
                self.clauses
                    .push(Clause::from_slice(&[a, lx.negate(), ly.negate()]));
                a
            }
        };
        self.lowered.insert(term, lit);
        lit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_disjunction_needs_no_auxiliary() {
        let mut g = TermGraph::new();
        let a = g.mk_var();
        let b = g.mk_var();
        let or = g.mk_or(&[a, b]);
        let mut builder = CnfBuilder::new(&g);
        builder.assert_term(or);
        assert_eq!(builder.num_vars(), g.num_vars());
        let clauses = builder.into_clauses().unwrap();
        assert_eq!(clauses.len(), 1);
        assert_eq!(clauses[0].len(), 2);
    }

    #[test]
    fn test_top_level_conjunction_flattens() {
        let mut g = TermGraph::new();
        let a = g.mk_var();
        let b = g.mk_var();
        let and = g.mk_and(&[a, b]);
        let mut builder = CnfBuilder::new(&g);
        builder.assert_term(and);
        let clauses = builder.into_clauses().unwrap();
        // two unit clauses, no auxiliary clauses
        assert_eq!(clauses.len(), 2);
        assert!(clauses.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_asserting_false_is_unsat() {
        let g = TermGraph::new();
        let mut builder = CnfBuilder::new(&g);
        builder.assert_term(FALSE);
        assert!(builder.into_clauses().is_none());
    }
}
