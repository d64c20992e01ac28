//! The solving context: term construction, assertion sink, solve.

use rustc_hash::FxHashMap;

use crate::cnf::CnfBuilder;
use crate::solver::Solver;
use crate::term::{FALSE, Term, TermGraph, TermId, TRUE};

/// A Boolean constraint context.
///
/// Owns the term graph and the set of asserted formulas. Variables and
/// terms created here are immutable handles; only a satisfying [`Model`]
/// ever assigns them truth values.
pub struct Context {
    graph: TermGraph,
    assertions: Vec<TermId>,
}

/// Outcome of a solve call.
pub enum SolveResult {
    /// The assertions are satisfiable; a witness model is attached.
    Sat(Model),
    /// The assertions are unsatisfiable.
    Unsat,
}

/// A satisfying assignment for every variable in the context.
pub struct Model {
    assignment: Vec<bool>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self {
            graph: TermGraph::new(),
            assertions: Vec::new(),
        }
    }

    /// The constant true term.
    pub fn tt(&self) -> TermId {
        TRUE
    }

    /// The constant false term.
    pub fn ff(&self) -> TermId {
        FALSE
    }

    /// Create a fresh Boolean variable.
    pub fn var(&mut self) -> TermId {
        self.graph.mk_var()
    }

    /// Negation.
    pub fn not(&mut self, t: TermId) -> TermId {
        self.graph.mk_not(t)
    }

    /// Conjunction over a slice of terms.
    pub fn and(&mut self, terms: &[TermId]) -> TermId {
        self.graph.mk_and(terms)
    }

    /// Disjunction over a slice of terms.
    pub fn or(&mut self, terms: &[TermId]) -> TermId {
        self.graph.mk_or(terms)
    }

    /// Exclusive or.
    pub fn xor(&mut self, a: TermId, b: TermId) -> TermId {
        self.graph.mk_xor(a, b)
    }

    /// Biconditional.
    pub fn iff(&mut self, a: TermId, b: TermId) -> TermId {
        self.graph.mk_iff(a, b)
    }

    /// Implication `a -> b`.
    pub fn implies(&mut self, a: TermId, b: TermId) -> TermId {
        let na = self.not(a);
        self.or(&[na, b])
    }

    // =========================================================================
    // Cardinality primitives
    // =========================================================================

    /// At least one of `terms` is true (plain disjunction).
    pub fn at_least_one(&mut self, terms: &[TermId]) -> TermId {
        self.or(terms)
    }

    /// At most one of `terms` is true (pairwise mutual exclusion).
    pub fn at_most_one(&mut self, terms: &[TermId]) -> TermId {
        let mut exclusions = Vec::with_capacity(terms.len().saturating_sub(1) * terms.len() / 2);
        for (i, &a) in terms.iter().enumerate() {
            for &b in &terms[i + 1..] {
                let na = self.not(a);
                let nb = self.not(b);
                exclusions.push(self.or(&[na, nb]));
            }
        }
        self.and(&exclusions)
    }

    /// Exactly one of `terms` is true.
    ///
    /// Built from the two primitives above; every exactly-one site in the
    /// synthesis stack goes through this.
    pub fn exactly_one(&mut self, terms: &[TermId]) -> TermId {
        let alo = self.at_least_one(terms);
        let amo = self.at_most_one(terms);
        self.and(&[alo, amo])
    }

    // =========================================================================
    // Assertion and solving
    // =========================================================================

    /// Assert that `term` must hold.
    pub fn assert_term(&mut self, term: TermId) {
        self.assertions.push(term);
    }

    /// Number of decision variables created so far.
    pub fn num_vars(&self) -> u32 {
        self.graph.num_vars()
    }

    /// Number of asserted formulas.
    pub fn num_assertions(&self) -> usize {
        self.assertions.len()
    }

    /// Decide the asserted formulas.
    ///
    /// Lowers every assertion to CNF and runs the SAT search. The context
    /// itself is unchanged; repeated calls re-solve from scratch.
    pub fn solve(&self) -> SolveResult {
        let mut builder = CnfBuilder::new(&self.graph);
        for &assertion in &self.assertions {
            builder.assert_term(assertion);
        }
        let num_vars = builder.num_vars();
        let Some(clauses) = builder.into_clauses() else {
            return SolveResult::Unsat;
        };
        match Solver::new(num_vars as usize, clauses).solve() {
            Some(assignment) => SolveResult::Sat(Model { assignment }),
            None => SolveResult::Unsat,
        }
    }

    pub(crate) fn term(&self, id: TermId) -> &Term {
        self.graph.node(id)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    /// Evaluate a term under this model.
    ///
    /// Decision-variable lookups are O(1); composite terms are evaluated
    /// over the shared graph with memoization.
    pub fn value(&self, ctx: &Context, term: TermId) -> bool {
        let mut cache = FxHashMap::default();
        self.eval(ctx, term, &mut cache)
    }

    fn eval(&self, ctx: &Context, term: TermId, cache: &mut FxHashMap<TermId, bool>) -> bool {
        if let Some(&v) = cache.get(&term) {
            return v;
        }
        let value = match ctx.term(term) {
            Term::True => true,
            Term::False => false,
            Term::Var(v) => self.assignment.get(v.0 as usize).copied().unwrap_or(false),
            Term::Not(inner) => !self.eval(ctx, *inner, cache),
            Term::And(items) => {
                let items = items.clone();
                items.iter().all(|&t| self.eval(ctx, t, cache))
            }
            Term::Or(items) => {
                let items = items.clone();
                items.iter().any(|&t| self.eval(ctx, t, cache))
            }
            Term::Xor(a, b) => {
                let (a, b) = (*a, *b);
                self.eval(ctx, a, cache) ^ self.eval(ctx, b, cache)
            }
            Term::Iff(a, b) => {
                let (a, b) = (*a, *b);
                self.eval(ctx, a, cache) == self.eval(ctx, b, cache)
            }
        };
        cache.insert(term, value);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_sat() {
        let mut ctx = Context::new();
        let a = ctx.var();
        let b = ctx.var();
        let nb = ctx.not(b);
        let both = ctx.and(&[a, nb]);
        ctx.assert_term(both);
        match ctx.solve() {
            SolveResult::Sat(model) => {
                assert!(model.value(&ctx, a));
                assert!(!model.value(&ctx, b));
                assert!(model.value(&ctx, both));
            }
            SolveResult::Unsat => panic!("expected sat"),
        }
    }

    #[test]
    fn test_contradiction_unsat() {
        let mut ctx = Context::new();
        let a = ctx.var();
        let na = ctx.not(a);
        ctx.assert_term(a);
        ctx.assert_term(na);
        assert!(matches!(ctx.solve(), SolveResult::Unsat));
    }

    #[test]
    fn test_exactly_one() {
        let mut ctx = Context::new();
        let vars: Vec<_> = (0..5).map(|_| ctx.var()).collect();
        let one = ctx.exactly_one(&vars);
        ctx.assert_term(one);
        match ctx.solve() {
            SolveResult::Sat(model) => {
                let trues = vars.iter().filter(|&&v| model.value(&ctx, v)).count();
                assert_eq!(trues, 1);
            }
            SolveResult::Unsat => panic!("expected sat"),
        }
    }

    #[test]
    fn test_xor_chain() {
        let mut ctx = Context::new();
        let vars: Vec<_> = (0..4).map(|_| ctx.var()).collect();
        let chain = vars
            .iter()
            .skip(1)
            .fold(vars[0], |acc, &v| ctx.xor(acc, v));
        ctx.assert_term(chain);
        match ctx.solve() {
            SolveResult::Sat(model) => {
                let trues = vars.iter().filter(|&&v| model.value(&ctx, v)).count();
                assert_eq!(trues % 2, 1);
            }
            SolveResult::Unsat => panic!("expected sat"),
        }
    }

    #[test]
    fn test_pigeonhole_unsat() {
        // three pigeons, two holes
        let mut ctx = Context::new();
        let mut slot = [[ctx.ff(); 2]; 3];
        for row in &mut slot {
            for s in row.iter_mut() {
                *s = ctx.var();
            }
        }
        for row in &slot {
            let alo = ctx.at_least_one(&row[..]);
            ctx.assert_term(alo);
        }
        for hole in 0..2 {
            let column: Vec<_> = (0..3).map(|p| slot[p][hole]).collect();
            let amo = ctx.at_most_one(&column);
            ctx.assert_term(amo);
        }
        assert!(matches!(ctx.solve(), SolveResult::Unsat));
    }

    #[test]
    fn test_iff_and_implies() {
        let mut ctx = Context::new();
        let a = ctx.var();
        let b = ctx.var();
        let eq = ctx.iff(a, b);
        let imp = ctx.implies(a, b);
        ctx.assert_term(eq);
        ctx.assert_term(a);
        match ctx.solve() {
            SolveResult::Sat(model) => {
                assert!(model.value(&ctx, b));
                assert!(model.value(&ctx, imp));
            }
            SolveResult::Unsat => panic!("expected sat"),
        }
    }
}
