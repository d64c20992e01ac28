//! Variables, literals, and the hash-consed term graph.

use rustc_hash::FxHashMap;

/// A Boolean decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Var(pub u32);

/// A literal: a variable or its negation, packed as `var << 1 | sign`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lit(u32);

impl Lit {
    /// The positive literal of `v`.
    #[inline]
    pub fn pos(v: Var) -> Self {
        Lit(v.0 << 1)
    }

    /// The negative literal of `v`.
    #[inline]
    pub fn neg(v: Var) -> Self {
        Lit(v.0 << 1 | 1)
    }

    /// The underlying variable.
    #[inline]
    pub fn var(self) -> Var {
        Var(self.0 >> 1)
    }

    /// Whether this is the positive literal.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 & 1 == 0
    }

    /// The opposite literal.
    #[inline]
    pub fn negate(self) -> Self {
        Lit(self.0 ^ 1)
    }

    /// Dense index usable for watch lists.
    #[inline]
    pub(crate) fn code(self) -> usize {
        self.0 as usize
    }
}

/// Handle to an interned term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(pub(crate) u32);

/// Interned term node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Term {
    True,
    False,
    Var(Var),
    Not(TermId),
    And(Box<[TermId]>),
    Or(Box<[TermId]>),
    Xor(TermId, TermId),
    Iff(TermId, TermId),
}

/// Hash-consed term storage.
///
/// Connective constructors fold constants and canonicalize operand order,
/// so structurally equal terms share one node.
pub(crate) struct TermGraph {
    nodes: Vec<Term>,
    interned: FxHashMap<Term, TermId>,
    num_vars: u32,
}

pub(crate) const TRUE: TermId = TermId(0);
pub(crate) const FALSE: TermId = TermId(1);

impl TermGraph {
    pub fn new() -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            interned: FxHashMap::default(),
            num_vars: 0,
        };
        let t = graph.intern(Term::True);
        let f = graph.intern(Term::False);
        debug_assert_eq!(t, TRUE);
        debug_assert_eq!(f, FALSE);
        graph
    }

    pub fn num_vars(&self) -> u32 {
        self.num_vars
    }

    pub fn node(&self, id: TermId) -> &Term {
        &self.nodes[id.0 as usize]
    }

    fn intern(&mut self, term: Term) -> TermId {
        if let Some(&id) = self.interned.get(&term) {
            return id;
        }
        let id = TermId(u32::try_from(self.nodes.len()).expect("term graph overflow"));
        self.nodes.push(term.clone());
        self.interned.insert(term, id);
        id
    }

    pub fn mk_var(&mut self) -> TermId {
        let v = Var(self.num_vars);
        self.num_vars += 1;
        self.intern(Term::Var(v))
    }

    pub fn mk_not(&mut self, t: TermId) -> TermId {
        match self.node(t) {
            Term::True => return FALSE,
            Term::False => return TRUE,
            Term::Not(inner) => return *inner,
            _ => {}
        }
        self.intern(Term::Not(t))
    }

    pub fn mk_and(&mut self, terms: &[TermId]) -> TermId {
        let mut items: Vec<TermId> = Vec::with_capacity(terms.len());
        for &t in terms {
            match self.node(t) {
                Term::True => {}
                Term::False => return FALSE,
                _ => items.push(t),
            }
        }
        items.sort_unstable_by_key(|t| t.0);
        items.dedup();
        match items.len() {
            0 => TRUE,
            1 => items[0],
            _ => self.intern(Term::And(items.into_boxed_slice())),
        }
    }

    pub fn mk_or(&mut self, terms: &[TermId]) -> TermId {
        let mut items: Vec<TermId> = Vec::with_capacity(terms.len());
        for &t in terms {
            match self.node(t) {
                Term::False => {}
                Term::True => return TRUE,
                _ => items.push(t),
            }
        }
        items.sort_unstable_by_key(|t| t.0);
        items.dedup();
        match items.len() {
            0 => FALSE,
            1 => items[0],
            _ => self.intern(Term::Or(items.into_boxed_slice())),
        }
    }

    pub fn mk_xor(&mut self, a: TermId, b: TermId) -> TermId {
        if a == b {
            return FALSE;
        }
        match (self.node(a).clone(), self.node(b).clone()) {
            (Term::False, _) => b,
            (_, Term::False) => a,
            (Term::True, _) => self.mk_not(b),
            (_, Term::True) => self.mk_not(a),
            _ => {
                let (lo, hi) = if a.0 <= b.0 { (a, b) } else { (b, a) };
                self.intern(Term::Xor(lo, hi))
            }
        }
    }

    pub fn mk_iff(&mut self, a: TermId, b: TermId) -> TermId {
        if a == b {
            return TRUE;
        }
        match (self.node(a).clone(), self.node(b).clone()) {
            (Term::True, _) => b,
            (_, Term::True) => a,
            (Term::False, _) => self.mk_not(b),
            (_, Term::False) => self.mk_not(a),
            _ => {
                let (lo, hi) = if a.0 <= b.0 { (a, b) } else { (b, a) };
                self.intern(Term::Iff(lo, hi))
            }
        }
    }
}
