use crate::sort::Sort;

/// SMT-LIB term (expression) representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    // === Literals ===
    /// Boolean literal
    BoolLit(bool),
    /// Bitvector literal with value and width
    BitVecLit(i128, u32),

    // === Variables ===
    /// Named constant/variable reference
    Const(String),

    // === Boolean operations ===
    /// Logical NOT
    Not(Box<Term>),
    /// Logical AND (n-ary)
    And(Vec<Term>),
    /// Logical OR (n-ary)
    Or(Vec<Term>),
    /// Logical implication: `(=> a b)`
    Implies(Box<Term>, Box<Term>),

    // === Core ===
    /// Equality: `(= a b)`
    Eq(Box<Term>, Box<Term>),
    /// If-then-else: `(ite cond then else)`
    Ite(Box<Term>, Box<Term>, Box<Term>),

    // === Bitvector arithmetic ===
    /// `(bvadd a b)`
    BvAdd(Box<Term>, Box<Term>),
    /// `(bvsub a b)`
    BvSub(Box<Term>, Box<Term>),
    /// `(bvmul a b)`
    BvMul(Box<Term>, Box<Term>),

    // === Bitvector bitwise / shifts ===
    /// `(bvand a b)`
    BvAnd(Box<Term>, Box<Term>),
    /// `(bvor a b)`
    BvOr(Box<Term>, Box<Term>),
    /// `(bvxor a b)`
    BvXor(Box<Term>, Box<Term>),
    /// `(bvshl a b)` — shift left
    BvShl(Box<Term>, Box<Term>),
    /// `(bvlshr a b)` — logical shift right
    BvLShr(Box<Term>, Box<Term>),
    /// `(bvashr a b)` — arithmetic shift right
    BvAShr(Box<Term>, Box<Term>),

    // === Bitvector comparison (signed) ===
    /// `(bvslt a b)` — signed less-than
    BvSLt(Box<Term>, Box<Term>),
    /// `(bvsle a b)` — signed less-or-equal
    BvSLe(Box<Term>, Box<Term>),
    /// `(bvsgt a b)` — signed greater-than
    BvSGt(Box<Term>, Box<Term>),
    /// `(bvsge a b)` — signed greater-or-equal
    BvSGe(Box<Term>, Box<Term>),

    // === Bitvector comparison (unsigned) ===
    /// `(bvult a b)` — unsigned less-than
    BvULt(Box<Term>, Box<Term>),
    /// `(bvule a b)` — unsigned less-or-equal
    BvULe(Box<Term>, Box<Term>),
    /// `(bvugt a b)` — unsigned greater-than
    BvUGt(Box<Term>, Box<Term>),
    /// `(bvuge a b)` — unsigned greater-or-equal
    BvUGe(Box<Term>, Box<Term>),

    // === Bitvector conversion ===
    /// `((_ zero_extend n) a)`
    ZeroExtend(u32, Box<Term>),
    /// `((_ sign_extend n) a)`
    SignExtend(u32, Box<Term>),

    // === Quantifiers ===
    /// `(forall ((x Sort) ...) body)`
    Forall(Vec<(String, Sort)>, Box<Term>),

    // === Function application ===
    /// `(f arg1 arg2 ...)`; renders as the bare symbol when nullary
    App(String, Vec<Term>),
}

impl Term {
    /// Named variable reference.
    pub fn var(name: impl Into<String>) -> Self {
        Term::Const(name.into())
    }

    /// Bitvector literal of the given width.
    pub fn bv(value: i128, width: u32) -> Self {
        Term::BitVecLit(value, width)
    }

    /// `(= lhs rhs)`
    pub fn eq(lhs: Term, rhs: Term) -> Self {
        Term::Eq(Box::new(lhs), Box::new(rhs))
    }

    /// `(=> lhs rhs)`
    pub fn implies(lhs: Term, rhs: Term) -> Self {
        Term::Implies(Box::new(lhs), Box::new(rhs))
    }

    /// `(ite cond then else)`
    pub fn ite(cond: Term, then: Term, els: Term) -> Self {
        Term::Ite(Box::new(cond), Box::new(then), Box::new(els))
    }

    /// `(not t)`
    pub fn not(t: Term) -> Self {
        Term::Not(Box::new(t))
    }
}
