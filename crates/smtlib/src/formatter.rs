//! SMT-LIB2 text formatting.
//!
//! Implements `Display` for [`Sort`], [`Term`], [`Command`], and [`Script`],
//! producing output parsable by Z3, CVC5, and Yices.

use std::fmt;

use crate::command::Command;
use crate::script::Script;
use crate::sort::Sort;
use crate::term::Term;

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sort::Bool => write!(f, "Bool"),
            Sort::BitVec(width) => write!(f, "(_ BitVec {width})"),
        }
    }
}

/// Format a bitvector literal. Negative values are rendered in their
/// two's-complement unsigned form for the given width.
fn fmt_bv_lit(value: i128, width: u32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let unsigned = if width >= 128 {
        value as u128
    } else {
        (value as u128) & ((1u128 << width) - 1)
    };
    write!(f, "(_ bv{unsigned} {width})")
}

/// Write a binary SMT-LIB operator: `(op lhs rhs)`.
fn fmt_binop(op: &str, lhs: &Term, rhs: &Term, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({op} {lhs} {rhs})")
}

/// Write an n-ary SMT-LIB operator: `(op t1 t2 ...)`.
fn fmt_nary(op: &str, terms: &[Term], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({op}")?;
    for t in terms {
        write!(f, " {t}")?;
    }
    write!(f, ")")
}

/// Write sorted variable bindings: `((x Sort) (y Sort) ...)`.
fn fmt_sorted_vars(vars: &[(String, Sort)], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "(")?;
    for (i, (name, sort)) in vars.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "({name} {sort})")?;
    }
    write!(f, ")")
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::BoolLit(true) => write!(f, "true"),
            Term::BoolLit(false) => write!(f, "false"),
            Term::BitVecLit(value, width) => fmt_bv_lit(*value, *width, f),
            Term::Const(name) => write!(f, "{name}"),
            Term::Not(t) => write!(f, "(not {t})"),
            Term::And(ts) => fmt_nary("and", ts, f),
            Term::Or(ts) => fmt_nary("or", ts, f),
            Term::Implies(a, b) => fmt_binop("=>", a, b, f),
            Term::Eq(a, b) => fmt_binop("=", a, b, f),
            Term::Ite(c, t, e) => write!(f, "(ite {c} {t} {e})"),
            Term::BvAdd(a, b) => fmt_binop("bvadd", a, b, f),
            Term::BvSub(a, b) => fmt_binop("bvsub", a, b, f),
            Term::BvMul(a, b) => fmt_binop("bvmul", a, b, f),
            Term::BvAnd(a, b) => fmt_binop("bvand", a, b, f),
            Term::BvOr(a, b) => fmt_binop("bvor", a, b, f),
            Term::BvXor(a, b) => fmt_binop("bvxor", a, b, f),
            Term::BvShl(a, b) => fmt_binop("bvshl", a, b, f),
            Term::BvLShr(a, b) => fmt_binop("bvlshr", a, b, f),
            Term::BvAShr(a, b) => fmt_binop("bvashr", a, b, f),
            Term::BvSLt(a, b) => fmt_binop("bvslt", a, b, f),
            Term::BvSLe(a, b) => fmt_binop("bvsle", a, b, f),
            Term::BvSGt(a, b) => fmt_binop("bvsgt", a, b, f),
            Term::BvSGe(a, b) => fmt_binop("bvsge", a, b, f),
            Term::BvULt(a, b) => fmt_binop("bvult", a, b, f),
            Term::BvULe(a, b) => fmt_binop("bvule", a, b, f),
            Term::BvUGt(a, b) => fmt_binop("bvugt", a, b, f),
            Term::BvUGe(a, b) => fmt_binop("bvuge", a, b, f),
            Term::ZeroExtend(n, t) => write!(f, "((_ zero_extend {n}) {t})"),
            Term::SignExtend(n, t) => write!(f, "((_ sign_extend {n}) {t})"),
            Term::Forall(vars, body) => {
                write!(f, "(forall ")?;
                fmt_sorted_vars(vars, f)?;
                write!(f, " {body})")
            }
            Term::App(func, args) => {
                // A nullary application is just the symbol.
                if args.is_empty() {
                    write!(f, "{func}")
                } else {
                    write!(f, "({func}")?;
                    for arg in args {
                        write!(f, " {arg}")?;
                    }
                    write!(f, ")")
                }
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetLogic(logic) => write!(f, "(set-logic {logic})"),
            Command::DeclareConst(name, sort) => write!(f, "(declare-const {name} {sort})"),
            Command::DeclareFun(name, params, ret) => {
                write!(f, "(declare-fun {name} (")?;
                for (i, s) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{s}")?;
                }
                write!(f, ") {ret})")
            }
            Command::Assert(term) => write!(f, "(assert {term})"),
            Command::CheckSat => write!(f, "(check-sat)"),
            Command::GetModel => write!(f, "(get-model)"),
            Command::Push(n) => write!(f, "(push {n})"),
            Command::Pop(n) => write!(f, "(pop {n})"),
            Command::Comment(text) => write!(f, ";; {text}"),
            Command::Exit => write!(f, "(exit)"),
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cmd in self.commands() {
            writeln!(f, "{cmd}")?;
        }
        Ok(())
    }
}
