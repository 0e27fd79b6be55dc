//! Bounds-check query engine.
//!
//! For each qualifying gep a one-shot script is assembled: the persistent
//! declarations and assertions, then a push/pop-bracketed sub-query
//! asserting that the block is reached and the index escapes `[0, len)`.
//! `sat` therefore means a concrete out-of-bounds witness exists; `unsat`
//! proves the access safe along every path.

use gepcheck_smtlib::command::Command;
use gepcheck_smtlib::script::Script;
use gepcheck_smtlib::term::Term;
use gepcheck_solver::{Model, SolverBackend, SolverError, SolverResult};

use crate::ir::{Gep, Operand};
use crate::values::{EncodingMode, ValueModel};

/// Width at which bounds comparisons are performed.
pub const INDEX_WIDTH: u32 = 64;

/// Outcome of one bounds check.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// The out-of-bounds condition is unsatisfiable on every path.
    Safe,
    /// A reachable out-of-bounds access exists; the witness model, when
    /// the solver produced one, assigns the inputs that trigger it.
    OutOfBounds(Option<Model>),
    /// The solver could not decide. Reported as its own outcome, never
    /// folded into safe.
    Undecided(String),
}

/// One checked gep and its verdict.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub function: String,
    pub block: String,
    pub gep_result: String,
    pub array_len: u64,
    pub verdict: Verdict,
}

/// The gep's index as a 64-bit term, or `None` when the index cannot be
/// modeled (wider than 64 bits, or not an integer). Narrower indices are
/// sign-extended; array indices are signed in the source semantics.
pub fn index_term(model: &ValueModel, gep: &Gep) -> Option<Term> {
    match &gep.index {
        Operand::Const { value, ty } => {
            ty.int_width().filter(|w| *w <= INDEX_WIDTH)?;
            Some(Term::bv(*value, INDEX_WIDTH))
        }
        Operand::Var { name, ty } => {
            let width = ty.int_width()?;
            if width > INDEX_WIDTH {
                return None;
            }
            let var = model.variable(name);
            if width == INDEX_WIDTH {
                Some(var)
            } else {
                Some(Term::SignExtend(INDEX_WIDTH - width, Box::new(var)))
            }
        }
    }
}

/// `idx <s 0 \/ idx >=s len` at [`INDEX_WIDTH`] bits.
pub fn out_of_bounds(index: Term, array_len: u64) -> Term {
    Term::Or(vec![
        Term::BvSLt(Box::new(index.clone()), Box::new(Term::bv(0, INDEX_WIDTH))),
        Term::BvSGe(
            Box::new(index),
            Box::new(Term::bv(array_len as i128, INDEX_WIDTH)),
        ),
    ])
}

/// SMT logic for the given encoding: quantifier-free for direct mode,
/// quantified bit-vectors for the parametric summaries.
pub fn logic(mode: EncodingMode) -> &'static str {
    match mode {
        EncodingMode::Direct => "QF_BV",
        EncodingMode::Parametric => "BV",
    }
}

/// Assemble the one-shot query script for a single gep.
///
/// The persistent prefix is cloned, never mutated; the query part sits
/// between `(push 1)` and `(pop 1)`.
pub fn build_query(
    mode: EncodingMode,
    declarations: &[Command],
    assertions: &[Term],
    reach: Term,
    index: Term,
    array_len: u64,
) -> Script {
    let mut script = Script::new();
    script.push(Command::SetLogic(logic(mode).to_string()));
    for decl in declarations {
        script.push(decl.clone());
    }
    for assertion in assertions {
        script.push(Command::Assert(assertion.clone()));
    }
    script.push(Command::Push(1));
    script.push(Command::Assert(reach));
    script.push(Command::Assert(out_of_bounds(index, array_len)));
    script.push(Command::CheckSat);
    script.push(Command::GetModel);
    script.push(Command::Pop(1));
    script
}

/// Run one bounds check through the backend and classify the result.
pub fn check(
    mode: EncodingMode,
    declarations: &[Command],
    assertions: &[Term],
    reach: Term,
    index: Term,
    array_len: u64,
    backend: &dyn SolverBackend,
) -> Result<Verdict, SolverError> {
    let script = build_query(mode, declarations, assertions, reach, index, array_len);
    let verdict = match backend.check_sat(&script)? {
        SolverResult::Unsat => Verdict::Safe,
        SolverResult::Sat(model) => Verdict::OutOfBounds(model),
        SolverResult::Unknown(reason) => Verdict::Undecided(reason),
    };
    Ok(verdict)
}
