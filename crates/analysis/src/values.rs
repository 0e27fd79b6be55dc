//! Symbolic value model: how IR values become SMT terms.
//!
//! Two encodings are supported. In **direct** mode every instruction result
//! is a free bit-vector constant, sound for a single traversal of one
//! function. In **parametric** mode results are uninterpreted functions of
//! the function's formal parameters and every semantic assertion is
//! universally quantified over them, so the emitted constraints form a
//! reusable summary of the function.
//!
//! The parametric encoding leans on binder shadowing: `close` wraps an
//! assertion in a `forall` whose binders reuse the parameter names, so the
//! same term serves both as the quantified summary and, with the binders
//! absent, as a concrete query over the free parameter constants.

use gepcheck_smtlib::command::Command;
use gepcheck_smtlib::sort::Sort;
use gepcheck_smtlib::term::Term;

use crate::ir::{Function, Operand, Ty};

/// How instruction results are encoded in the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingMode {
    /// One free constant per result.
    Direct,
    /// Results are uninterpreted functions of the formal parameters.
    Parametric,
}

/// Maps IR operands to SMT terms under a fixed [`EncodingMode`].
#[derive(Debug, Clone)]
pub struct ValueModel {
    mode: EncodingMode,
    /// Integer formal parameters of the function, in declaration order.
    params: Vec<(String, u32)>,
}

impl ValueModel {
    /// Build a model for `func`. Only integer-typed parameters participate
    /// in the parametric encoding; others are ignored.
    pub fn new(mode: EncodingMode, func: &Function) -> Self {
        let params = func
            .params
            .iter()
            .filter_map(|p| p.ty.int_width().map(|w| (p.name.clone(), w)))
            .collect();
        Self { mode, params }
    }

    pub fn mode(&self) -> EncodingMode {
        self.mode
    }

    pub fn params(&self) -> &[(String, u32)] {
        &self.params
    }

    fn is_param(&self, name: &str) -> bool {
        self.params.iter().any(|(p, _)| p == name)
    }

    /// Term for a named IR value.
    ///
    /// Parameters are always free constants. Instruction results are free
    /// constants in direct mode and applications of the result's
    /// uninterpreted function to the parameters in parametric mode.
    pub fn variable(&self, name: &str) -> Term {
        match self.mode {
            EncodingMode::Direct => Term::var(name),
            EncodingMode::Parametric => {
                if self.is_param(name) || self.params.is_empty() {
                    Term::var(name)
                } else {
                    let args = self.params.iter().map(|(p, _)| Term::var(p)).collect();
                    Term::App(name.to_string(), args)
                }
            }
        }
    }

    /// Term for an operand, or `None` when the operand has no bit-vector
    /// interpretation (non-integer constant).
    pub fn operand(&self, op: &Operand) -> Option<Term> {
        match op {
            Operand::Const { value, ty } => {
                let width = ty.int_width()?;
                Some(Term::bv(*value, width))
            }
            Operand::Var { name, .. } => Some(self.variable(name)),
        }
    }

    /// Declaration command for a named result of the given width.
    pub fn declaration(&self, name: &str, width: u32) -> Command {
        match self.mode {
            EncodingMode::Direct => Command::DeclareConst(name.to_string(), Sort::BitVec(width)),
            EncodingMode::Parametric => {
                if self.is_param(name) || self.params.is_empty() {
                    Command::DeclareConst(name.to_string(), Sort::BitVec(width))
                } else {
                    let arg_sorts = self.params.iter().map(|(_, w)| Sort::BitVec(*w)).collect();
                    Command::DeclareFun(name.to_string(), arg_sorts, Sort::BitVec(width))
                }
            }
        }
    }

    /// Close a semantic assertion over the formal parameters.
    ///
    /// Identity in direct mode and when there are no integer parameters.
    /// In parametric mode the binders shadow the free parameter constants
    /// of the same names.
    pub fn close(&self, assertion: Term) -> Term {
        match self.mode {
            EncodingMode::Direct => assertion,
            EncodingMode::Parametric => {
                if self.params.is_empty() {
                    assertion
                } else {
                    let binders = self
                        .params
                        .iter()
                        .map(|(p, w)| (p.clone(), Sort::BitVec(*w)))
                        .collect();
                    Term::Forall(binders, Box::new(assertion))
                }
            }
        }
    }
}
