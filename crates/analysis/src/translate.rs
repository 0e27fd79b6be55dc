//! Instruction translation: IR semantics as SMT assertions.
//!
//! Each supported instruction contributes a declaration for its result and
//! an assertion pinning the result to its operands. Unsupported opcodes,
//! non-integer casts, and division/remainder produce nothing; their results
//! stay unconstrained, which keeps the analysis sound (an unconstrained
//! value can take any value the solver likes).

use gepcheck_smtlib::term::Term;

use crate::ir::{BinOp, BlockId, IcmpPred, Instruction, Operand};
use crate::path::PathPredicates;
use crate::values::ValueModel;

/// Declarations and assertions produced for one instruction.
#[derive(Debug, Clone, Default)]
pub struct Translation {
    /// `(name, width)` pairs to declare before the assertions.
    pub declares: Vec<(String, u32)>,
    /// Assertions, already closed over the formal parameters.
    pub asserts: Vec<Term>,
}

impl Translation {
    fn empty() -> Self {
        Self::default()
    }

    fn single(name: &str, width: u32, assertion: Term) -> Self {
        Self {
            declares: vec![(name.to_string(), width)],
            asserts: vec![assertion],
        }
    }
}

/// Translate one instruction in the context of `block`.
///
/// Branches and geps carry no value semantics of their own here: branch
/// conditions feed the path predicates in the walker, and gep bounds are
/// the checker's scoped query.
pub fn translate(
    inst: &Instruction,
    model: &ValueModel,
    paths: &PathPredicates,
    block: BlockId,
) -> Translation {
    match inst {
        Instruction::ZExt {
            result,
            src,
            dest_ty,
        } => translate_ext(result, src, dest_ty, model, false),
        Instruction::SExt {
            result,
            src,
            dest_ty,
        } => translate_ext(result, src, dest_ty, model, true),
        Instruction::Binary {
            result,
            op,
            lhs,
            rhs,
            ty,
        } => translate_binary(result, *op, lhs, rhs, ty, model),
        Instruction::Icmp {
            result,
            pred,
            lhs,
            rhs,
        } => translate_icmp(result, *pred, lhs, rhs, model),
        Instruction::Phi {
            result,
            ty,
            incoming,
        } => translate_phi(result, ty, incoming, model, paths, block),
        Instruction::Br(_) | Instruction::Gep(_) | Instruction::Unsupported => Translation::empty(),
    }
}

fn translate_ext(
    result: &str,
    src: &Operand,
    dest_ty: &crate::ir::Ty,
    model: &ValueModel,
    signed: bool,
) -> Translation {
    let (Some(src_w), Some(dst_w)) = (src.ty().int_width(), dest_ty.int_width()) else {
        return Translation::empty();
    };
    if dst_w <= src_w {
        return Translation::empty();
    }
    let Some(src_term) = model.operand(src) else {
        return Translation::empty();
    };

    let extended = if signed {
        Term::SignExtend(dst_w - src_w, Box::new(src_term))
    } else {
        Term::ZeroExtend(dst_w - src_w, Box::new(src_term))
    };
    let assertion = model.close(Term::eq(model.variable(result), extended));
    Translation::single(result, dst_w, assertion)
}

fn translate_binary(
    result: &str,
    op: BinOp,
    lhs: &Operand,
    rhs: &Operand,
    ty: &crate::ir::Ty,
    model: &ValueModel,
) -> Translation {
    let Some(width) = ty.int_width() else {
        return Translation::empty();
    };
    let (Some(l), Some(r)) = (model.operand(lhs), model.operand(rhs)) else {
        return Translation::empty();
    };
    let (l, r) = (Box::new(l), Box::new(r));

    let term = match op {
        BinOp::Add => Term::BvAdd(l, r),
        BinOp::Sub => Term::BvSub(l, r),
        BinOp::Mul => Term::BvMul(l, r),
        BinOp::Shl => Term::BvShl(l, r),
        BinOp::LShr => Term::BvLShr(l, r),
        BinOp::AShr => Term::BvAShr(l, r),
        BinOp::And => Term::BvAnd(l, r),
        BinOp::Or => Term::BvOr(l, r),
        BinOp::Xor => Term::BvXor(l, r),
        // Division and remainder are left unmodeled.
        BinOp::UDiv | BinOp::SDiv | BinOp::URem | BinOp::SRem => return Translation::empty(),
    };

    let assertion = model.close(Term::eq(model.variable(result), term));
    Translation::single(result, width, assertion)
}

fn translate_icmp(
    result: &str,
    pred: IcmpPred,
    lhs: &Operand,
    rhs: &Operand,
    model: &ValueModel,
) -> Translation {
    let (Some(l), Some(r)) = (model.operand(lhs), model.operand(rhs)) else {
        return Translation::empty();
    };
    let (l, r) = (Box::new(l), Box::new(r));

    let cond = match pred {
        IcmpPred::Eq => Term::Eq(l, r),
        IcmpPred::Ne => Term::not(Term::Eq(l, r)),
        IcmpPred::Ugt => Term::BvUGt(l, r),
        IcmpPred::Uge => Term::BvUGe(l, r),
        IcmpPred::Ult => Term::BvULt(l, r),
        IcmpPred::Ule => Term::BvULe(l, r),
        IcmpPred::Sgt => Term::BvSGt(l, r),
        IcmpPred::Sge => Term::BvSGe(l, r),
        IcmpPred::Slt => Term::BvSLt(l, r),
        IcmpPred::Sle => Term::BvSLe(l, r),
    };

    // A comparison yields a 1-bit value, not a Bool.
    let assertion = model.close(Term::eq(
        model.variable(result),
        Term::ite(cond, Term::bv(1, 1), Term::bv(0, 1)),
    ));
    Translation::single(result, 1, assertion)
}

fn translate_phi(
    result: &str,
    ty: &crate::ir::Ty,
    incoming: &[crate::ir::PhiIncoming],
    model: &ValueModel,
    paths: &PathPredicates,
    block: BlockId,
) -> Translation {
    let Some(width) = ty.int_width() else {
        return Translation::empty();
    };

    // One guarded assertion per incoming edge. Implication rather than
    // equality: on any concrete path exactly one guard holds, so the
    // mutually exclusive incoming values never contradict each other.
    let mut asserts = Vec::new();
    for inc in incoming {
        let Some(edge_pred) = paths.edge(block, inc.from) else {
            continue;
        };
        let Some(value) = model.operand(&inc.value) else {
            continue;
        };
        asserts.push(model.close(Term::implies(
            edge_pred.clone(),
            Term::eq(model.variable(result), value),
        )));
    }

    Translation {
        declares: vec![(result.to_string(), width)],
        asserts,
    }
}
