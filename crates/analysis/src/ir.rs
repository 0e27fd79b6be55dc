//! In-memory SSA program representation.
//!
//! A [`Module`] is an ordered list of [`Function`]s; each function owns an
//! arena of [`Block`]s addressed by [`BlockId`] indices. Control flow is
//! derived from the terminating branch of each block rather than stored as
//! explicit edge lists.

use std::fmt;

/// Index into a function's block arena.
pub type BlockId = usize;

/// A whole program: an ordered list of functions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub functions: Vec<Function>,
}

impl Module {
    pub fn new(functions: Vec<Function>) -> Self {
        Self { functions }
    }
}

/// A single procedure with typed formal parameters and a block arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    /// Id of the entry block in `blocks`.
    pub entry: BlockId,
    pub blocks: Vec<Block>,
}

impl Function {
    /// Number of CFG predecessors for every block, indexed by `BlockId`.
    ///
    /// Derived by scanning each block's branch; blocks without a branch
    /// contribute no edges.
    pub fn predecessor_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.blocks.len()];
        for block in &self.blocks {
            for succ in block.successors() {
                counts[succ] += 1;
            }
        }
        counts
    }

    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id]
    }
}

/// Typed formal parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Ty,
}

/// A basic block: a name unique within the function and an ordered
/// instruction list. The branch, if any, is the last instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub name: String,
    pub instructions: Vec<Instruction>,
}

impl Block {
    /// Successor block ids, taken from the first branch instruction.
    pub fn successors(&self) -> Vec<BlockId> {
        for inst in &self.instructions {
            if let Instruction::Br(branch) = inst {
                return match branch {
                    Branch::Cond {
                        then_blk, else_blk, ..
                    } => vec![*then_blk, *else_blk],
                    Branch::Jump { target } => vec![*target],
                };
            }
        }
        Vec::new()
    }
}

/// The type lattice the checker understands.
///
/// `Other` carries the original type string so unsupported constructs stay
/// printable in diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum Ty {
    /// Fixed-width integer, e.g. `i32`.
    Int(u32),
    /// Opaque pointer.
    Ptr,
    /// Fixed-length array aggregate, e.g. `[10 x i32]`.
    Array { elem: Box<Ty>, len: u64 },
    /// Anything else; opaque to the analysis.
    Other(String),
}

impl Ty {
    /// Bit width when this is an integer type.
    pub fn int_width(&self) -> Option<u32> {
        match self {
            Ty::Int(w) => Some(*w),
            _ => None,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int(w) => write!(f, "i{w}"),
            Ty::Ptr => write!(f, "ptr"),
            Ty::Array { elem, len } => write!(f, "[{len} x {elem}]"),
            Ty::Other(s) => write!(f, "{s}"),
        }
    }
}

/// An SSA operand: either an immediate constant or a named value.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Const { value: i128, ty: Ty },
    Var { name: String, ty: Ty },
}

impl Operand {
    pub fn ty(&self) -> &Ty {
        match self {
            Operand::Const { ty, .. } => ty,
            Operand::Var { ty, .. } => ty,
        }
    }
}

/// Integer binary opcodes. Division and remainder are carried so inputs
/// round-trip, but the translator skips them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    UDiv,
    SDiv,
    URem,
    SRem,
    Shl,
    LShr,
    AShr,
    And,
    Or,
    Xor,
}

/// Integer comparison predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcmpPred {
    Eq,
    Ne,
    Ugt,
    Uge,
    Ult,
    Ule,
    Sgt,
    Sge,
    Slt,
    Sle,
}

/// One incoming phi edge: `value` when control arrived from `from`.
#[derive(Debug, Clone, PartialEq)]
pub struct PhiIncoming {
    pub value: Operand,
    pub from: BlockId,
}

/// Block terminator.
#[derive(Debug, Clone, PartialEq)]
pub enum Branch {
    /// Two-way branch on a 1-bit condition.
    Cond {
        cond: Operand,
        then_blk: BlockId,
        else_blk: BlockId,
    },
    /// Unconditional jump.
    Jump { target: BlockId },
}

/// Array-indexing instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Gep {
    pub result: String,
    pub inbounds: bool,
    /// The aggregate type being indexed into.
    pub source_ty: Ty,
    pub index: Operand,
}

impl Gep {
    /// Array length when this gep qualifies for bounds checking:
    /// it must be `inbounds` and index a fixed array of `i32`.
    pub fn checked_array_len(&self) -> Option<u64> {
        if !self.inbounds {
            return None;
        }
        match &self.source_ty {
            Ty::Array { elem, len } if **elem == Ty::Int(32) => Some(*len),
            _ => None,
        }
    }
}

/// A single SSA instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    ZExt {
        result: String,
        src: Operand,
        dest_ty: Ty,
    },
    SExt {
        result: String,
        src: Operand,
        dest_ty: Ty,
    },
    Binary {
        result: String,
        op: BinOp,
        lhs: Operand,
        rhs: Operand,
        ty: Ty,
    },
    Icmp {
        result: String,
        pred: IcmpPred,
        lhs: Operand,
        rhs: Operand,
    },
    Phi {
        result: String,
        ty: Ty,
        incoming: Vec<PhiIncoming>,
    },
    Br(Branch),
    Gep(Gep),
    /// Any opcode outside the supported set; ignored by the translator.
    Unsupported,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jump(target: BlockId) -> Instruction {
        Instruction::Br(Branch::Jump { target })
    }

    #[test]
    fn successors_of_cond_branch() {
        let block = Block {
            name: "entry".to_string(),
            instructions: vec![Instruction::Br(Branch::Cond {
                cond: Operand::Var {
                    name: "c".to_string(),
                    ty: Ty::Int(1),
                },
                then_blk: 1,
                else_blk: 2,
            })],
        };
        assert_eq!(block.successors(), vec![1, 2]);
    }

    #[test]
    fn successors_of_terminal_block() {
        let block = Block {
            name: "exit".to_string(),
            instructions: vec![Instruction::Unsupported],
        };
        assert!(block.successors().is_empty());
    }

    #[test]
    fn predecessor_counts_diamond() {
        // entry -> (left, right) -> join
        let func = Function {
            name: "f".to_string(),
            params: Vec::new(),
            entry: 0,
            blocks: vec![
                Block {
                    name: "entry".to_string(),
                    instructions: vec![Instruction::Br(Branch::Cond {
                        cond: Operand::Var {
                            name: "c".to_string(),
                            ty: Ty::Int(1),
                        },
                        then_blk: 1,
                        else_blk: 2,
                    })],
                },
                Block {
                    name: "left".to_string(),
                    instructions: vec![jump(3)],
                },
                Block {
                    name: "right".to_string(),
                    instructions: vec![jump(3)],
                },
                Block {
                    name: "join".to_string(),
                    instructions: vec![],
                },
            ],
        };
        assert_eq!(func.predecessor_counts(), vec![0, 1, 1, 2]);
    }

    #[test]
    fn gep_qualification() {
        let index = Operand::Var {
            name: "i".to_string(),
            ty: Ty::Int(64),
        };

        let qualifying = Gep {
            result: "p".to_string(),
            inbounds: true,
            source_ty: Ty::Array {
                elem: Box::new(Ty::Int(32)),
                len: 10,
            },
            index: index.clone(),
        };
        assert_eq!(qualifying.checked_array_len(), Some(10));

        let not_inbounds = Gep {
            inbounds: false,
            ..qualifying.clone()
        };
        assert_eq!(not_inbounds.checked_array_len(), None);

        let wrong_elem = Gep {
            source_ty: Ty::Array {
                elem: Box::new(Ty::Int(8)),
                len: 10,
            },
            ..qualifying.clone()
        };
        assert_eq!(wrong_elem.checked_array_len(), None);

        let not_array = Gep {
            source_ty: Ty::Ptr,
            ..qualifying
        };
        assert_eq!(not_array.checked_array_len(), None);
    }

    #[test]
    fn ty_display() {
        let arr = Ty::Array {
            elem: Box::new(Ty::Int(32)),
            len: 10,
        };
        assert_eq!(arr.to_string(), "[10 x i32]");
        assert_eq!(Ty::Int(64).to_string(), "i64");
        assert_eq!(Ty::Ptr.to_string(), "ptr");
    }
}
