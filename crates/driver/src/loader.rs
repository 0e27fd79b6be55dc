//! JSON program loader.
//!
//! Deserializes the on-disk program representation into [`ir::Module`].
//! The JSON layer uses block *names* for control-flow references; loading
//! resolves them to arena indices and rejects dangling references,
//! duplicate block names, and missing entry blocks.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use gepcheck_analysis::ir::{
    BinOp, Block, Branch, Function, Gep, IcmpPred, Instruction, Module, Operand, Param,
    PhiIncoming, Ty,
};

/// Errors from loading a program file.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Structurally valid JSON that does not describe a well-formed program.
    Malformed(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "cannot read program file: {e}"),
            LoadError::Json(e) => write!(f, "invalid program JSON: {e}"),
            LoadError::Malformed(msg) => write!(f, "malformed program: {msg}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Json(e) => Some(e),
            LoadError::Malformed(_) => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Json(e)
    }
}

// === Raw JSON mirror structs ===

#[derive(Debug, Deserialize)]
struct RawModule {
    functions: Vec<RawFunction>,
}

#[derive(Debug, Deserialize)]
struct RawFunction {
    name: String,
    #[serde(default)]
    params: Vec<RawParam>,
    entry: String,
    blocks: Vec<RawBlock>,
}

#[derive(Debug, Deserialize)]
struct RawParam {
    name: String,
    ty: String,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    name: String,
    #[serde(default)]
    instructions: Vec<RawInst>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "opcode", rename_all = "lowercase")]
enum RawInst {
    Zext {
        result: String,
        src: RawOperand,
        dest_ty: String,
    },
    Sext {
        result: String,
        src: RawOperand,
        dest_ty: String,
    },
    Binary {
        result: String,
        op: String,
        lhs: RawOperand,
        rhs: RawOperand,
        ty: String,
    },
    Icmp {
        result: String,
        pred: String,
        lhs: RawOperand,
        rhs: RawOperand,
    },
    Phi {
        result: String,
        ty: String,
        incoming: Vec<RawIncoming>,
    },
    Br {
        #[serde(default)]
        cond: Option<RawOperand>,
        #[serde(default, rename = "then")]
        then_blk: Option<String>,
        #[serde(default, rename = "else")]
        else_blk: Option<String>,
        #[serde(default)]
        target: Option<String>,
    },
    Gep {
        result: String,
        #[serde(default)]
        inbounds: bool,
        elem_ty: String,
        #[serde(default)]
        array_len: Option<u64>,
        index: RawOperand,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawOperand {
    Var { var: String, ty: String },
    Const { value: i64, ty: String },
}

#[derive(Debug, Deserialize)]
struct RawIncoming {
    value: RawOperand,
    from: String,
}

// === Conversion ===

/// Load a program module from a JSON file.
pub fn load_module(path: &Path) -> Result<Module, LoadError> {
    let text = fs::read_to_string(path)?;
    parse_module(&text)
}

/// Parse a program module from JSON text.
pub fn parse_module(text: &str) -> Result<Module, LoadError> {
    let raw: RawModule = serde_json::from_str(text)?;
    let mut functions = Vec::with_capacity(raw.functions.len());
    for func in raw.functions {
        functions.push(convert_function(func)?);
    }
    tracing::debug!(functions = functions.len(), "program loaded");
    Ok(Module::new(functions))
}

fn convert_function(raw: RawFunction) -> Result<Function, LoadError> {
    let mut block_ids = HashMap::new();
    for (id, block) in raw.blocks.iter().enumerate() {
        if block_ids.insert(block.name.clone(), id).is_some() {
            return Err(LoadError::Malformed(format!(
                "function '{}': duplicate block name '{}'",
                raw.name, block.name
            )));
        }
    }

    let entry = *block_ids.get(&raw.entry).ok_or_else(|| {
        LoadError::Malformed(format!(
            "function '{}': entry block '{}' does not exist",
            raw.name, raw.entry
        ))
    })?;

    let resolve = |name: &str| -> Result<usize, LoadError> {
        block_ids.get(name).copied().ok_or_else(|| {
            LoadError::Malformed(format!(
                "function '{}': reference to unknown block '{name}'",
                raw.name
            ))
        })
    };

    let mut blocks = Vec::with_capacity(raw.blocks.len());
    for block in raw.blocks {
        let mut instructions = Vec::with_capacity(block.instructions.len());
        for inst in block.instructions {
            instructions.push(convert_inst(inst, &raw.name, &resolve)?);
        }
        blocks.push(Block {
            name: block.name,
            instructions,
        });
    }

    let params = raw
        .params
        .into_iter()
        .map(|p| Param {
            name: p.name,
            ty: parse_ty(&p.ty),
        })
        .collect();

    Ok(Function {
        name: raw.name,
        params,
        entry,
        blocks,
    })
}

fn convert_inst(
    raw: RawInst,
    func: &str,
    resolve: &dyn Fn(&str) -> Result<usize, LoadError>,
) -> Result<Instruction, LoadError> {
    let inst = match raw {
        RawInst::Zext {
            result,
            src,
            dest_ty,
        } => Instruction::ZExt {
            result,
            src: convert_operand(src),
            dest_ty: parse_ty(&dest_ty),
        },
        RawInst::Sext {
            result,
            src,
            dest_ty,
        } => Instruction::SExt {
            result,
            src: convert_operand(src),
            dest_ty: parse_ty(&dest_ty),
        },
        RawInst::Binary {
            result,
            op,
            lhs,
            rhs,
            ty,
        } => match parse_binop(&op) {
            Some(op) => Instruction::Binary {
                result,
                op,
                lhs: convert_operand(lhs),
                rhs: convert_operand(rhs),
                ty: parse_ty(&ty),
            },
            None => Instruction::Unsupported,
        },
        RawInst::Icmp {
            result,
            pred,
            lhs,
            rhs,
        } => match parse_icmp_pred(&pred) {
            Some(pred) => Instruction::Icmp {
                result,
                pred,
                lhs: convert_operand(lhs),
                rhs: convert_operand(rhs),
            },
            None => Instruction::Unsupported,
        },
        RawInst::Phi {
            result,
            ty,
            incoming,
        } => {
            let mut converted = Vec::with_capacity(incoming.len());
            for inc in incoming {
                converted.push(PhiIncoming {
                    value: convert_operand(inc.value),
                    from: resolve(&inc.from)?,
                });
            }
            Instruction::Phi {
                result,
                ty: parse_ty(&ty),
                incoming: converted,
            }
        }
        RawInst::Br {
            cond,
            then_blk,
            else_blk,
            target,
        } => match (cond, then_blk, else_blk, target) {
            (None, None, None, Some(target)) => Instruction::Br(Branch::Jump {
                target: resolve(&target)?,
            }),
            (Some(cond), Some(then_blk), Some(else_blk), None) => Instruction::Br(Branch::Cond {
                cond: convert_operand(cond),
                then_blk: resolve(&then_blk)?,
                else_blk: resolve(&else_blk)?,
            }),
            _ => {
                return Err(LoadError::Malformed(format!(
                    "function '{func}': br needs either 'target' or \
                     'cond'/'then'/'else'"
                )))
            }
        },
        RawInst::Gep {
            result,
            inbounds,
            elem_ty,
            array_len,
            index,
        } => {
            let source_ty = match array_len {
                Some(len) => Ty::Array {
                    elem: Box::new(parse_ty(&elem_ty)),
                    len,
                },
                // Without a static length there is nothing to check
                // against; keep the gep but leave it unqualified.
                None => Ty::Ptr,
            };
            Instruction::Gep(Gep {
                result,
                inbounds,
                source_ty,
                index: convert_operand(index),
            })
        }
        RawInst::Unsupported => Instruction::Unsupported,
    };
    Ok(inst)
}

fn convert_operand(raw: RawOperand) -> Operand {
    match raw {
        RawOperand::Var { var, ty } => Operand::Var {
            name: var,
            ty: parse_ty(&ty),
        },
        RawOperand::Const { value, ty } => Operand::Const {
            value: value as i128,
            ty: parse_ty(&ty),
        },
    }
}

/// Parse a type string: `iN`, `ptr`, or anything else as opaque.
fn parse_ty(s: &str) -> Ty {
    if s == "ptr" {
        return Ty::Ptr;
    }
    if let Some(width) = s.strip_prefix('i') {
        if let Ok(width) = width.parse::<u32>() {
            return Ty::Int(width);
        }
    }
    Ty::Other(s.to_string())
}

fn parse_binop(s: &str) -> Option<BinOp> {
    let op = match s {
        "add" => BinOp::Add,
        "sub" => BinOp::Sub,
        "mul" => BinOp::Mul,
        "udiv" => BinOp::UDiv,
        "sdiv" => BinOp::SDiv,
        "urem" => BinOp::URem,
        "srem" => BinOp::SRem,
        "shl" => BinOp::Shl,
        "lshr" => BinOp::LShr,
        "ashr" => BinOp::AShr,
        "and" => BinOp::And,
        "or" => BinOp::Or,
        "xor" => BinOp::Xor,
        _ => return None,
    };
    Some(op)
}

fn parse_icmp_pred(s: &str) -> Option<IcmpPred> {
    let pred = match s {
        "eq" => IcmpPred::Eq,
        "ne" => IcmpPred::Ne,
        "ugt" => IcmpPred::Ugt,
        "uge" => IcmpPred::Uge,
        "ult" => IcmpPred::Ult,
        "ule" => IcmpPred::Ule,
        "sgt" => IcmpPred::Sgt,
        "sge" => IcmpPred::Sge,
        "slt" => IcmpPred::Slt,
        "sle" => IcmpPred::Sle,
        _ => return None,
    };
    Some(pred)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_types() {
        assert_eq!(parse_ty("i32"), Ty::Int(32));
        assert_eq!(parse_ty("i1"), Ty::Int(1));
        assert_eq!(parse_ty("ptr"), Ty::Ptr);
        assert_eq!(parse_ty("float"), Ty::Other("float".to_string()));
        assert_eq!(parse_ty("ix"), Ty::Other("ix".to_string()));
    }

    #[test]
    fn minimal_module() {
        let json = r#"{
            "functions": [{
                "name": "f",
                "entry": "entry",
                "blocks": [{"name": "entry", "instructions": []}]
            }]
        }"#;
        let module = parse_module(json).unwrap();
        assert_eq!(module.functions.len(), 1);
        assert_eq!(module.functions[0].entry, 0);
        assert!(module.functions[0].params.is_empty());
    }

    #[test]
    fn branch_names_resolve_to_ids() {
        let json = r#"{
            "functions": [{
                "name": "f",
                "params": [{"name": "c", "ty": "i1"}],
                "entry": "start",
                "blocks": [
                    {"name": "start", "instructions": [
                        {"opcode": "br", "cond": {"var": "c", "ty": "i1"},
                         "then": "yes", "else": "no"}
                    ]},
                    {"name": "yes", "instructions": [
                        {"opcode": "br", "target": "no"}
                    ]},
                    {"name": "no", "instructions": []}
                ]
            }]
        }"#;
        let module = parse_module(json).unwrap();
        let func = &module.functions[0];
        assert_eq!(
            func.blocks[0].instructions[0],
            Instruction::Br(Branch::Cond {
                cond: Operand::Var {
                    name: "c".to_string(),
                    ty: Ty::Int(1)
                },
                then_blk: 1,
                else_blk: 2,
            })
        );
        assert_eq!(
            func.blocks[1].instructions[0],
            Instruction::Br(Branch::Jump { target: 2 })
        );
    }

    #[test]
    fn gep_with_array_len() {
        let json = r#"{
            "functions": [{
                "name": "f",
                "entry": "entry",
                "blocks": [{"name": "entry", "instructions": [
                    {"opcode": "gep", "result": "p", "inbounds": true,
                     "elem_ty": "i32", "array_len": 10,
                     "index": {"value": 3, "ty": "i64"}}
                ]}]
            }]
        }"#;
        let module = parse_module(json).unwrap();
        let Instruction::Gep(gep) = &module.functions[0].blocks[0].instructions[0] else {
            panic!("expected gep");
        };
        assert_eq!(gep.checked_array_len(), Some(10));
        assert_eq!(
            gep.index,
            Operand::Const {
                value: 3,
                ty: Ty::Int(64)
            }
        );
    }

    #[test]
    fn gep_without_len_is_unqualified() {
        let json = r#"{
            "functions": [{
                "name": "f",
                "entry": "entry",
                "blocks": [{"name": "entry", "instructions": [
                    {"opcode": "gep", "result": "p", "inbounds": true,
                     "elem_ty": "i32",
                     "index": {"value": 3, "ty": "i64"}}
                ]}]
            }]
        }"#;
        let module = parse_module(json).unwrap();
        let Instruction::Gep(gep) = &module.functions[0].blocks[0].instructions[0] else {
            panic!("expected gep");
        };
        assert_eq!(gep.checked_array_len(), None);
    }

    #[test]
    fn unknown_opcode_becomes_unsupported() {
        let json = r#"{
            "functions": [{
                "name": "f",
                "entry": "entry",
                "blocks": [{"name": "entry", "instructions": [
                    {"opcode": "call", "callee": "g"},
                    {"opcode": "load", "result": "x"}
                ]}]
            }]
        }"#;
        let module = parse_module(json).unwrap();
        assert_eq!(
            module.functions[0].blocks[0].instructions,
            vec![Instruction::Unsupported, Instruction::Unsupported]
        );
    }

    #[test]
    fn unknown_binop_becomes_unsupported() {
        let json = r#"{
            "functions": [{
                "name": "f",
                "entry": "entry",
                "blocks": [{"name": "entry", "instructions": [
                    {"opcode": "binary", "result": "x", "op": "fadd",
                     "lhs": {"value": 1, "ty": "i32"},
                     "rhs": {"value": 2, "ty": "i32"},
                     "ty": "i32"}
                ]}]
            }]
        }"#;
        let module = parse_module(json).unwrap();
        assert_eq!(
            module.functions[0].blocks[0].instructions[0],
            Instruction::Unsupported
        );
    }

    #[test]
    fn duplicate_block_name_rejected() {
        let json = r#"{
            "functions": [{
                "name": "f",
                "entry": "entry",
                "blocks": [
                    {"name": "entry", "instructions": []},
                    {"name": "entry", "instructions": []}
                ]
            }]
        }"#;
        let err = parse_module(json).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
        assert!(err.to_string().contains("duplicate block name"));
    }

    #[test]
    fn missing_entry_rejected() {
        let json = r#"{
            "functions": [{
                "name": "f",
                "entry": "nope",
                "blocks": [{"name": "entry", "instructions": []}]
            }]
        }"#;
        let err = parse_module(json).unwrap_err();
        assert!(err.to_string().contains("entry block 'nope'"));
    }

    #[test]
    fn dangling_branch_target_rejected() {
        let json = r#"{
            "functions": [{
                "name": "f",
                "entry": "entry",
                "blocks": [{"name": "entry", "instructions": [
                    {"opcode": "br", "target": "missing"}
                ]}]
            }]
        }"#;
        let err = parse_module(json).unwrap_err();
        assert!(err.to_string().contains("unknown block 'missing'"));
    }

    #[test]
    fn invalid_json_rejected() {
        assert!(matches!(
            parse_module("not json").unwrap_err(),
            LoadError::Json(_)
        ));
    }

    #[test]
    fn phi_incoming_resolved() {
        let json = r#"{
            "functions": [{
                "name": "f",
                "entry": "a",
                "blocks": [
                    {"name": "a", "instructions": [
                        {"opcode": "br", "target": "b"}
                    ]},
                    {"name": "b", "instructions": [
                        {"opcode": "phi", "result": "m", "ty": "i32",
                         "incoming": [{"value": {"value": 0, "ty": "i32"}, "from": "a"}]}
                    ]}
                ]
            }]
        }"#;
        let module = parse_module(json).unwrap();
        let Instruction::Phi { incoming, .. } = &module.functions[0].blocks[1].instructions[0]
        else {
            panic!("expected phi");
        };
        assert_eq!(incoming[0].from, 0);
    }
}
