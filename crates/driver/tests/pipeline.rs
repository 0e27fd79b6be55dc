//! Loader-to-analysis pipeline tests driven by a scripted backend.

use gepcheck_analysis::{analyze_module, EncodingMode, Verdict};
use gepcheck_driver::parse_module;
use gepcheck_smtlib::script::Script;
use gepcheck_solver::{SolverBackend, SolverError, SolverResult};

struct FixedBackend(SolverResult);

impl SolverBackend for FixedBackend {
    fn check_sat(&self, _script: &Script) -> Result<SolverResult, SolverError> {
        Ok(self.0.clone())
    }
}

/// `f(i)`: a[i] guarded by nothing, against `[10 x i32]`.
const UNGUARDED: &str = r#"{
    "functions": [{
        "name": "f",
        "params": [{"name": "i", "ty": "i32"}],
        "entry": "entry",
        "blocks": [{
            "name": "entry",
            "instructions": [
                {"opcode": "sext", "result": "idx",
                 "src": {"var": "i", "ty": "i32"}, "dest_ty": "i64"},
                {"opcode": "gep", "result": "p", "inbounds": true,
                 "elem_ty": "i32", "array_len": 10,
                 "index": {"var": "idx", "ty": "i64"}}
            ]
        }]
    }]
}"#;

#[test]
fn loaded_program_produces_findings() {
    let module = parse_module(UNGUARDED).unwrap();
    let backend = FixedBackend(SolverResult::Sat(None));
    let findings = analyze_module(&module, EncodingMode::Direct, &backend).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].function, "f");
    assert_eq!(findings[0].gep_result, "p");
    assert_eq!(findings[0].verdict, Verdict::OutOfBounds(None));
}

#[test]
fn unknown_surfaces_as_undecided() {
    let module = parse_module(UNGUARDED).unwrap();
    let backend = FixedBackend(SolverResult::Unknown("timeout".to_string()));
    let findings = analyze_module(&module, EncodingMode::Direct, &backend).unwrap();
    assert_eq!(
        findings[0].verdict,
        Verdict::Undecided("timeout".to_string())
    );
}

#[test]
fn guarded_program_round_trips_through_loader() {
    let json = r#"{
        "functions": [{
            "name": "g",
            "params": [{"name": "i", "ty": "i32"}],
            "entry": "entry",
            "blocks": [
                {"name": "entry", "instructions": [
                    {"opcode": "icmp", "result": "ok", "pred": "ult",
                     "lhs": {"var": "i", "ty": "i32"},
                     "rhs": {"value": 10, "ty": "i32"}},
                    {"opcode": "br", "cond": {"var": "ok", "ty": "i1"},
                     "then": "access", "else": "exit"}
                ]},
                {"name": "access", "instructions": [
                    {"opcode": "zext", "result": "idx",
                     "src": {"var": "i", "ty": "i32"}, "dest_ty": "i64"},
                    {"opcode": "gep", "result": "p", "inbounds": true,
                     "elem_ty": "i32", "array_len": 10,
                     "index": {"var": "idx", "ty": "i64"}},
                    {"opcode": "br", "target": "exit"}
                ]},
                {"name": "exit", "instructions": []}
            ]
        }]
    }"#;
    let module = parse_module(json).unwrap();
    let backend = FixedBackend(SolverResult::Unsat);
    let findings = analyze_module(&module, EncodingMode::Direct, &backend).unwrap();
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].block, "access");
    assert_eq!(findings[0].verdict, Verdict::Safe);
}

#[test]
fn unsupported_instructions_do_not_block_analysis() {
    let json = r#"{
        "functions": [{
            "name": "h",
            "entry": "entry",
            "blocks": [{
                "name": "entry",
                "instructions": [
                    {"opcode": "call", "callee": "other"},
                    {"opcode": "gep", "result": "p", "inbounds": true,
                     "elem_ty": "i32", "array_len": 4,
                     "index": {"value": 2, "ty": "i64"}}
                ]
            }]
        }]
    }"#;
    let module = parse_module(json).unwrap();
    let backend = FixedBackend(SolverResult::Unsat);
    let findings = analyze_module(&module, EncodingMode::Direct, &backend).unwrap();
    assert_eq!(findings.len(), 1);
}
