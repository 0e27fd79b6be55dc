//! Forward CFG traversal with path-predicate propagation.
//!
//! Blocks are visited depth-first from the entry, true successor first.
//! A join block is deferred until all of its predecessors have recorded an
//! incoming edge condition; since every block has at most one visit, the
//! deferred visit happens exactly when the last incoming edge arrives.

use std::collections::HashSet;

use gepcheck_smtlib::command::Command;
use gepcheck_smtlib::term::Term;
use gepcheck_solver::SolverBackend;

use crate::checker::{self, Finding};
use crate::error::AnalysisError;
use crate::ir::{BlockId, Branch, Function, Gep, Instruction, Module, Operand};
use crate::path::PathPredicates;
use crate::translate;
use crate::values::{EncodingMode, ValueModel};

/// Analyze every function in the module, in order.
pub fn analyze_module(
    module: &Module,
    mode: EncodingMode,
    backend: &dyn SolverBackend,
) -> Result<Vec<Finding>, AnalysisError> {
    let mut findings = Vec::new();
    for func in &module.functions {
        findings.extend(analyze_function(func, mode, backend)?);
    }
    Ok(findings)
}

/// Analyze one function: traverse its CFG, accumulate instruction
/// semantics, and dispatch a bounds-check query per qualifying gep.
pub fn analyze_function(
    func: &Function,
    mode: EncodingMode,
    backend: &dyn SolverBackend,
) -> Result<Vec<Finding>, AnalysisError> {
    tracing::info!(function = %func.name, ?mode, "analyzing function");
    let mut analysis = FunctionAnalysis::new(func, mode, backend);
    analysis.run()?;
    Ok(analysis.findings)
}

/// All per-function traversal state. Built fresh for each function; no
/// state leaks between functions.
struct FunctionAnalysis<'a> {
    func: &'a Function,
    model: ValueModel,
    paths: PathPredicates,
    visited: Vec<bool>,
    pred_counts: Vec<usize>,
    declared: HashSet<String>,
    declarations: Vec<Command>,
    assertions: Vec<Term>,
    findings: Vec<Finding>,
    backend: &'a dyn SolverBackend,
}

impl<'a> FunctionAnalysis<'a> {
    fn new(func: &'a Function, mode: EncodingMode, backend: &'a dyn SolverBackend) -> Self {
        let model = ValueModel::new(mode, func);
        Self {
            func,
            model,
            paths: PathPredicates::new(),
            visited: vec![false; func.blocks.len()],
            pred_counts: func.predecessor_counts(),
            declared: HashSet::new(),
            declarations: Vec::new(),
            assertions: Vec::new(),
            findings: Vec::new(),
            backend,
        }
    }

    fn run(&mut self) -> Result<(), AnalysisError> {
        if self.func.blocks.is_empty() {
            return Ok(());
        }
        let params: Vec<(String, u32)> = self.model.params().to_vec();
        for (name, width) in params {
            self.declare(&name, width);
        }
        self.visit_block(self.func.entry)
    }

    fn declare(&mut self, name: &str, width: u32) {
        if self.declared.insert(name.to_string()) {
            self.declarations.push(self.model.declaration(name, width));
        }
    }

    /// Visit `id` if it is unvisited and all its incoming edges have
    /// recorded predicates; otherwise a no-op (the visit happens later,
    /// triggered by the final incoming edge).
    fn visit_block(&mut self, id: BlockId) -> Result<(), AnalysisError> {
        if self.visited[id] {
            return Ok(());
        }
        if id != self.func.entry && self.paths.incoming_count(id) < self.pred_counts[id] {
            tracing::debug!(
                block = %self.func.block(id).name,
                have = self.paths.incoming_count(id),
                need = self.pred_counts[id],
                "deferring join block"
            );
            return Ok(());
        }
        self.visited[id] = true;
        tracing::debug!(block = %self.func.block(id).name, "visiting block");

        for inst in &self.func.block(id).instructions {
            let translation = translate::translate(inst, &self.model, &self.paths, id);
            for (name, width) in &translation.declares {
                self.declare(name, *width);
            }
            self.assertions.extend(translation.asserts);

            match inst {
                Instruction::Gep(gep) => self.check_gep(id, gep)?,
                Instruction::Br(branch) => return self.take_branch(id, branch),
                _ => {}
            }
        }
        Ok(())
    }

    fn take_branch(&mut self, id: BlockId, branch: &Branch) -> Result<(), AnalysisError> {
        let merged = self.paths.merged(id);
        match branch {
            Branch::Cond {
                cond,
                then_blk,
                else_blk,
            } => {
                let cond_term = self.model.operand(cond);
                self.paths
                    .record(*then_blk, id, edge_condition(&merged, &cond_term, true));
                self.visit_block(*then_blk)?;
                self.paths
                    .record(*else_blk, id, edge_condition(&merged, &cond_term, false));
                self.visit_block(*else_blk)
            }
            Branch::Jump { target } => {
                if *target == self.func.entry {
                    return Err(AnalysisError::EntryReentered {
                        function: self.func.name.clone(),
                        from_block: self.func.block(id).name.clone(),
                    });
                }
                self.paths.record(*target, id, merged);
                self.visit_block(*target)
            }
        }
    }

    fn check_gep(&mut self, id: BlockId, gep: &Gep) -> Result<(), AnalysisError> {
        let Some(array_len) = gep.checked_array_len() else {
            return Ok(());
        };
        let Some(index) = checker::index_term(&self.model, gep) else {
            tracing::warn!(gep = %gep.result, "index not representable, skipping check");
            return Ok(());
        };
        // An index variable defined by an unmodeled instruction has no
        // declaration yet; declare it unconstrained at its own width.
        if let Operand::Var { name, ty } = &gep.index {
            if let Some(width) = ty.int_width() {
                self.declare(name, width);
            }
        }

        let reach = self.paths.merged(id);
        let verdict = checker::check(
            self.model.mode(),
            &self.declarations,
            &self.assertions,
            reach,
            index,
            array_len,
            self.backend,
        )?;
        tracing::debug!(
            function = %self.func.name,
            gep = %gep.result,
            ?verdict,
            "bounds check complete"
        );
        self.findings.push(Finding {
            function: self.func.name.clone(),
            block: self.func.block(id).name.clone(),
            gep_result: gep.result.clone(),
            array_len,
            verdict,
        });
        Ok(())
    }
}

/// `merged AND (cond == 1)` for the true edge, `== 0` for the false edge.
/// When the condition operand cannot be modeled the edge inherits the
/// merged predicate alone.
fn edge_condition(merged: &Term, cond: &Option<Term>, taken: bool) -> Term {
    match cond {
        Some(c) => {
            let bit = if taken { 1 } else { 0 };
            Term::And(vec![
                merged.clone(),
                Term::eq(c.clone(), Term::bv(bit, 1)),
            ])
        }
        None => merged.clone(),
    }
}
