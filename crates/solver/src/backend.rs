//! Abstraction over SMT solver backends.
//!
//! The [`SolverBackend`] trait decouples the analysis from any concrete
//! solver process, so the bounds checker can be driven by the real
//! subprocess solver or by a scripted fake in tests.

use gepcheck_smtlib::script::Script;

use crate::config::SolverKind;
use crate::error::SolverError;
use crate::result::SolverResult;
use crate::solver::CliSolver;

/// Trait abstracting over SMT solver backends.
pub trait SolverBackend {
    /// Check satisfiability of the given SMT script.
    ///
    /// Returns:
    /// - `Ok(SolverResult::Sat(model))` if satisfiable (witness found)
    /// - `Ok(SolverResult::Unsat)` if unsatisfiable
    /// - `Ok(SolverResult::Unknown(reason))` if the solver couldn't decide
    /// - `Err(SolverError)` if the solver invocation itself failed
    fn check_sat(&self, script: &Script) -> Result<SolverResult, SolverError>;
}

impl SolverBackend for CliSolver {
    fn check_sat(&self, script: &Script) -> Result<SolverResult, SolverError> {
        CliSolver::check_sat(self, script)
    }
}

/// Create a subprocess backend for the specified solver kind.
pub fn create_backend(kind: SolverKind) -> Result<Box<dyn SolverBackend>, SolverError> {
    tracing::debug!("using {kind} subprocess backend");
    let solver = CliSolver::with_default_config_for(kind)?;
    Ok(Box::new(solver))
}
