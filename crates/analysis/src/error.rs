use std::error::Error;
use std::fmt;

use gepcheck_solver::SolverError;

/// Errors surfaced while analyzing a function.
#[derive(Debug)]
pub enum AnalysisError {
    /// An unconditional branch targets the function's entry block.
    /// The traversal cannot assign the entry a finite predecessor set,
    /// so the input is rejected outright.
    EntryReentered { function: String, from_block: String },
    /// The SMT solver invocation failed.
    Solver(SolverError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::EntryReentered {
                function,
                from_block,
            } => write!(
                f,
                "function '{function}': unconditional branch from block '{from_block}' \
                 targets the entry block"
            ),
            AnalysisError::Solver(e) => write!(f, "solver error: {e}"),
        }
    }
}

impl Error for AnalysisError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AnalysisError::Solver(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SolverError> for AnalysisError {
    fn from(e: SolverError) -> Self {
        AnalysisError::Solver(e)
    }
}
