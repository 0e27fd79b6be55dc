//! # gepcheck-solver
//!
//! SMT solver interface for the gepcheck bounds checker.
//!
//! Spawns an external solver (Z3, CVC5, or Yices) as a subprocess, pipes an
//! SMT-LIB2 script to its stdin, and parses the `sat`/`unsat`/`unknown`
//! answer plus any `(get-model)` output.
//!
//! ## Usage
//!
//! ```no_run
//! use gepcheck_solver::{CliSolver, SolverResult};
//!
//! let solver = CliSolver::with_default_config().unwrap();
//! let result = solver.check_sat_raw("
//!     (declare-const x (_ BitVec 8))
//!     (assert (bvugt x (_ bv0 8)))
//!     (check-sat)
//!     (get-model)
//! ").unwrap();
//!
//! match result {
//!     SolverResult::Sat(model) => println!("sat: {model:?}"),
//!     SolverResult::Unsat => println!("unsat"),
//!     SolverResult::Unknown(reason) => println!("unknown: {reason}"),
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod model;
mod parser;
pub mod result;
pub mod solver;

pub use backend::{create_backend, SolverBackend};
pub use config::{SolverConfig, SolverKind};
pub use error::SolverError;
pub use model::Model;
pub use result::SolverResult;
pub use solver::CliSolver;
