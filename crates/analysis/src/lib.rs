//! Path-sensitive symbolic array-bounds analysis.
//!
//! Translates a function's CFG and instruction semantics into bit-vector
//! constraints and asks an SMT solver, per array-indexing instruction,
//! whether a reachable out-of-bounds access exists.
//!
//! Pipeline: [`ir`] holds the program, [`walker`] traverses it driving
//! [`translate`] and [`path`], and [`checker`] dispatches one scoped
//! solver query per qualifying gep.

pub mod checker;
pub mod error;
pub mod ir;
pub mod path;
pub mod translate;
pub mod values;
pub mod walker;

pub use checker::{Finding, Verdict};
pub use error::AnalysisError;
pub use values::EncodingMode;
pub use walker::{analyze_function, analyze_module};
