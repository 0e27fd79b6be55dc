//! # gepcheck-smtlib
//!
//! SMT-LIB2 abstract syntax and text formatting.
//!
//! The AST covers the theory the bounds checker emits: booleans,
//! fixed-width bit-vectors, if-then-else, implication, and universal
//! quantification. [`formatter`] implements `Display` for every node,
//! producing text accepted by Z3, CVC5, and Yices.
//!
//! ```
//! use gepcheck_smtlib::{Command, Script, Sort, Term};
//!
//! let mut script = Script::new();
//! script.push(Command::SetLogic("QF_BV".to_string()));
//! script.push(Command::DeclareConst("x".to_string(), Sort::BitVec(32)));
//! script.push(Command::Assert(Term::BvSLt(
//!     Box::new(Term::var("x")),
//!     Box::new(Term::bv(0, 32)),
//! )));
//! script.push(Command::CheckSat);
//!
//! assert!(script.to_string().contains("(assert (bvslt x (_ bv0 32)))"));
//! ```

pub mod command;
pub mod formatter;
pub mod script;
pub mod sort;
pub mod term;

pub use command::Command;
pub use script::Script;
pub use sort::Sort;
pub use term::Term;
