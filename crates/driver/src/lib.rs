//! Driver library: program loading and report rendering.

pub mod loader;
pub mod report;

pub use loader::{load_module, parse_module, LoadError};
