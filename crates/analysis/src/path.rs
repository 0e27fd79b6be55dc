//! Path predicate tracking.
//!
//! Every CFG edge `(source, target)` taken during traversal records the
//! condition under which control flows along it. A block's merged
//! reachability predicate is the disjunction of its incoming entries; a
//! block becomes ready to visit once it has one entry per predecessor.

use std::collections::BTreeMap;

use gepcheck_smtlib::term::Term;

use crate::ir::BlockId;

/// Per-edge reachability conditions for one function.
///
/// Keyed `target → source → condition`. `BTreeMap` keeps disjunct order
/// deterministic across runs.
#[derive(Debug, Clone, Default)]
pub struct PathPredicates {
    entries: BTreeMap<BlockId, BTreeMap<BlockId, Term>>,
}

impl PathPredicates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the condition for the edge `source → target`.
    pub fn record(&mut self, target: BlockId, source: BlockId, condition: Term) {
        self.entries
            .entry(target)
            .or_default()
            .insert(source, condition);
    }

    /// Number of recorded incoming edges for `target`.
    pub fn incoming_count(&self, target: BlockId) -> usize {
        self.entries.get(&target).map_or(0, BTreeMap::len)
    }

    /// Condition recorded for the edge `source → target`, if any.
    pub fn edge(&self, target: BlockId, source: BlockId) -> Option<&Term> {
        self.entries.get(&target).and_then(|m| m.get(&source))
    }

    /// Merged reachability predicate for `target`: the OR of its incoming
    /// edge conditions in source-id order, or `true` when no edges were
    /// recorded (the entry block).
    pub fn merged(&self, target: BlockId) -> Term {
        match self.entries.get(&target) {
            None => Term::BoolLit(true),
            Some(incoming) if incoming.is_empty() => Term::BoolLit(true),
            Some(incoming) => {
                if incoming.len() == 1 {
                    incoming.values().next().cloned().unwrap_or(Term::BoolLit(true))
                } else {
                    Term::Or(incoming.values().cloned().collect())
                }
            }
        }
    }
}
