use crate::model::Model;

/// Result from the SMT solver.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverResult {
    /// Formula is satisfiable; the query has a witness.
    Sat(Option<Model>),
    /// Formula is unsatisfiable; the queried violation is impossible.
    Unsat,
    /// Solver couldn't determine (timeout, resource limit, incomplete theory).
    Unknown(String),
}

impl SolverResult {
    pub fn is_sat(&self) -> bool {
        matches!(self, SolverResult::Sat(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, SolverResult::Unsat)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SolverResult::Unknown(_))
    }

    /// Returns the model if the result is `Sat` with a model.
    pub fn model(&self) -> Option<&Model> {
        match self {
            SolverResult::Sat(Some(model)) => Some(model),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sat_predicates() {
        let sat = SolverResult::Sat(None);
        assert!(sat.is_sat());
        assert!(!sat.is_unsat());
        assert!(!sat.is_unknown());
    }

    #[test]
    fn unsat_predicates() {
        let unsat = SolverResult::Unsat;
        assert!(!unsat.is_sat());
        assert!(unsat.is_unsat());
        assert!(!unsat.is_unknown());
    }

    #[test]
    fn unknown_predicates() {
        let unknown = SolverResult::Unknown("timeout".to_string());
        assert!(!unknown.is_sat());
        assert!(!unknown.is_unsat());
        assert!(unknown.is_unknown());
    }

    #[test]
    fn model_accessor() {
        let model = Model::with_assignments(vec![("x".to_string(), "5".to_string())]);
        assert_eq!(SolverResult::Sat(Some(model.clone())).model(), Some(&model));
        assert_eq!(SolverResult::Sat(None).model(), None);
        assert_eq!(SolverResult::Unsat.model(), None);
    }
}
