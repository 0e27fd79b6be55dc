use std::fmt;

/// A model (witness) from the solver.
///
/// Contains variable assignments extracted from the solver's `(get-model)`
/// output. Values are kept as the solver printed them (`(_ bv42 32)`,
/// `#x0000002a`, `true`, ...), so the model is readable without knowing
/// each variable's sort.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Variable assignments: `(name, value_string)` pairs.
    pub assignments: Vec<(String, String)>,
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self {
            assignments: Vec::new(),
        }
    }

    /// Create a model from assignment pairs.
    pub fn with_assignments(assignments: Vec<(String, String)>) -> Self {
        Self { assignments }
    }

    /// Look up a variable's value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.assignments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name} = {value}")?;
        }
        Ok(())
    }
}
