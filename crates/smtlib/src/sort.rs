/// SMT-LIB sort (type) representation.
///
/// The checker only ever builds boolean and fixed-width bit-vector terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sort {
    /// Boolean sort
    Bool,
    /// Fixed-width bitvector: `(_ BitVec n)`
    BitVec(u32),
}

impl Sort {
    /// The width of a bit-vector sort, or `None` for `Bool`.
    pub fn width(&self) -> Option<u32> {
        match self {
            Sort::Bool => None,
            Sort::BitVec(n) => Some(*n),
        }
    }
}
