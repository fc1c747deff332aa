use crate::Field;

/// An `ORDER BY` entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Order {
    pub field: Field,
    pub desc: bool,
}

impl Order {
    pub fn new(field: Field, desc: bool) -> Self {
        Self { field, desc }
    }
}
