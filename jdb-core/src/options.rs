pub const DEFAULT_TABLE: &str = "jdb";

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Name of the document table.
    pub table: String,
    /// Reject every modifying statement before it reaches the database.
    pub read_only: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE.into(),
            read_only: false,
        }
    }
}

impl Options {
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}
