use crate::{
    Condition, DeleteBuilder, Dialect, Document, EncodeDocument, ID, InsertBuilder, Result,
    SelectBuilder, SelectField, UpdateBuilder, Value, WhereBuilder, truncate_long,
};
use std::{
    fmt::{self, Debug, Display},
    sync::Arc,
};

/// Compiled SQL text with its positional arguments.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            args,
        }
    }
}

impl From<&str> for Statement {
    fn from(value: &str) -> Self {
        Statement::new(value, Vec::new())
    }
}

impl From<String> for Statement {
    fn from(value: String) -> Self {
        Statement::new(value, Vec::new())
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}

/// Compiles a builder into a [`Statement`].
pub trait ToSql {
    fn to_sql(&self) -> Result<Statement>;
}

/// Entry point of every statement: a dialect, a table and the kind of documents.
#[derive(Clone)]
pub struct Query {
    pub(crate) dialect: &'static dyn Dialect,
    pub(crate) table: Arc<str>,
    pub(crate) kind: Arc<str>,
}

impl Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("dialect", &self.dialect.name())
            .field("table", &self.table)
            .field("kind", &self.kind)
            .finish()
    }
}

impl Query {
    pub fn new(dialect: &'static dyn Dialect, table: &str, kind: &str) -> Self {
        Self {
            dialect,
            table: table.into(),
            kind: kind.into(),
        }
    }
    pub fn dialect(&self) -> &'static dyn Dialect {
        self.dialect
    }
    pub fn table(&self) -> &str {
        &self.table
    }
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Restricts to the given ids: none keeps every document of the kind.
    pub fn get<S: AsRef<str>>(&self, ids: impl IntoIterator<Item = S>) -> WhereBuilder {
        let ids: Vec<Value> = ids.into_iter().map(|v| v.as_ref().into()).collect();
        match ids.len() {
            0 => self.filter([]),
            1 => self.filter(ids.into_iter().map(|id| Condition::eq(ID, id))),
            _ => self.filter([Condition::is_in(ID, ids)]),
        }
    }

    pub fn filter(&self, conditions: impl IntoIterator<Item = Condition>) -> WhereBuilder {
        WhereBuilder::new(self.clone()).filter(conditions)
    }

    /// Every default column.
    pub fn select(&self) -> SelectBuilder {
        WhereBuilder::new(self.clone()).select()
    }

    pub fn select_columns<S: SelectField>(
        &self,
        columns: impl IntoIterator<Item = S>,
    ) -> SelectBuilder {
        WhereBuilder::new(self.clone()).select_columns(columns)
    }

    pub fn count(&self) -> SelectBuilder {
        WhereBuilder::new(self.clone()).count()
    }

    pub fn delete<S: AsRef<str>>(&self, ids: impl IntoIterator<Item = S>) -> DeleteBuilder {
        self.get(ids).delete()
    }

    pub fn insert<D: Document + Send + Sync + 'static>(
        &self,
        values: impl IntoIterator<Item = D>,
    ) -> InsertBuilder {
        InsertBuilder::new(self.clone()).add(values)
    }

    /// Replaces the stored document with the same id.
    ///
    /// A value without id, or with a kind other than the query's one, produces a statement
    /// matching no rows.
    pub fn update<D: Document + Send + Sync + 'static>(&self, value: D) -> UpdateBuilder {
        let value: Arc<dyn EncodeDocument> = Arc::new(value);
        let target = match value.identity() {
            Ok((kind, id)) if kind.is_empty() || *kind == *self.kind => self.get([id]),
            _ => self.filter([Condition::False]),
        };
        target.update(value)
    }
}

/// Metadata about modify operations (INSERT/UPDATE/DELETE).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    pub rows_affected: u64,
}

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type RowValues = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: RowValues,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: RowValues) -> Self {
        Self { labels, values }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values()[i])
    }
}

/// Heterogeneous items emitted by `Executor::run` combining rows and modify results.
#[derive(Debug)]
pub enum QueryResult {
    /// A labeled row.
    Row(RowLabeled),
    /// A modify effect aggregation.
    Affected(RowsAffected),
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for elem in iter {
            self.rows_affected += elem.rows_affected;
        }
    }
}

impl From<RowLabeled> for QueryResult {
    fn from(value: RowLabeled) -> Self {
        QueryResult::Row(value)
    }
}

impl From<RowsAffected> for QueryResult {
    fn from(value: RowsAffected) -> Self {
        QueryResult::Affected(value)
    }
}
