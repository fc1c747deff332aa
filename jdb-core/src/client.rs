use crate::{
    DataSourceOptions, Dialect, Executor, JdbError, Options, PathField, Query, Result, Tx,
    dialect, migrate,
};
use std::{
    fmt::{self, Debug},
    sync::Arc,
};

/// Handle binding a dialect to a document table.
///
/// The client never owns a connection: statements run on executors handed to [`Client::tx`].
#[derive(Clone)]
pub struct Client {
    dialect: &'static dyn Dialect,
    table: Arc<str>,
    read_only: bool,
}

impl Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("dialect", &self.dialect.name())
            .field("table", &self.table)
            .field("read_only", &self.read_only)
            .finish()
    }
}

impl Client {
    /// Resolves the registered dialect `name` and checks `data_source` against `options`.
    pub fn open(name: &str, data_source: &str, options: Options) -> Result<Self> {
        let dialect = dialect(name)?;
        Self::with_dialect(dialect, data_source, options)
    }

    pub fn with_dialect(
        dialect: &'static dyn Dialect,
        data_source: &str,
        options: Options,
    ) -> Result<Self> {
        if options.table.is_empty() {
            return Err(JdbError::InvalidTable.into());
        }
        dialect.validate_data_source(
            data_source,
            &DataSourceOptions {
                read_only: options.read_only,
            },
        )?;
        log::debug!(
            "Opened {} client on table {}{}",
            dialect.name(),
            options.table,
            if options.read_only { " (read-only)" } else { "" }
        );
        Ok(Self {
            dialect,
            table: options.table.into(),
            read_only: options.read_only,
        })
    }

    pub fn dialect(&self) -> &'static dyn Dialect {
        self.dialect
    }
    pub fn table(&self) -> &str {
        &self.table
    }
    pub fn read_only(&self) -> bool {
        self.read_only
    }

    /// Statements over the documents of `kind`.
    pub fn query(&self, kind: &str) -> Query {
        Query {
            dialect: self.dialect,
            table: self.table.clone(),
            kind: kind.into(),
        }
    }

    /// Nested payload path starting with `keys`.
    pub fn path<S: Into<String>>(&self, keys: impl IntoIterator<Item = S>) -> PathField {
        PathField::from_keys(keys)
    }

    pub fn tx<'c, E: Executor>(&'c self, executor: &'c mut E) -> Tx<'c, E> {
        Tx::new(self, executor)
    }

    /// Creates or upgrades the document table through `executor`.
    pub async fn migrate<E: Executor>(&self, executor: &mut E) -> Result<()> {
        if self.read_only {
            return Err(JdbError::ReadOnlyMode.into());
        }
        migrate(self.dialect, &self.table, executor).await
    }
}
