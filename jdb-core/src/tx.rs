use crate::{
    AsValue, Client, Document, Error, Executor, JdbError, Result, Row, RowLabeled, RowsAffected,
    SelectBuilder, Statement, ToSql,
    stream::{Stream, StreamExt, TryStreamExt},
};
use async_stream::try_stream;
use std::pin::pin;
use time::OffsetDateTime;

/// Runs builders of a [`Client`] on an executor owned by the caller.
///
/// Transaction boundaries belong to the executor: commit or roll it back once the `Tx` is
/// dropped.
pub struct Tx<'c, E: Executor> {
    client: &'c Client,
    executor: &'c mut E,
}

impl<'c, E: Executor> Tx<'c, E> {
    pub fn new(client: &'c Client, executor: &'c mut E) -> Self {
        Self { client, executor }
    }

    pub fn client(&self) -> &Client {
        self.client
    }

    pub fn executor(&mut self) -> &mut E {
        self.executor
    }

    fn map_error(&self, error: Error) -> Error {
        let error = self.client.dialect().map_error(error);
        log::error!("{:#}", error);
        error
    }

    /// Runs a modifying statement.
    ///
    /// A read-only client fails with [`JdbError::ReadOnlyMode`] before compiling anything.
    pub async fn exec(&mut self, builder: &impl ToSql) -> Result<RowsAffected> {
        if self.client.read_only() {
            return Err(JdbError::ReadOnlyMode.into());
        }
        let statement = builder.to_sql()?;
        log::debug!("{statement}");
        match self.executor.execute(statement).await {
            Ok(affected) => Ok(affected),
            Err(error) => Err(self.map_error(error)),
        }
    }

    /// Rows of a select, in the order the database returns them.
    pub fn rows(&mut self, select: &SelectBuilder) -> impl Stream<Item = Result<RowLabeled>> + Send {
        let statement = select.to_sql();
        let dialect = self.client.dialect();
        let executor = &mut *self.executor;
        try_stream! {
            let statement = statement?;
            log::debug!("{statement}");
            let mut stream = pin!(executor.fetch(statement));
            while let Some(row) = stream.next().await {
                yield row?;
            }
        }
        .map_err(move |e: Error| {
            let error = dialect.map_error(e);
            log::error!("{:#}", error);
            error
        })
    }

    /// First row decoded into `D`, [`JdbError::NotFound`] when there is none.
    pub async fn first<D: Document>(&mut self, select: &SelectBuilder) -> Result<D> {
        let mut stream = pin!(self.rows(select));
        match stream.next().await {
            Some(row) => Row::decode(&row?),
            None => Err(JdbError::NotFound.into()),
        }
    }

    /// Every row decoded into `D`.
    pub async fn all<D: Document>(&mut self, select: &SelectBuilder) -> Result<Vec<D>> {
        self.rows(select)
            .and_then(|row| async move { Row::decode::<D>(&row) })
            .try_collect()
            .await
    }

    /// The single selected column of the first row.
    pub async fn first_value<T: AsValue>(&mut self, select: &SelectBuilder) -> Result<T> {
        let mut stream = pin!(self.rows(select));
        match stream.next().await {
            Some(row) => Row::decode_value(row?),
            None => Err(JdbError::NotFound.into()),
        }
    }

    pub async fn count(&mut self, select: &SelectBuilder) -> Result<u64> {
        self.first_value(select).await
    }

    /// Current time according to the database.
    pub async fn now(&mut self) -> Result<OffsetDateTime> {
        let dialect = self.client.dialect();
        let mut sql = String::new();
        dialect.write_now(&mut sql);
        let statement = Statement::from(sql);
        log::debug!("{statement}");
        let row = {
            let mut stream = pin!(self.executor.fetch(statement));
            stream.next().await
        };
        let row = match row {
            Some(Ok(row)) => row,
            Some(Err(error)) => return Err(self.map_error(error)),
            None => return Err(JdbError::NotFound.into()),
        };
        let value = row
            .get_column("now")
            .or_else(|| row.values.first())
            .cloned()
            .unwrap_or_default();
        dialect.parse_now(value)
    }
}
