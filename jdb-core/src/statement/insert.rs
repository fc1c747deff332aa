use crate::{
    Context, Document, EncodeDocument, Executor, JdbError, Query, Result, RowsAffected,
    Statement, ToSql, Tx, statement::compile,
};
use std::{
    fmt::{self, Debug},
    sync::Arc,
};

/// Multi row `INSERT`, every value is encoded when the statement is compiled.
#[derive(Clone)]
pub struct InsertBuilder {
    pub(crate) query: Query,
    pub(crate) values: Arc<[Arc<dyn EncodeDocument>]>,
}

impl Debug for InsertBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertBuilder")
            .field("query", &self.query)
            .field("values", &self.values.len())
            .finish()
    }
}

impl InsertBuilder {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            values: Arc::new([]),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A new builder with `values` appended.
    pub fn add<D: Document + Send + Sync + 'static>(
        &self,
        values: impl IntoIterator<Item = D>,
    ) -> Self {
        let mut values = values.into_iter().peekable();
        if values.peek().is_none() {
            return self.clone();
        }
        Self {
            query: self.query.clone(),
            values: self
                .values
                .iter()
                .cloned()
                .chain(values.map(|v| Arc::new(v) as Arc<dyn EncodeDocument>))
                .collect(),
        }
    }

    pub async fn exec<E: Executor>(&self, tx: &mut Tx<'_, E>) -> Result<RowsAffected> {
        tx.exec(self).await
    }
}

impl ToSql for InsertBuilder {
    fn to_sql(&self) -> Result<Statement> {
        if self.values.is_empty() {
            return Err(JdbError::invalid("nothing to insert").into());
        }
        let rows = self
            .values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                value
                    .encode(&self.query.kind)
                    .with_context(|| format!("value {i}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(compile(self.query.dialect, |out, args| {
            self.query
                .dialect
                .write_insert(out, args, &self.query.table, &rows)
        }))
    }
}
