use crate::{
    AsValue, Document, Executor, Order, Result, RowLabeled, SelectItem, Statement, ToSql, Tx,
    WhereBuilder, statement::compile, stream::Stream,
};
use std::sync::Arc;

/// `SELECT <columns> FROM <table> WHERE ... [ORDER BY ...] [LIMIT n] [OFFSET n]`
#[derive(Debug, Clone)]
pub struct SelectBuilder {
    pub(crate) filter: WhereBuilder,
    pub(crate) columns: Arc<[SelectItem]>,
    pub(crate) order: Arc<[Order]>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
}

impl SelectBuilder {
    pub fn new(filter: WhereBuilder, columns: Arc<[SelectItem]>) -> Self {
        Self {
            filter,
            columns,
            order: Arc::new([]),
            limit: None,
            offset: None,
        }
    }

    pub fn columns(&self) -> &[SelectItem] {
        &self.columns
    }
    pub fn ordering(&self) -> &[Order] {
        &self.order
    }
    pub fn get_limit(&self) -> Option<u64> {
        self.limit
    }
    pub fn get_offset(&self) -> Option<u64> {
        self.offset
    }

    pub fn limit(&self, limit: u64) -> Self {
        Self {
            limit: Some(limit),
            ..self.clone()
        }
    }

    pub fn offset(&self, offset: u64) -> Self {
        Self {
            offset: Some(offset),
            ..self.clone()
        }
    }

    /// Appends to the current ordering.
    pub fn order_by(&self, order: impl IntoIterator<Item = Order>) -> Self {
        let mut order = order.into_iter().peekable();
        if order.peek().is_none() {
            return self.clone();
        }
        Self {
            order: self.order.iter().cloned().chain(order).collect(),
            ..self.clone()
        }
    }

    pub fn rows<E: Executor>(
        &self,
        tx: &mut Tx<'_, E>,
    ) -> impl Stream<Item = Result<RowLabeled>> + Send {
        tx.rows(self)
    }

    pub async fn first<D: Document, E: Executor>(&self, tx: &mut Tx<'_, E>) -> Result<D> {
        tx.first(self).await
    }

    pub async fn all<D: Document, E: Executor>(&self, tx: &mut Tx<'_, E>) -> Result<Vec<D>> {
        tx.all(self).await
    }

    pub async fn first_value<T: AsValue, E: Executor>(&self, tx: &mut Tx<'_, E>) -> Result<T> {
        tx.first_value(self).await
    }

    pub async fn count<E: Executor>(&self, tx: &mut Tx<'_, E>) -> Result<u64> {
        tx.count(self).await
    }
}

impl ToSql for SelectBuilder {
    fn to_sql(&self) -> Result<Statement> {
        let query = &self.filter.query;
        Ok(compile(query.dialect, |out, args| {
            query.dialect.write_select(
                out,
                args,
                &query.table,
                &query.kind,
                &self.columns,
                &self.filter.filter,
                &self.order,
                self.limit,
                self.offset,
            )
        }))
    }
}
