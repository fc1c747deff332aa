use crate::{Executor, Result, RowsAffected, Statement, ToSql, Tx, WhereBuilder, statement::compile};

#[derive(Debug, Clone)]
pub struct DeleteBuilder {
    pub(crate) filter: WhereBuilder,
}

impl DeleteBuilder {
    pub fn new(filter: WhereBuilder) -> Self {
        Self { filter }
    }

    pub async fn exec<E: Executor>(&self, tx: &mut Tx<'_, E>) -> Result<RowsAffected> {
        tx.exec(self).await
    }
}

impl ToSql for DeleteBuilder {
    fn to_sql(&self) -> Result<Statement> {
        let query = &self.filter.query;
        Ok(compile(query.dialect, |out, args| {
            query
                .dialect
                .write_delete(out, args, &query.table, &query.kind, &self.filter.filter)
        }))
    }
}
