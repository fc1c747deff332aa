use crate::{
    EncodeDocument, Executor, Result, RowsAffected, Statement, ToSql, Tx, WhereBuilder,
    statement::compile,
};
use std::{
    fmt::{self, Debug},
    sync::Arc,
};

/// `UPDATE` replacing every column of the matched document but its identity and create time.
#[derive(Clone)]
pub struct UpdateBuilder {
    pub(crate) filter: WhereBuilder,
    pub(crate) value: Arc<dyn EncodeDocument>,
}

impl Debug for UpdateBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateBuilder")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

impl UpdateBuilder {
    pub fn new(filter: WhereBuilder, value: Arc<dyn EncodeDocument>) -> Self {
        Self { filter, value }
    }

    pub fn conditions(&self) -> &[crate::Condition] {
        self.filter.conditions()
    }

    pub async fn exec<E: Executor>(&self, tx: &mut Tx<'_, E>) -> Result<RowsAffected> {
        tx.exec(self).await
    }
}

impl ToSql for UpdateBuilder {
    fn to_sql(&self) -> Result<Statement> {
        let query = &self.filter.query;
        let row = self.value.encode_update(&query.kind)?;
        Ok(compile(query.dialect, |out, args| {
            query.dialect.write_update(
                out,
                args,
                &query.table,
                &query.kind,
                &row,
                &self.filter.filter,
            )
        }))
    }
}
