use crate::{
    Condition, DEFAULT_SELECT, DeleteBuilder, EncodeDocument, Query, SelectBuilder, SelectField,
    SelectItem, UpdateBuilder,
};
use std::sync::Arc;

/// Filter shared by every statement on a kind.
///
/// The kind condition is implicit and always rendered first, the conditions added here are
/// joined to it with `AND`.
#[derive(Debug, Clone)]
pub struct WhereBuilder {
    pub(crate) query: Query,
    pub(crate) filter: Arc<[Condition]>,
}

impl WhereBuilder {
    pub fn new(query: Query) -> Self {
        Self {
            query,
            filter: Arc::new([]),
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Conditions added on top of the kind one.
    pub fn conditions(&self) -> &[Condition] {
        &self.filter
    }

    /// A new builder with `conditions` appended.
    pub fn filter(&self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        let mut conditions = conditions.into_iter().peekable();
        if conditions.peek().is_none() {
            return self.clone();
        }
        Self {
            query: self.query.clone(),
            filter: self.filter.iter().cloned().chain(conditions).collect(),
        }
    }

    pub fn select(&self) -> SelectBuilder {
        SelectBuilder::new(self.clone(), DEFAULT_SELECT.into())
    }

    /// Selects `columns`, an empty list selects the default ones.
    pub fn select_columns<S: SelectField>(
        &self,
        columns: impl IntoIterator<Item = S>,
    ) -> SelectBuilder {
        let columns: Arc<[SelectItem]> = columns
            .into_iter()
            .map(SelectField::into_select_item)
            .collect();
        if columns.is_empty() {
            return self.select();
        }
        SelectBuilder::new(self.clone(), columns)
    }

    pub fn count(&self) -> SelectBuilder {
        SelectBuilder::new(self.clone(), Arc::new([SelectItem::Count]))
    }

    pub fn delete(&self) -> DeleteBuilder {
        DeleteBuilder::new(self.clone())
    }

    pub(crate) fn update(&self, value: Arc<dyn EncodeDocument>) -> UpdateBuilder {
        UpdateBuilder::new(self.clone(), value)
    }
}
