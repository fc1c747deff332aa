use crate::{
    AsValue, BackendError, Column, Condition, DatabaseError, Error, ErrorType, Field, JdbError,
    Migrations, Order, PathStep, Result, Row, SelectItem, Value, possibly_parenthesized,
    separated_by, write_escaped,
};
use std::{
    collections::HashMap,
    sync::{LazyLock, PoisonError, RwLock},
};
use time::OffsetDateTime;

pub const TRUE_CONDITION: &str = "(1 = 1)";
pub const FALSE_CONDITION: &str = "(1 != 1)";

/// Column names of the insert statement, in argument order.
pub const INSERT_COLUMNS: &str = "kind, id, parent_kind, parent_id, unique_string_key, string_key, numeric_key, time_key, data";

/// Options a data source name is checked against.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DataSourceOptions {
    pub read_only: bool,
}

/// Everything that differs between database backends.
///
/// The default methods render the portable part of every statement, a backend overrides only
/// what its SQL flavor does differently: path extraction, ordering, placeholders, the current
/// timestamp, data source checks, error classification and the migration statements.
/// Statements are written with `?` placeholders, [`Dialect::replace_placeholders`] runs once
/// on the complete text.
pub trait Dialect: Send + Sync {
    fn as_dyn(&self) -> &dyn Dialect;

    /// Name under which the dialect is registered.
    fn name(&self) -> &'static str;

    /// SQL expression evaluating to the current time.
    fn timestamp_expression(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    /// Checks the data source name is consistent with the client options.
    fn validate_data_source(&self, _data_source: &str, _options: &DataSourceOptions) -> Result<()> {
        Ok(())
    }

    /// Rewrites the `?` placeholders into the backend syntax.
    fn replace_placeholders(&self, sql: String) -> String {
        sql
    }

    /// Render the extraction of a nested value from `column`.
    fn write_path(&self, out: &mut String, column: &str, steps: &[PathStep]) {
        out.push_str(column);
        out.push_str("->'$");
        for step in steps {
            match step {
                PathStep::Key(key) => {
                    out.push('.');
                    write_escaped(out, key, '\'', "''");
                }
                PathStep::Index(index) => {
                    out.push('[');
                    crate::write_integer!(out, *index);
                    out.push(']');
                }
            }
        }
        out.push('\'');
    }

    fn write_field(&self, out: &mut String, field: &Field) {
        match field {
            Field::Column(column) => out.push_str(column.name()),
            Field::Path(path) => self.write_path(out, Column::Data.name(), path.steps()),
        }
    }

    fn write_order(&self, out: &mut String, order: &Order) {
        self.write_field(out, &order.field);
        out.push_str(if order.desc { " DESC" } else { " ASC" });
    }

    fn write_select_item(&self, out: &mut String, item: &SelectItem) {
        match item {
            SelectItem::Column(column) => out.push_str(column.name()),
            SelectItem::Count => out.push_str("count(*) AS count"),
        }
    }

    /// `(field <operator> ?)`, a NULL value is written inline.
    fn write_comparison(
        &self,
        out: &mut String,
        args: &mut Vec<Value>,
        field: &Field,
        operator: &str,
        value: &Value,
    ) {
        out.push('(');
        self.write_field(out, field);
        out.push(' ');
        out.push_str(operator);
        if value.is_null() {
            out.push_str(" NULL)");
        } else {
            out.push_str(" ?)");
            args.push(value.clone());
        }
    }

    fn write_is_null(&self, out: &mut String, field: &Field, negated: bool) {
        out.push('(');
        self.write_field(out, field);
        out.push_str(if negated { " IS NOT NULL)" } else { " IS NULL)" });
    }

    fn write_list(
        &self,
        out: &mut String,
        args: &mut Vec<Value>,
        field: &Field,
        operator: &str,
        values: &[&Value],
    ) {
        out.push('(');
        self.write_field(out, field);
        out.push(' ');
        out.push_str(operator);
        out.push_str(" (");
        separated_by(out, values.iter(), |out, _| out.push('?'), ", ");
        out.push_str("))");
        args.extend(values.iter().map(|v| (*v).clone()));
    }

    /// Render a condition tree.
    ///
    /// Membership against a list holding NULL also matches (or excludes) the NULL rows, an empty
    /// list is false for `In` and true for `NotIn`.
    fn write_condition(&self, out: &mut String, args: &mut Vec<Value>, condition: &Condition) {
        match condition {
            Condition::True => out.push_str(TRUE_CONDITION),
            Condition::False => out.push_str(FALSE_CONDITION),
            Condition::Eq(field, value) if value.is_null() => self.write_is_null(out, field, false),
            Condition::NotEq(field, value) if value.is_null() => {
                self.write_is_null(out, field, true)
            }
            Condition::Eq(field, value) => self.write_comparison(out, args, field, "=", value),
            Condition::NotEq(field, value) => self.write_comparison(out, args, field, "!=", value),
            Condition::Like(field, value) => self.write_comparison(out, args, field, "LIKE", value),
            Condition::NotLike(field, value) => {
                self.write_comparison(out, args, field, "NOT LIKE", value)
            }
            Condition::Gt(field, value) => self.write_comparison(out, args, field, ">", value),
            Condition::Lt(field, value) => self.write_comparison(out, args, field, "<", value),
            Condition::Gte(field, value) => self.write_comparison(out, args, field, ">=", value),
            Condition::Lte(field, value) => self.write_comparison(out, args, field, "<=", value),
            Condition::In(field, values) => {
                let (nulls, values): (Vec<&Value>, Vec<&Value>) =
                    values.iter().partition(|v| v.is_null());
                let has_null = !nulls.is_empty();
                if values.is_empty() {
                    if has_null {
                        self.write_is_null(out, field, false);
                    } else {
                        out.push_str(FALSE_CONDITION);
                    }
                    return;
                }
                possibly_parenthesized!(out, has_null, {
                    if has_null {
                        self.write_is_null(out, field, false);
                        out.push_str(" OR ");
                    }
                    self.write_list(out, args, field, "IN", &values);
                });
            }
            Condition::NotIn(field, values) => {
                let (nulls, values): (Vec<&Value>, Vec<&Value>) =
                    values.iter().partition(|v| v.is_null());
                let has_null = !nulls.is_empty();
                if values.is_empty() {
                    if has_null {
                        self.write_is_null(out, field, true);
                    } else {
                        out.push_str(TRUE_CONDITION);
                    }
                    return;
                }
                possibly_parenthesized!(out, !has_null, {
                    if !has_null {
                        self.write_is_null(out, field, false);
                        out.push_str(" OR ");
                    }
                    self.write_list(out, args, field, "NOT IN", &values);
                });
            }
            Condition::And(conditions) => self.write_conjunction(out, args, conditions, " AND "),
            Condition::Or(conditions) => self.write_conjunction(out, args, conditions, " OR "),
        }
    }

    fn write_conjunction(
        &self,
        out: &mut String,
        args: &mut Vec<Value>,
        conditions: &[Condition],
        separator: &str,
    ) {
        if conditions.is_empty() {
            out.push_str(TRUE_CONDITION);
            return;
        }
        out.push('(');
        separated_by(
            out,
            conditions,
            |out, condition| self.write_condition(out, args, condition),
            separator,
        );
        out.push(')');
    }

    /// `WHERE ((kind = ?) AND ...)`, the kind filter always comes first.
    fn write_where(&self, out: &mut String, args: &mut Vec<Value>, kind: &str, filter: &[Condition]) {
        out.push_str("WHERE (");
        self.write_condition(out, args, &Condition::Eq(Field::Column(Column::Kind), kind.into()));
        for condition in filter {
            out.push_str(" AND ");
            self.write_condition(out, args, condition);
        }
        out.push(')');
    }

    #[allow(clippy::too_many_arguments)]
    fn write_select(
        &self,
        out: &mut String,
        args: &mut Vec<Value>,
        table: &str,
        kind: &str,
        columns: &[SelectItem],
        filter: &[Condition],
        order: &[Order],
        limit: Option<u64>,
        offset: Option<u64>,
    ) {
        out.reserve(128 + columns.len() * 16);
        out.push_str("SELECT ");
        separated_by(out, columns, |out, item| self.write_select_item(out, item), ", ");
        out.push_str(" FROM ");
        out.push_str(table);
        out.push(' ');
        self.write_where(out, args, kind, filter);
        if !order.is_empty() {
            out.push_str(" ORDER BY ");
            separated_by(out, order, |out, order| self.write_order(out, order), ", ");
        }
        if let Some(limit) = limit {
            out.push_str(" LIMIT ");
            crate::write_integer!(out, limit);
        }
        if let Some(offset) = offset {
            out.push_str(" OFFSET ");
            crate::write_integer!(out, offset);
        }
    }

    /// Multi row insert, one parenthesized group of placeholders per row.
    fn write_insert(&self, out: &mut String, args: &mut Vec<Value>, table: &str, rows: &[Row]) {
        out.reserve(128 + rows.len() * 32);
        out.push_str("INSERT INTO ");
        out.push_str(table);
        out.push_str(" (");
        out.push_str(INSERT_COLUMNS);
        out.push_str(") VALUES");
        separated_by(
            out,
            rows,
            |out, row| {
                out.push_str(" (?, ?, ?, ?, ?, ?, ?, ?, ?)");
                args.extend(row.insert_args());
            },
            ",",
        );
    }

    fn write_update(
        &self,
        out: &mut String,
        args: &mut Vec<Value>,
        table: &str,
        kind: &str,
        row: &Row,
        filter: &[Condition],
    ) {
        out.push_str("UPDATE ");
        out.push_str(table);
        out.push_str(
            " SET parent_kind = ?, parent_id = ?, unique_string_key = ?, string_key = ?, \
             numeric_key = ?, time_key = ?, data = ?, update_time = ",
        );
        args.extend(row.update_args());
        out.push_str(self.timestamp_expression());
        out.push(' ');
        self.write_where(out, args, kind, filter);
    }

    fn write_delete(
        &self,
        out: &mut String,
        args: &mut Vec<Value>,
        table: &str,
        kind: &str,
        filter: &[Condition],
    ) {
        out.push_str("DELETE FROM ");
        out.push_str(table);
        out.push(' ');
        self.write_where(out, args, kind, filter);
    }

    fn write_now(&self, out: &mut String) {
        out.push_str("SELECT ");
        out.push_str(self.timestamp_expression());
        out.push_str(" AS now");
    }

    /// Converts the value returned by the query of [`Dialect::write_now`].
    fn parse_now(&self, value: Value) -> Result<OffsetDateTime> {
        OffsetDateTime::try_from_value(value)
    }

    /// Classifies a backend failure.
    fn error_type(&self, _error: &BackendError) -> ErrorType {
        ErrorType::Unknown
    }

    /// Wraps backend failures into [`DatabaseError`], other errors are returned unchanged.
    fn map_error(&self, error: Error) -> Error {
        match error.downcast::<BackendError>() {
            Ok(source) => DatabaseError {
                error_type: self.error_type(&source),
                source,
            }
            .into(),
            Err(error) => error,
        }
    }

    /// Schema migrations of the backend, `None` when the dialect cannot create its table.
    fn migrations(&self) -> Option<&dyn Migrations> {
        None
    }
}

/// Portable fallback, also used to exercise the builders without a backend.
///
/// Its data source check looks for the `require-read-only-true` and `require-read-only-false`
/// markers so tests can assert the validation path.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

pub static GENERIC_DIALECT: GenericDialect = GenericDialect;

impl Dialect for GenericDialect {
    fn as_dyn(&self) -> &dyn Dialect {
        self
    }

    fn name(&self) -> &'static str {
        "generic"
    }

    fn validate_data_source(&self, data_source: &str, options: &DataSourceOptions) -> Result<()> {
        if data_source.contains("require-read-only-true") && !options.read_only {
            return Err(JdbError::invalid("ReadOnly=false").into());
        }
        if data_source.contains("require-read-only-false") && options.read_only {
            return Err(JdbError::invalid("ReadOnly=true").into());
        }
        Ok(())
    }
}

static DIALECTS: LazyLock<RwLock<HashMap<&'static str, &'static dyn Dialect>>> =
    LazyLock::new(|| {
        let mut dialects = HashMap::<&'static str, &'static dyn Dialect>::new();
        dialects.insert(GENERIC_DIALECT.name(), &GENERIC_DIALECT);
        RwLock::new(dialects)
    });

/// Makes a dialect available to [`dialect`] and [`crate::Client::open`].
///
/// # Panics
/// When a dialect with the same name is already registered.
pub fn register_dialect(name: &'static str, dialect: &'static dyn Dialect) {
    let mut dialects = DIALECTS.write().unwrap_or_else(PoisonError::into_inner);
    if dialects.contains_key(name) {
        panic!("duplicate dialect registration {name}");
    }
    log::debug!("Registered dialect {name}");
    dialects.insert(name, dialect);
}

/// Looks up a registered dialect.
pub fn dialect(name: &str) -> Result<&'static dyn Dialect> {
    DIALECTS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .copied()
        .ok_or_else(|| JdbError::UnknownDialect(name.to_owned()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ID, NUMERIC_KEY, PathField, WhereField};

    fn render(condition: Condition) -> (String, Vec<Value>) {
        let mut out = String::new();
        let mut args = Vec::new();
        GENERIC_DIALECT.write_condition(&mut out, &mut args, &condition);
        (out, args)
    }

    #[test]
    fn membership_with_nulls() {
        assert_eq!(render(Condition::is_in(ID, Vec::<Value>::new())).0, "(1 != 1)");
        assert_eq!(render(Condition::is_in(ID, [Value::Null])).0, "(id IS NULL)");
        assert_eq!(
            render(Condition::is_in(ID, [Value::from("a"), Value::Null, Value::from("b")])),
            (
                "((id IS NULL) OR (id IN (?, ?)))".to_string(),
                vec![Value::from("a"), Value::from("b")]
            )
        );
        assert_eq!(render(Condition::not_in(ID, Vec::<Value>::new())).0, "(1 = 1)");
        assert_eq!(render(Condition::not_in(ID, [Value::Null])).0, "(id IS NOT NULL)");
        assert_eq!(
            render(Condition::not_in(ID, ["a"])).0,
            "((id IS NULL) OR (id NOT IN (?)))"
        );
        assert_eq!(
            render(Condition::not_in(ID, [Value::from("a"), Value::Null])).0,
            "(id NOT IN (?))"
        );
    }

    #[test]
    fn generic_path() {
        let mut out = String::new();
        let path = PathField::from_keys(["a", "it's"]).index(2);
        GENERIC_DIALECT.write_field(&mut out, &path.into_field());
        assert_eq!(out, "data->'$.a.it''s[2]'");
    }

    #[test]
    fn null_comparison() {
        assert_eq!(
            render(Condition::gt(NUMERIC_KEY, Value::Float64(None))),
            ("(numeric_key > NULL)".to_string(), vec![])
        );
    }

    #[test]
    fn registry() {
        assert_eq!(dialect("generic").map(|v| v.name()).ok(), Some("generic"));
        let error = dialect("nope").err().map(|e| e.to_string());
        assert_eq!(
            error.as_deref(),
            Some("unknown dialect \"nope\" (forgot to register it?)")
        );
    }
}
