use crate::{Dialect, Field, Statement, Value, WhereField};

/// A boolean predicate over the document table.
///
/// Conditions are plain values: building one has no side effects and compiling the same tree
/// twice yields the same text and the same arguments. A NULL right hand side (`Value::Null` or
/// any typed NULL) is rendered without a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    True,
    False,
    Eq(Field, Value),
    NotEq(Field, Value),
    In(Field, Vec<Value>),
    NotIn(Field, Vec<Value>),
    Like(Field, Value),
    NotLike(Field, Value),
    Gt(Field, Value),
    Lt(Field, Value),
    Gte(Field, Value),
    Lte(Field, Value),
    And(Vec<Condition>),
    Or(Vec<Condition>),
}

macro_rules! binary_constructor {
    ($(#[$meta:meta])* $name:ident, $variant:ident) => {
        $(#[$meta])*
        pub fn $name(field: impl WhereField, value: impl Into<Value>) -> Self {
            Condition::$variant(field.into_field(), value.into())
        }
    };
}

impl Condition {
    binary_constructor!(
        /// `(field = ?)`, or `(field IS NULL)` for a NULL value.
        eq,
        Eq
    );
    binary_constructor!(
        /// `(field != ?)`, or `(field IS NOT NULL)` for a NULL value.
        not_eq,
        NotEq
    );
    binary_constructor!(like, Like);
    binary_constructor!(not_like, NotLike);
    binary_constructor!(gt, Gt);
    binary_constructor!(lt, Lt);
    binary_constructor!(gte, Gte);
    binary_constructor!(lte, Lte);

    /// Membership, NULL entries match rows where the field is NULL.
    pub fn is_in<V: Into<Value>>(
        field: impl WhereField,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Condition::In(field.into_field(), values.into_iter().map(Into::into).collect())
    }

    pub fn not_in<V: Into<Value>>(
        field: impl WhereField,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Condition::NotIn(field.into_field(), values.into_iter().map(Into::into).collect())
    }

    /// Conjunction, the empty one is true.
    pub fn and(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::And(conditions.into_iter().collect())
    }

    /// Disjunction, the empty one is true as well.
    pub fn or(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Condition::Or(conditions.into_iter().collect())
    }

    /// Compiles the condition alone, placeholders are left as `?`.
    pub fn to_sql(&self, dialect: &dyn Dialect) -> Statement {
        let mut sql = String::with_capacity(64);
        let mut args = Vec::new();
        dialect.write_condition(&mut sql, &mut args, self);
        Statement { sql, args }
    }
}
