mod delete;
mod insert;
mod select;
mod update;
mod where_builder;

pub use delete::*;
pub use insert::*;
pub use select::*;
pub use update::*;
pub use where_builder::*;

use crate::{Dialect, Statement, Value};

/// Runs a writer and turns its output into a [`Statement`] in the dialect placeholder syntax.
pub(crate) fn compile(
    dialect: &dyn Dialect,
    write: impl FnOnce(&mut String, &mut Vec<Value>),
) -> Statement {
    let mut sql = String::with_capacity(128);
    let mut args = Vec::new();
    write(&mut sql, &mut args);
    Statement::new(dialect.replace_placeholders(sql), args)
}
