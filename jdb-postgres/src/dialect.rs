use crate::{MIGRATIONS, NAME};
use jdb_core::{BackendError, Dialect, ErrorType, Migrations, Order, PathStep, write_integer};

#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect {}

impl PostgresDialect {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Dialect for PostgresDialect {
    fn as_dyn(&self) -> &dyn Dialect {
        self
    }

    fn name(&self) -> &'static str {
        NAME
    }

    /// Numbers the `?` placeholders `$1`, `$2`, ... leaving the ones inside string literals.
    fn replace_placeholders(&self, sql: String) -> String {
        if !sql.contains('?') {
            return sql;
        }
        let mut out = String::with_capacity(sql.len() + 16);
        let mut quoted = false;
        let mut position = 0_u32;
        for c in sql.chars() {
            match c {
                '\'' => {
                    quoted = !quoted;
                    out.push(c);
                }
                '?' if !quoted => {
                    position += 1;
                    out.push('$');
                    write_integer!(out, position);
                }
                _ => out.push(c),
            }
        }
        out
    }

    /// `column#>>'{"key",0}'`, the value comes back as text.
    fn write_path(&self, out: &mut String, column: &str, steps: &[PathStep]) {
        out.push_str(column);
        out.push_str("#>>'{");
        for (i, step) in steps.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            match step {
                PathStep::Key(key) => {
                    out.push('"');
                    for c in key.chars() {
                        match c {
                            '"' => out.push_str(r#"\""#),
                            '\'' => out.push_str("''"),
                            _ => out.push(c),
                        }
                    }
                    out.push('"');
                }
                PathStep::Index(index) => write_integer!(out, *index),
            }
        }
        out.push_str("}'");
    }

    fn write_order(&self, out: &mut String, order: &Order) {
        self.write_field(out, &order.field);
        out.push_str(if order.desc {
            " DESC NULLS LAST"
        } else {
            " ASC NULLS FIRST"
        });
    }

    /// Classifies on the SQLSTATE class.
    fn error_type(&self, error: &BackendError) -> ErrorType {
        match error.code.get(..2) {
            Some("08") => ErrorType::Connection,
            Some("22") => ErrorType::Data,
            Some("23") => ErrorType::Integrity,
            Some("25") => ErrorType::Transaction,
            Some("28") => ErrorType::Authorization,
            _ => ErrorType::Unknown,
        }
    }

    fn migrations(&self) -> Option<&dyn Migrations> {
        Some(&MIGRATIONS)
    }
}
