use crate::{MIGRATIONS, NAME};
use jdb_core::{
    AsValue, BackendError, Context, DataSourceOptions, Dialect, ErrorType, JdbError, Migrations,
    PathStep, Result, Value, write_json_path,
};
use time::{
    OffsetDateTime, PrimitiveDateTime, format_description::BorrowedFormatItem,
    macros::format_description,
};

/// Current time as text, millisecond precision.
pub const TIMESTAMP: &str = "STRFTIME('%Y-%m-%d %H:%M:%f', 'NOW')";

/// Text layout produced by [`TIMESTAMP`].
pub const NOW_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]");

// Primary result codes, the extended codes carry them in the low byte.
const SQLITE_PERM: i64 = 3;
const SQLITE_BUSY: i64 = 5;
const SQLITE_LOCKED: i64 = 6;
const SQLITE_TOOBIG: i64 = 18;
const SQLITE_CONSTRAINT: i64 = 19;
const SQLITE_MISMATCH: i64 = 20;
const SQLITE_AUTH: i64 = 23;

#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDialect {}

impl SqliteDialect {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Dialect for SqliteDialect {
    fn as_dyn(&self) -> &dyn Dialect {
        self
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn timestamp_expression(&self) -> &'static str {
        TIMESTAMP
    }

    /// The `mode=ro` query parameter must agree with the read-only option.
    fn validate_data_source(&self, data_source: &str, options: &DataSourceOptions) -> Result<()> {
        let read_only = match data_source.find('?') {
            Some(position) if position >= 1 => {
                url::form_urlencoded::parse(data_source[position + 1..].as_bytes())
                    .any(|(key, value)| key == "mode" && value == "ro")
            }
            _ => false,
        };
        if options.read_only && !read_only {
            return Err(JdbError::invalid("expected mode=ro").into());
        }
        if !options.read_only && read_only {
            return Err(JdbError::invalid("unexpected mode=ro").into());
        }
        Ok(())
    }

    fn write_path(&self, out: &mut String, column: &str, steps: &[PathStep]) {
        out.push_str("json_extract(");
        out.push_str(column);
        out.push_str(", '");
        write_json_path(out, steps, r#"\""#);
        out.push_str("')");
    }

    fn parse_now(&self, value: Value) -> Result<OffsetDateTime> {
        if let Some(text) = value.as_text() {
            return PrimitiveDateTime::parse(text.trim(), NOW_FORMAT)
                .map(PrimitiveDateTime::assume_utc)
                .with_context(|| format!("Cannot parse `{text}` as the current time"));
        }
        OffsetDateTime::try_from_value(value)
    }

    fn error_type(&self, error: &BackendError) -> ErrorType {
        let Ok(code) = error.code.trim().parse::<i64>() else {
            return ErrorType::Unknown;
        };
        match code & 0xff {
            SQLITE_PERM => ErrorType::Permission,
            SQLITE_BUSY | SQLITE_LOCKED => ErrorType::Busy,
            SQLITE_CONSTRAINT => ErrorType::Integrity,
            SQLITE_MISMATCH | SQLITE_TOOBIG => ErrorType::Data,
            SQLITE_AUTH => ErrorType::Authorization,
            _ => ErrorType::Unknown,
        }
    }

    fn migrations(&self) -> Option<&dyn Migrations> {
        Some(&MIGRATIONS)
    }
}
