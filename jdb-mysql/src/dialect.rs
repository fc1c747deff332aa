use crate::{MIGRATIONS, NAME};
use jdb_core::{
    AsValue, BackendError, Context, DataSourceOptions, Dialect, ErrorType, JdbError, Migrations,
    PathStep, Result, write_json_path,
};

/// Current time, the table columns keep four fractional digits.
pub const TIMESTAMP: &str = "NOW(4)";

const ER_LOCK_WAIT_TIMEOUT: u16 = 1205;
const ER_LOCK_DEADLOCK: u16 = 1213;

#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlDialect {}

impl MySqlDialect {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Dialect for MySqlDialect {
    fn as_dyn(&self) -> &dyn Dialect {
        self
    }

    fn name(&self) -> &'static str {
        NAME
    }

    fn timestamp_expression(&self) -> &'static str {
        TIMESTAMP
    }

    /// Data source in the `user:password@tcp(host:port)/database?params` form, times are
    /// only decoded by the driver when `parseTime` is enabled.
    fn validate_data_source(&self, data_source: &str, _options: &DataSourceOptions) -> Result<()> {
        let Some(slash) = data_source.rfind('/') else {
            return Err(JdbError::invalid(
                "invalid DSN: missing the slash separating the database name",
            )
            .into());
        };
        let database = &data_source[slash + 1..];
        let mut parse_time = false;
        if let Some(position) = database.find('?') {
            for (key, value) in url::form_urlencoded::parse(database[position + 1..].as_bytes()) {
                if key == "parseTime" {
                    parse_time = <bool as AsValue>::parse(&value)
                        .with_context(|| format!("invalid bool value: {value}"))?;
                }
            }
        }
        if !parse_time {
            return Err(JdbError::invalid("parseTime is required").into());
        }
        Ok(())
    }

    fn write_path(&self, out: &mut String, column: &str, steps: &[PathStep]) {
        out.push_str("json_unquote(json_extract(");
        out.push_str(column);
        out.push_str(", '");
        write_json_path(out, steps, r#"\\""#);
        out.push_str("'))");
    }

    fn error_type(&self, error: &BackendError) -> ErrorType {
        match error.code.trim().parse::<u16>() {
            Ok(ER_LOCK_WAIT_TIMEOUT) => ErrorType::Busy,
            Ok(ER_LOCK_DEADLOCK) => ErrorType::Transaction,
            _ => ErrorType::Unknown,
        }
    }

    fn migrations(&self) -> Option<&dyn Migrations> {
        Some(&MIGRATIONS)
    }
}
