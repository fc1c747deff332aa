use crate::{
    AsValue, Context, Dialect, Error, Executor, Result, Statement, Value, statement::compile,
    stream::StreamExt,
};
use std::pin::pin;

/// Schema version written by this library.
pub const VERSION: u32 = 1;

pub const REVISION_SETTING: &str = "revision";
pub const VERSION_SETTING: &str = "version";

/// One step of the schema.
///
/// The text may reference `{table}`, `{namespace}`, `{id}` and `{timestamp}`, they are
/// substituted by [`Revision::render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision {
    pub id: u32,
    pub sql: &'static str,
}

impl Revision {
    pub const fn new(id: u32, sql: &'static str) -> Self {
        Self { id, sql }
    }

    pub fn render(&self, table: &str, timestamp: &str) -> String {
        let mut id = itoa::Buffer::new();
        self.sql
            .trim()
            .replace("{table}", table)
            .replace("{namespace}", table)
            .replace("{id}", id.format(self.id))
            .replace("{timestamp}", timestamp)
    }
}

/// The statements a backend needs to create and evolve the document table.
///
/// Settings are rows of kind `jdb` in the document table itself whose payload is `{"ID":n}`.
pub trait Migrations: Send + Sync {
    /// Schema version the revisions were written for.
    fn version(&self) -> u32 {
        VERSION
    }

    fn revisions(&self) -> &'static [Revision];

    /// Query returning one row with one column, true when `table` exists.
    fn write_table_exists(&self, out: &mut String, args: &mut Vec<Value>, table: &str);

    /// Query returning the `ID` of the setting `name`.
    fn write_get_setting(&self, out: &mut String, args: &mut Vec<Value>, table: &str, name: &str);

    /// Statement storing `data` as the payload of the setting `name`.
    fn write_set_setting(
        &self,
        out: &mut String,
        args: &mut Vec<Value>,
        table: &str,
        name: &str,
        data: &str,
    );
}

async fn first_value<E: Executor>(
    dialect: &dyn Dialect,
    executor: &mut E,
    statement: Statement,
) -> Result<Option<Value>> {
    log::debug!("{statement}");
    let mut stream = pin!(executor.fetch(statement));
    match stream.next().await {
        Some(row) => {
            let row = row.map_err(|e| dialect.map_error(e))?;
            Ok(row.values.into_vec().into_iter().next())
        }
        None => Ok(None),
    }
}

async fn get_setting<E: Executor>(
    dialect: &dyn Dialect,
    migrations: &dyn Migrations,
    executor: &mut E,
    table: &str,
    name: &str,
) -> Result<u32> {
    let query = compile(dialect, |out, args| {
        migrations.write_get_setting(out, args, table, name)
    });
    let value = first_value(dialect, executor, query)
        .await
        .with_context(|| format!("Cannot read the {name} of table {table}"))?;
    match value {
        Some(value) if !value.is_null() => u32::try_from_value(value)
            .with_context(|| format!("Invalid {name} stored in table {table}")),
        _ => Ok(0),
    }
}

async fn set_setting<E: Executor>(
    dialect: &dyn Dialect,
    migrations: &dyn Migrations,
    executor: &mut E,
    table: &str,
    name: &str,
    id: u32,
) -> Result<()> {
    let data = format!(r#"{{"ID":{id}}}"#);
    let query = compile(dialect, |out, args| {
        migrations.write_set_setting(out, args, table, name, &data)
    });
    log::debug!("{query}");
    executor
        .execute(query)
        .await
        .map_err(|e| dialect.map_error(e))
        .with_context(|| format!("Cannot store the {name} of table {table}"))?;
    Ok(())
}

/// Brings `table` to the latest revision of `dialect`.
///
/// Revisions already recorded in the table are skipped, each applied one is recorded right
/// after it succeeds. A database written by a newer library version is refused.
pub async fn migrate<E: Executor>(dialect: &dyn Dialect, table: &str, executor: &mut E) -> Result<()> {
    let Some(migrations) = dialect.migrations() else {
        return Err(Error::msg(format!(
            "Dialect {} does not support migrations",
            dialect.name()
        )));
    };
    if migrations.version() != VERSION {
        return Err(Error::msg(format!(
            "dialect version {} does not match jdb version {VERSION}",
            migrations.version()
        )));
    }
    let exists = first_value(
        dialect,
        executor,
        compile(dialect, |out, args| {
            migrations.write_table_exists(out, args, table)
        }),
    )
    .await
    .with_context(|| format!("Cannot check whether table {table} exists"))?
    .map(bool::try_from_value)
    .transpose()?
    .unwrap_or(false);
    let current = if exists {
        get_setting(dialect, migrations, executor, table, REVISION_SETTING).await?
    } else {
        0
    };
    if current > 0 {
        let version = get_setting(dialect, migrations, executor, table, VERSION_SETTING).await?;
        if version > VERSION {
            log::warn!("Table {table} was written by schema version {version}");
            return Err(Error::msg(format!(
                "database version {version} is newer than library version {VERSION}"
            )));
        }
    }
    for (i, revision) in migrations.revisions().iter().enumerate() {
        let id = i as u32 + 1;
        if revision.id != id {
            return Err(Error::msg(format!(
                "invalid revision ID: {} != {id}",
                revision.id
            )));
        }
        if id <= current {
            continue;
        }
        let query = Statement::new(
            revision.render(table, dialect.timestamp_expression()),
            Vec::new(),
        );
        log::debug!("{query}");
        executor
            .execute(query)
            .await
            .map_err(|e| dialect.map_error(e))
            .with_context(|| format!("Cannot apply revision {id} to table {table}"))?;
        set_setting(dialect, migrations, executor, table, REVISION_SETTING, id).await?;
    }
    set_setting(dialect, migrations, executor, table, VERSION_SETTING, VERSION).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render() {
        let revision = Revision::new(
            3,
            "\n  CREATE INDEX {namespace}_r{id} ON {table} (kind, create_time);\n",
        );
        assert_eq!(
            revision.render("docs", "CURRENT_TIMESTAMP"),
            "CREATE INDEX docs_r3 ON docs (kind, create_time);"
        );
        let revision = Revision::new(1, "DEFAULT({timestamp})");
        assert_eq!(revision.render("t", "NOW(4)"), "DEFAULT(NOW(4))");
    }
}
