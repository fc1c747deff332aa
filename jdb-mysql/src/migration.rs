use crate::TIMESTAMP;
use jdb_core::{Migrations, Revision, Value};

pub static MIGRATIONS: MySqlMigrations = MySqlMigrations {};

static REVISIONS: [Revision; 16] = [
    Revision::new(
        1,
        "
CREATE TABLE {table} (
  kind VARCHAR(64),
  id VARCHAR(64),
  parent_kind VARCHAR(64),
  parent_id VARCHAR(64),
  unique_string_key VARCHAR(255),
  string_key VARCHAR(255),
  numeric_key DOUBLE,
  time_key DATETIME(4),
  data JSON,
  create_time DATETIME(4) NOT NULL DEFAULT {timestamp},
  update_time DATETIME(4) NOT NULL DEFAULT {timestamp},
  PRIMARY KEY (kind, id),
  FOREIGN KEY (parent_kind, parent_id) REFERENCES {table} (kind, id)
);
",
    ),
    Revision::new(2, "CREATE INDEX {namespace}_r{id} ON {table} (create_time);"),
    Revision::new(3, "CREATE INDEX {namespace}_r{id} ON {table} (update_time);"),
    Revision::new(
        4,
        "CREATE UNIQUE INDEX {namespace}_r{id} ON {table} (kind, unique_string_key);",
    ),
    Revision::new(5, "CREATE INDEX {namespace}_r{id} ON {table} (kind, string_key);"),
    Revision::new(6, "CREATE INDEX {namespace}_r{id} ON {table} (kind, numeric_key);"),
    Revision::new(7, "CREATE INDEX {namespace}_r{id} ON {table} (kind, time_key);"),
    Revision::new(8, "CREATE INDEX {namespace}_r{id} ON {table} (kind, create_time);"),
    Revision::new(9, "CREATE INDEX {namespace}_r{id} ON {table} (kind, update_time);"),
    Revision::new(10, "CREATE INDEX {namespace}_r{id} ON {table} (kind, id, parent_kind);"),
    Revision::new(
        11,
        "CREATE INDEX {namespace}_r{id} ON {table} (parent_kind, parent_id, kind, unique_string_key);",
    ),
    Revision::new(
        12,
        "CREATE INDEX {namespace}_r{id} ON {table} (parent_kind, parent_id, kind, string_key);",
    ),
    Revision::new(
        13,
        "CREATE INDEX {namespace}_r{id} ON {table} (parent_kind, parent_id, kind, numeric_key);",
    ),
    Revision::new(
        14,
        "CREATE INDEX {namespace}_r{id} ON {table} (parent_kind, parent_id, kind, time_key);",
    ),
    Revision::new(
        15,
        "CREATE INDEX {namespace}_r{id} ON {table} (parent_kind, parent_id, kind, create_time);",
    ),
    Revision::new(
        16,
        "CREATE INDEX {namespace}_r{id} ON {table} (parent_kind, parent_id, kind, update_time);",
    ),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct MySqlMigrations {}

impl Migrations for MySqlMigrations {
    fn revisions(&self) -> &'static [Revision] {
        &REVISIONS
    }

    fn write_table_exists(&self, out: &mut String, args: &mut Vec<Value>, table: &str) {
        out.push_str(
            "SELECT count(*) > 0 AS table_exists FROM information_schema.tables \
             WHERE table_schema = database() AND table_name = ? LIMIT 1",
        );
        args.push(table.into());
    }

    fn write_get_setting(&self, out: &mut String, args: &mut Vec<Value>, table: &str, name: &str) {
        out.push_str("SELECT json_extract(data, '$.ID') FROM ");
        out.push_str(table);
        out.push_str(" WHERE kind = 'jdb' AND id = ? LIMIT 1");
        args.push(name.into());
    }

    fn write_set_setting(
        &self,
        out: &mut String,
        args: &mut Vec<Value>,
        table: &str,
        name: &str,
        data: &str,
    ) {
        out.push_str("INSERT INTO ");
        out.push_str(table);
        out.push_str(
            " (kind, id, data) VALUES ('jdb', ?, ?) ON DUPLICATE KEY UPDATE data = ?, update_time = ",
        );
        out.push_str(TIMESTAMP);
        args.extend([Value::from(name), Value::from(data), Value::from(data)]);
    }
}
