use jdb_core::{Migrations, Revision, Value};

pub static MIGRATIONS: PostgresMigrations = PostgresMigrations {};

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
  numeric_key DOUBLE PRECISION,
  time_key TIMESTAMP WITH TIME ZONE,
  data JSONB,
  create_time TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT {timestamp},
  update_time TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT {timestamp},
  PRIMARY KEY (kind, id),
  FOREIGN KEY (parent_kind, parent_id) REFERENCES {table} (kind, id)
);
",
    ),
    Revision::new(
        2,
        "CREATE INDEX {namespace}_r{id} ON {table} (create_time NULLS FIRST);",
    ),
    Revision::new(
        3,
        "CREATE INDEX {namespace}_r{id} ON {table} (update_time NULLS FIRST);",
    ),
    Revision::new(
        4,
        "CREATE UNIQUE INDEX {namespace}_r{id} ON {table} (kind NULLS FIRST, unique_string_key NULLS FIRST);",
    ),
    Revision::new(
        5,
        "CREATE INDEX {namespace}_r{id} ON {table} (kind NULLS FIRST, string_key NULLS FIRST);",
    ),
    Revision::new(
        6,
        "CREATE INDEX {namespace}_r{id} ON {table} (kind NULLS FIRST, numeric_key NULLS FIRST);",
    ),
    Revision::new(
        7,
        "CREATE INDEX {namespace}_r{id} ON {table} (kind NULLS FIRST, time_key NULLS FIRST);",
    ),
    Revision::new(
        8,
        "CREATE INDEX {namespace}_r{id} ON {table} (kind NULLS FIRST, create_time NULLS FIRST);",
    ),
    Revision::new(
        9,
        "CREATE INDEX {namespace}_r{id} ON {table} (kind NULLS FIRST, update_time NULLS FIRST);",
    ),
    Revision::new(
        10,
        "CREATE INDEX {namespace}_r{id} ON {table} (kind NULLS FIRST, id NULLS FIRST, parent_kind NULLS FIRST);",
    ),
    Revision::new(
        11,
        "CREATE INDEX {namespace}_r{id} ON {table} (parent_kind NULLS FIRST, parent_id NULLS FIRST, kind NULLS FIRST, unique_string_key NULLS FIRST);",
    ),
    Revision::new(
        12,
        "CREATE INDEX {namespace}_r{id} ON {table} (parent_kind NULLS FIRST, parent_id NULLS FIRST, kind NULLS FIRST, string_key NULLS FIRST);",
    ),
    Revision::new(
        13,
        "CREATE INDEX {namespace}_r{id} ON {table} (parent_kind NULLS FIRST, parent_id NULLS FIRST, kind NULLS FIRST, numeric_key NULLS FIRST);",
    ),
    Revision::new(
        14,
        "CREATE INDEX {namespace}_r{id} ON {table} (parent_kind NULLS FIRST, parent_id NULLS FIRST, kind NULLS FIRST, time_key NULLS FIRST);",
    ),
    Revision::new(
        15,
        "CREATE INDEX {namespace}_r{id} ON {table} (parent_kind NULLS FIRST, parent_id NULLS FIRST, kind NULLS FIRST, create_time NULLS FIRST);",
    ),
    Revision::new(
        16,
        "CREATE INDEX {namespace}_r{id} ON {table} (parent_kind NULLS FIRST, parent_id NULLS FIRST, kind NULLS FIRST, update_time NULLS FIRST);",
    ),
];

#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresMigrations {}

impl Migrations for PostgresMigrations {
    fn revisions(&self) -> &'static [Revision] {
        &REVISIONS
    }

    fn write_table_exists(&self, out: &mut String, args: &mut Vec<Value>, table: &str) {
        out.push_str(
            "SELECT count(*) > 0 AS table_exists FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = ?",
        );
        args.push(table.into());
    }

    /// The `ID` is read as text.
    fn write_get_setting(&self, out: &mut String, args: &mut Vec<Value>, table: &str, name: &str) {
        out.push_str("SELECT data->>'ID' FROM ");
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
            " (kind, id, data) VALUES ('jdb', ?, ?) ON CONFLICT (kind, id) DO UPDATE SET data = ?, update_time = CURRENT_TIMESTAMP",
        );
        args.extend([Value::from(name), Value::from(data), Value::from(data)]);
    }
}
