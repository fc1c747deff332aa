#[cfg(test)]
mod tests {
    use indoc::indoc;
    use jdb_core::{
        BackendError, Client, Condition, DataSourceOptions, Dialect, ErrorType, Options,
        PathField, ToSql, Value, WhereField, dialect,
    };
    use jdb_sqlite::{DIALECT, register};
    use jdb_tests::{DataSources, execute_tests, init_logs};
    use time::macros::datetime;

    #[tokio::test]
    async fn sqlite() {
        init_logs();
        execute_tests(
            &DIALECT,
            DataSources {
                read_write: "file:test.db?cache=shared&mode=rwc",
                read_only: "file:test.db?mode=ro",
            },
        )
        .await;
    }

    #[test]
    fn registered() {
        register();
        register();
        assert_eq!(dialect("sqlite").map(|v| v.name()).ok(), Some("sqlite"));
        assert!(Client::open("sqlite", "file:test.db", Options::default()).is_ok());
    }

    #[test]
    fn data_source() {
        let read_only = DataSourceOptions { read_only: true };
        let read_write = DataSourceOptions { read_only: false };
        assert!(DIALECT.validate_data_source("file:test.db", &read_write).is_ok());
        assert!(DIALECT.validate_data_source("file:test.db?mode=ro", &read_only).is_ok());
        assert_eq!(
            DIALECT
                .validate_data_source("file:test.db", &read_only)
                .map_err(|e| e.to_string()),
            Err("expected mode=ro".to_string())
        );
        assert_eq!(
            DIALECT
                .validate_data_source("file:test.db?_fk=1&mode=ro", &read_write)
                .map_err(|e| e.to_string()),
            Err("unexpected mode=ro".to_string())
        );
    }

    #[test]
    fn path() {
        let client = Client::with_dialect(&DIALECT, "file:test.db", Options::default())
            .expect("Could not open the client");
        let path = PathField::from_keys(["address", r#"say "hi""#]).index(2);
        let statement = client
            .query("person")
            .filter([Condition::eq(&path, "x")])
            .select()
            .order_by([path.desc()])
            .to_sql()
            .expect("Could not compile the select");
        assert_eq!(
            statement.sql,
            indoc! {r#"
                SELECT kind, id, parent_kind, parent_id, data, create_time, update_time FROM jdb WHERE ((kind = ?) AND (json_extract(data, '$."address"."say \"hi\""[2]') = ?)) ORDER BY json_extract(data, '$."address"."say \"hi\""[2]') DESC
            "#}
            .trim()
        );
        assert_eq!(statement.args, [Value::from("person"), Value::from("x")]);
    }

    #[test]
    fn now() {
        assert_eq!(
            DIALECT
                .parse_now("2006-01-02 15:04:05.000".into())
                .expect("Could not parse the sqlite time"),
            datetime!(2006-01-02 15:04:05.000 UTC)
        );
        assert!(DIALECT.parse_now("yesterday".into()).is_err());
    }

    #[test]
    fn errors() {
        let error_type = |code: &str| DIALECT.error_type(&BackendError::new(code, "failure"));
        assert_eq!(error_type("3"), ErrorType::Permission);
        assert_eq!(error_type("5"), ErrorType::Busy);
        assert_eq!(error_type("6"), ErrorType::Busy);
        // SQLITE_CONSTRAINT_PRIMARYKEY
        assert_eq!(error_type("1555"), ErrorType::Integrity);
        assert_eq!(error_type("18"), ErrorType::Data);
        assert_eq!(error_type("20"), ErrorType::Data);
        assert_eq!(error_type("23"), ErrorType::Authorization);
        assert_eq!(error_type("1"), ErrorType::Unknown);
        assert_eq!(error_type("oops"), ErrorType::Unknown);
    }

    #[test]
    fn migrations() {
        let migrations = DIALECT.migrations().expect("sqlite has migrations");
        let revisions = migrations.revisions();
        assert_eq!(revisions.len(), 16);
        assert_eq!(
            revisions[0].render("docs", DIALECT.timestamp_expression()),
            indoc! {"
                CREATE TABLE docs (
                  kind VARCHAR(64),
                  id VARCHAR(64),
                  parent_kind VARCHAR(64),
                  parent_id VARCHAR(64),
                  unique_string_key VARCHAR(255),
                  string_key VARCHAR(255),
                  numeric_key REAL,
                  time_key DATETIME,
                  data JSON,
                  create_time DATETIME NOT NULL DEFAULT(STRFTIME('%Y-%m-%d %H:%M:%f', 'NOW')),
                  update_time DATETIME NOT NULL DEFAULT(STRFTIME('%Y-%m-%d %H:%M:%f', 'NOW')),
                  PRIMARY KEY (kind, id),
                  FOREIGN KEY (parent_kind, parent_id) REFERENCES docs (kind, id)
                );"}
        );
        assert_eq!(
            revisions[3].render("docs", DIALECT.timestamp_expression()),
            "CREATE UNIQUE INDEX docs_r4 ON docs (kind, unique_string_key);"
        );
    }
}
