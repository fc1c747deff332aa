#[cfg(test)]
mod tests {
    use jdb_core::{
        BackendError, Client, Condition, DataSourceOptions, Dialect, ErrorType, JdbError, Options,
        ToSql, Value,
    };
    use jdb_mysql::{DIALECT, register};
    use jdb_tests::{DataSources, execute_tests, init_logs};

    const DATA_SOURCE: &str = "jdb:secret@tcp(localhost:3306)/jdb?parseTime=true";

    #[tokio::test]
    async fn mysql() {
        init_logs();
        execute_tests(
            &DIALECT,
            DataSources {
                read_write: DATA_SOURCE,
                read_only: DATA_SOURCE,
            },
        )
        .await;
    }

    #[test]
    fn registered() {
        register();
        register();
        assert!(Client::open("mysql", DATA_SOURCE, Options::default()).is_ok());
    }

    #[test]
    fn data_source() {
        let options = DataSourceOptions::default();
        assert!(DIALECT.validate_data_source(DATA_SOURCE, &options).is_ok());
        assert!(
            DIALECT
                .validate_data_source("/jdb?charset=utf8mb4&parseTime=1", &options)
                .is_ok()
        );
        let error = DIALECT
            .validate_data_source("jdb@tcp(localhost)/jdb", &options)
            .expect_err("parseTime is missing");
        assert_eq!(
            error.downcast_ref::<JdbError>(),
            Some(&JdbError::invalid("parseTime is required"))
        );
        assert!(
            DIALECT
                .validate_data_source("jdb@tcp(localhost)/jdb?parseTime=false", &options)
                .is_err()
        );
        assert!(
            DIALECT
                .validate_data_source("jdb@tcp(localhost)/jdb?parseTime=maybe", &options)
                .is_err()
        );
        assert!(DIALECT.validate_data_source("jdb", &options).is_err());
    }

    #[test]
    fn path() {
        let client = Client::with_dialect(&DIALECT, DATA_SOURCE, Options::default().table("docs"))
            .expect("Could not open the client");
        let statement = client
            .query("person")
            .filter([Condition::eq(client.path([r#"a"b"#]).index(1), "x")])
            .count()
            .to_sql()
            .expect("Could not compile the count");
        assert_eq!(
            statement.sql,
            r#"SELECT count(*) AS count FROM docs WHERE ((kind = ?) AND (json_unquote(json_extract(data, '$."a\\"b"[1]')) = ?))"#
        );
        assert_eq!(statement.args, [Value::from("person"), Value::from("x")]);
    }

    #[test]
    fn errors() {
        let error_type = |code: &str| DIALECT.error_type(&BackendError::new(code, "failure"));
        assert_eq!(error_type("1205"), ErrorType::Busy);
        assert_eq!(error_type("1213"), ErrorType::Transaction);
        assert_eq!(error_type("1062"), ErrorType::Unknown);
    }

    #[test]
    fn migrations() {
        let migrations = DIALECT.migrations().expect("mysql has migrations");
        let revisions = migrations.revisions();
        assert_eq!(revisions.len(), 16);
        assert!(
            revisions[0]
                .render("docs", DIALECT.timestamp_expression())
                .contains("create_time DATETIME(4) NOT NULL DEFAULT NOW(4),")
        );
        let mut sql = String::new();
        let mut args = Vec::new();
        migrations.write_set_setting(&mut sql, &mut args, "docs", "revision", r#"{"ID":3}"#);
        assert_eq!(
            sql,
            "INSERT INTO docs (kind, id, data) VALUES ('jdb', ?, ?) ON DUPLICATE KEY UPDATE data = ?, update_time = NOW(4)"
        );
        assert_eq!(args.len(), 3);
    }
}
