#[cfg(test)]
mod tests {
    use indoc::indoc;
    use jdb_core::{
        BackendError, Client, Condition, Dialect, ErrorType, ID, NUMERIC_KEY, Options, ToSql,
        Value, WhereField,
    };
    use jdb_postgres::{DIALECT, register};
    use jdb_tests::{DataSources, Person, execute_tests, init_logs};

    fn client() -> Client {
        Client::with_dialect(
            &DIALECT,
            "postgres://jdb@localhost/jdb",
            Options::default(),
        )
        .expect("Could not open the client")
    }

    #[tokio::test]
    async fn postgres() {
        init_logs();
        execute_tests(
            &DIALECT,
            DataSources {
                read_write: "postgres://jdb@localhost/jdb",
                read_only: "postgres://jdb@localhost/jdb",
            },
        )
        .await;
    }

    #[test]
    fn registered() {
        register();
        register();
        let client = Client::open("postgres", "postgres://jdb@localhost/jdb", Options::default())
            .expect("The dialect is registered");
        assert_eq!(client.dialect().name(), "postgres");
    }

    #[test]
    fn delete() {
        let statement = client()
            .query("kind")
            .delete(["1", "2"])
            .to_sql()
            .expect("Could not compile the delete");
        assert_eq!(
            statement.sql,
            "DELETE FROM jdb WHERE ((kind = $1) AND (id IN ($2, $3)))"
        );
        assert_eq!(statement.args, [Value::from("kind"), "1".into(), "2".into()]);
    }

    #[test]
    fn select() {
        let client = client();
        let path = client.path(["tags", "it's"]).index(0);
        let statement = client
            .query("person")
            .filter([
                Condition::or([
                    Condition::eq(&path, "a?"),
                    Condition::gte(NUMERIC_KEY, 10.5_f64),
                ]),
                Condition::not_in(ID, [Value::Null, "x".into()]),
            ])
            .select()
            .order_by([NUMERIC_KEY.desc(), ID.asc()])
            .limit(0)
            .to_sql()
            .expect("Could not compile the select");
        assert_eq!(
            statement.sql,
            indoc! {r#"
                SELECT kind, id, parent_kind, parent_id, data, create_time, update_time FROM jdb WHERE ((kind = $1) AND ((data#>>'{"tags","it''s",0}' = $2) OR (numeric_key >= $3)) AND (id NOT IN ($4))) ORDER BY numeric_key DESC NULLS LAST, id ASC NULLS FIRST LIMIT 0
            "#}
            .trim()
        );
        assert_eq!(
            statement.args,
            [Value::from("person"), "a?".into(), 10.5_f64.into(), "x".into()]
        );
    }

    #[test]
    fn placeholders_in_literals() {
        assert_eq!(
            DIALECT.replace_placeholders("SELECT '?', 'it''s ?', ? FROM t WHERE a = ?".into()),
            "SELECT '?', 'it''s ?', $1 FROM t WHERE a = $2"
        );
        assert_eq!(DIALECT.replace_placeholders("SELECT 1".into()), "SELECT 1");
    }

    #[test]
    fn update() {
        let statement = client()
            .query("person")
            .update(Person::new("1", "", "Ann", 31))
            .to_sql()
            .expect("Could not compile the update");
        assert_eq!(
            statement.sql,
            indoc! {"
                UPDATE jdb SET parent_kind = $1, parent_id = $2, unique_string_key = $3, string_key = $4, numeric_key = $5, time_key = $6, data = $7, update_time = CURRENT_TIMESTAMP WHERE ((kind = $8) AND (id = $9))
            "}
            .trim()
        );
        assert_eq!(statement.args.len(), 9);
    }

    #[test]
    fn errors() {
        let error_type = |code: &str| DIALECT.error_type(&BackendError::new(code, "failure"));
        assert_eq!(error_type("08006"), ErrorType::Connection);
        assert_eq!(error_type("22P02"), ErrorType::Data);
        assert_eq!(error_type("23505"), ErrorType::Integrity);
        assert_eq!(error_type("25P02"), ErrorType::Transaction);
        assert_eq!(error_type("28P01"), ErrorType::Authorization);
        assert_eq!(error_type("42601"), ErrorType::Unknown);
        assert_eq!(error_type(""), ErrorType::Unknown);
    }

    #[test]
    fn migrations() {
        let migrations = DIALECT.migrations().expect("postgres has migrations");
        let revisions = migrations.revisions();
        assert_eq!(revisions.len(), 16);
        assert!(
            revisions[0]
                .render("docs", DIALECT.timestamp_expression())
                .contains("create_time TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT CURRENT_TIMESTAMP,")
        );
        assert_eq!(
            revisions[15].render("docs", DIALECT.timestamp_expression()),
            "CREATE INDEX docs_r16 ON docs (parent_kind NULLS FIRST, parent_id NULLS FIRST, kind NULLS FIRST, update_time NULLS FIRST);"
        );
    }
}
