#[cfg(test)]
mod tests {
    use jdb::{
        BackendError, Client, DatabaseError, ErrorType, Executor, GENERIC_DIALECT, ID, JdbError,
        Options, QueryResult, RowsAffected, Statement, Value, dialect, register_dialect,
        stream::{self, Stream, TryStreamExt},
    };
    use jdb_tests::{DataSources, MockExecutor, Person, execute_tests, init_logs, silent_logs};

    #[tokio::test]
    async fn generic() {
        init_logs();
        execute_tests(
            &GENERIC_DIALECT,
            DataSources {
                read_write: "generic://rw?require-read-only-false",
                read_only: "generic://ro?require-read-only-true",
            },
        )
        .await;
    }

    #[test]
    fn open() {
        let error = Client::open("generic", "", Options::default().table(""))
            .expect_err("The table name is required");
        assert_eq!(error.to_string(), "jdb: invalid table name");

        let error = Client::open("nope", "", Options::default()).expect_err("Not registered");
        assert_eq!(
            error.to_string(),
            r#"unknown dialect "nope" (forgot to register it?)"#
        );
        assert_eq!(
            error.downcast_ref::<JdbError>(),
            Some(&JdbError::UnknownDialect("nope".into()))
        );

        let error = Client::open(
            "generic",
            "generic://?require-read-only-true",
            Options::default(),
        )
        .expect_err("The data source wants a read-only client");
        assert_eq!(error.to_string(), "ReadOnly=false");
        assert!(
            Client::open(
                "generic",
                "generic://?require-read-only-false",
                Options::default().read_only(true),
            )
            .is_err()
        );

        let client = Client::open(
            "generic",
            "",
            Options::default().table("docs").read_only(true),
        )
        .expect("Could not open the client");
        assert_eq!(client.table(), "docs");
        assert!(client.read_only());
        assert_eq!(client.dialect().name(), "generic");
        assert_eq!(client.query("person").table(), "docs");
    }

    #[test]
    #[should_panic(expected = "duplicate dialect registration")]
    fn duplicate_registration() {
        register_dialect("generic", &GENERIC_DIALECT);
    }

    #[test]
    fn registered_dialects() {
        jdb_sqlite::register();
        jdb_postgres::register();
        jdb_mysql::register();
        for (name, data_source) in [
            ("sqlite", "file:test.db"),
            ("postgres", "postgres://jdb@localhost/jdb"),
            ("mysql", "jdb@tcp(localhost)/jdb?parseTime=true"),
        ] {
            let client = Client::open(name, data_source, Options::default())
                .expect("Could not open the client");
            assert_eq!(client.dialect().name(), name);
            assert_eq!(
                dialect(name).expect("Registered").name(),
                client.dialect().name()
            );
        }
    }

    #[tokio::test]
    async fn migrate() {
        let client = Client::with_dialect(&GENERIC_DIALECT, "", Options::default())
            .expect("Could not open the client");
        let mut executor = MockExecutor::new();
        let error = client
            .migrate(&mut executor)
            .await
            .expect_err("No migrations");
        assert_eq!(error.to_string(), "Dialect generic does not support migrations");
        assert!(executor.statements().is_empty());

        let client = Client::with_dialect(
            &jdb_sqlite::DIALECT,
            "file:test.db?mode=ro",
            Options::default().read_only(true),
        )
        .expect("Could not open the client");
        let error = client
            .migrate(&mut executor)
            .await
            .expect_err("Read-only clients do not migrate");
        assert_eq!(error.downcast_ref::<JdbError>(), Some(&JdbError::ReadOnlyMode));
        assert!(executor.statements().is_empty());
    }

    #[tokio::test]
    async fn rows() {
        let client = Client::with_dialect(&GENERIC_DIALECT, "", Options::default())
            .expect("Could not open the client");
        let mut executor = MockExecutor::new();
        executor
            .expect_query("SELECT id FROM jdb WHERE ((kind = ?))")
            .with_args(["person"])
            .will_return_rows(&["id"], vec![vec!["1".into()], vec!["2".into()]]);
        let select = client.query("person").select_columns([ID]);
        let mut tx = client.tx(&mut executor);
        let rows = tx
            .rows(&select)
            .try_collect::<Vec<_>>()
            .await
            .expect("Could not fetch the rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get_column("id"), Some(&Value::from("2")));
        executor.assert_met();
    }

    struct Batches(Vec<u64>);

    impl Executor for Batches {
        fn run(&mut self, _: Statement) -> impl Stream<Item = jdb::Result<QueryResult>> + Send {
            stream::iter(
                self.0
                    .clone()
                    .into_iter()
                    .map(|rows_affected| Ok(QueryResult::Affected(RowsAffected { rows_affected }))),
            )
        }
    }

    #[tokio::test]
    async fn rows_affected_sum() {
        let total = Batches(vec![2, 0, 3])
            .execute(Statement::new("DELETE FROM jdb", Vec::new()))
            .await
            .expect("Could not execute the statement");
        assert_eq!(total, RowsAffected { rows_affected: 5 });
        let none = Batches(Vec::new())
            .execute(Statement::new("DELETE FROM jdb", Vec::new()))
            .await
            .expect("Could not execute the statement");
        assert_eq!(none, RowsAffected::default());
    }

    #[tokio::test]
    async fn backend_errors() {
        let client =
            Client::with_dialect(&jdb_sqlite::DIALECT, "file:test.db", Options::default())
                .expect("Could not open the client");
        let mut executor = MockExecutor::new();
        executor
            .expect_exec("INSERT INTO jdb")
            .will_return_error(BackendError::new(
                "2067",
                "UNIQUE constraint failed: jdb.kind, jdb.id",
            ));
        let insert = client.query("person").insert([Person::new("1", "", "Ann", 31)]);
        let result;
        silent_logs! {
            result = client.tx(&mut executor).exec(&insert).await;
        }
        let error = result.expect_err("The row already exists");
        let error = error
            .downcast_ref::<DatabaseError>()
            .expect("Classified by the dialect");
        assert_eq!(error.error_type(), ErrorType::Integrity);
        assert_eq!(error.source.code, "2067");
        executor.assert_met();
    }
}
