use crate::{Address, DataSources, MockExecutor, Person};
use jdb::{
    BackendError, Client, Condition, DatabaseError, Dialect, ID, JdbError, Options, STRING_KEY,
    Value, WhereField,
};
use time::macros::datetime;

const SELECT_LABELS: [&str; 7] = [
    "kind",
    "id",
    "parent_kind",
    "parent_id",
    "data",
    "create_time",
    "update_time",
];

fn client(dialect: &'static dyn Dialect, data_source: &str, read_only: bool) -> Client {
    Client::with_dialect(
        dialect,
        data_source,
        Options::default().read_only(read_only),
    )
    .expect("Could not open the client")
}

fn person_row(person: &Person) -> Vec<Value> {
    vec![
        "person".into(),
        person.id.as_str().into(),
        Value::Null,
        Value::Null,
        person.data().into(),
        person.create_time.into(),
        person.update_time.into(),
    ]
}

pub(crate) async fn insert(dialect: &'static dyn Dialect, sources: DataSources<'_>) {
    let client = client(dialect, sources.read_write, false);
    let mut executor = MockExecutor::new();
    let ann = Person::new("1", "ann@example.com", "Ann", 31);
    let bob = Person::new("2", "", "Bob", 45);
    executor
        .expect_exec("INSERT INTO jdb (kind, id, parent_kind, parent_id, unique_string_key, string_key, numeric_key, time_key, data) VALUES")
        .with_args([
            Value::from("person"),
            "1".into(),
            Value::Null,
            Value::Null,
            Value::Null,
            "ann@example.com".into(),
            Value::Null,
            Value::Null,
            ann.data().into(),
            "person".into(),
            "2".into(),
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
            bob.data().into(),
        ])
        .will_return_affected(2);
    let address = Address {
        id: "a1".into(),
        parent_kind: "person".into(),
        parent_id: "1".into(),
        street_name: "Main".into(),
        position: 1,
        ..Default::default()
    };
    executor
        .expect_exec("INSERT INTO jdb")
        .with_args([
            Value::from("address"),
            "a1".into(),
            "person".into(),
            "1".into(),
            "1/1".into(),
            Value::Null,
            Value::Float64(Some(1.0)),
            Value::Null,
            r#"{"position":1,"streetName":"Main"}"#.into(),
        ])
        .will_return_affected(1);

    let mut tx = client.tx(&mut executor);
    let affected = client
        .query("person")
        .insert([ann, bob])
        .exec(&mut tx)
        .await
        .expect("Could not insert the people");
    assert_eq!(affected.rows_affected, 2);
    let affected = client
        .query("address")
        .insert([address.clone()])
        .exec(&mut tx)
        .await
        .expect("Could not insert the address");
    assert_eq!(affected.rows_affected, 1);

    let orphan = Address {
        parent_kind: String::new(),
        ..address
    };
    let error = client
        .query("address")
        .insert([orphan])
        .exec(&mut tx)
        .await
        .expect_err("An address without parent kind must be rejected");
    assert_eq!(format!("{error:#}"), "value 0: parent kind not defined");

    let error = client
        .query("person")
        .insert([Person::new("", "", "Carl", 20)])
        .exec(&mut tx)
        .await
        .expect_err("A person without id must be rejected");
    assert_eq!(format!("{error:#}"), "value 0: id not defined");
    executor.assert_met();
    assert_eq!(executor.statements().len(), 2);
}

pub(crate) async fn get(dialect: &'static dyn Dialect, sources: DataSources<'_>) {
    let client = client(dialect, sources.read_write, false);
    let mut executor = MockExecutor::new();
    let created = datetime!(2024-03-01 10:15:30.250 UTC);
    let ann = Person {
        create_time: Some(created),
        update_time: Some(created),
        ..Person::new("1", "ann@example.com", "Ann", 31)
    };
    executor
        .expect_query(
            "SELECT kind, id, parent_kind, parent_id, data, create_time, update_time FROM jdb WHERE",
        )
        .with_args(["person", "1"])
        .will_return_rows(&SELECT_LABELS, vec![person_row(&ann)]);
    executor
        .expect_query("FROM jdb WHERE")
        .with_args(["person", "404"]);

    let mut tx = client.tx(&mut executor);
    let person: Person = client
        .query("person")
        .get(["1"])
        .select()
        .first(&mut tx)
        .await
        .expect("Could not get the person");
    assert_eq!(person, ann);
    let error = client
        .query("person")
        .get(["404"])
        .select()
        .first::<Person, _>(&mut tx)
        .await
        .expect_err("The person should not exist");
    assert_eq!(error.downcast_ref::<JdbError>(), Some(&JdbError::NotFound));
    executor.assert_met();
}

pub(crate) async fn filter(dialect: &'static dyn Dialect, sources: DataSources<'_>) {
    let client = client(dialect, sources.read_write, false);
    let mut executor = MockExecutor::new();
    let people = [
        Person::new("1", "ann@example.com", "Ann", 31),
        Person::new("2", "bob@example.com", "Bob", 45),
    ];
    executor
        .expect_query(" LIMIT 10 OFFSET 5")
        .with_args(["person", "%@example.com"])
        .will_return_rows(&SELECT_LABELS, people.iter().map(person_row).collect());
    executor
        .expect_query("(1 != 1)")
        .with_args(["person"]);

    let mut tx = client.tx(&mut executor);
    let base = client
        .query("person")
        .filter([Condition::like(STRING_KEY, "%@example.com")]);
    let select = base.select().order_by([ID.asc()]).limit(10).offset(5);
    let result: Vec<Person> = select.all(&mut tx).await.expect("Could not list the people");
    assert_eq!(result, people);
    let result: Vec<Person> = client
        .query("person")
        .filter([Condition::is_in(ID, Vec::<Value>::new())])
        .select()
        .all(&mut tx)
        .await
        .expect("Could not list nobody");
    assert!(result.is_empty());
    assert_eq!(base.conditions().len(), 1);
    executor.assert_met();
}

pub(crate) async fn update(dialect: &'static dyn Dialect, sources: DataSources<'_>) {
    let client = client(dialect, sources.read_write, false);
    let mut executor = MockExecutor::new();
    let ann = Person::new("1", "ann@example.com", "Ann", 32);
    executor
        .expect_exec("UPDATE jdb SET parent_kind = ")
        .with_args([
            Value::Null,
            Value::Null,
            Value::Null,
            "ann@example.com".into(),
            Value::Null,
            Value::Null,
            ann.data().into(),
            "person".into(),
            "1".into(),
        ])
        .will_return_affected(1);
    executor
        .expect_exec("(1 != 1)")
        .will_return_affected(0);

    let mut tx = client.tx(&mut executor);
    let affected = client
        .query("person")
        .update(ann)
        .exec(&mut tx)
        .await
        .expect("Could not update the person");
    assert_eq!(affected.rows_affected, 1);
    let affected = client
        .query("person")
        .update(Person::new("", "", "Nobody", 0))
        .exec(&mut tx)
        .await
        .expect("An update without id must still compile");
    assert_eq!(affected.rows_affected, 0);
    executor.assert_met();
}

pub(crate) async fn delete(dialect: &'static dyn Dialect, sources: DataSources<'_>) {
    let client = client(dialect, sources.read_write, false);
    let mut executor = MockExecutor::new();
    executor
        .expect_exec("DELETE FROM jdb WHERE")
        .with_args(["person", "1", "2"])
        .will_return_affected(2);
    executor
        .expect_exec("DELETE FROM jdb WHERE")
        .with_args(["person"])
        .will_return_affected(7);

    let mut tx = client.tx(&mut executor);
    let affected = client
        .query("person")
        .delete(["1", "2"])
        .exec(&mut tx)
        .await
        .expect("Could not delete the people");
    assert_eq!(affected.rows_affected, 2);
    let affected = client
        .query("person")
        .delete(Vec::<String>::new())
        .exec(&mut tx)
        .await
        .expect("Could not delete everyone");
    assert_eq!(affected.rows_affected, 7);
    executor.assert_met();
}

pub(crate) async fn count(dialect: &'static dyn Dialect, sources: DataSources<'_>) {
    let client = client(dialect, sources.read_write, false);
    let mut executor = MockExecutor::new();
    executor
        .expect_query("SELECT count(*) AS count FROM jdb WHERE")
        .with_args(["person"])
        .will_return_rows(&["count"], vec![vec![Value::Int64(Some(2))]]);
    executor
        .expect_query("SELECT kind, id")
        .will_return_rows(&SELECT_LABELS, vec![person_row(&Person::new("1", "", "", 0))]);

    let mut tx = client.tx(&mut executor);
    let total = client
        .query("person")
        .count()
        .count(&mut tx)
        .await
        .expect("Could not count the people");
    assert_eq!(total, 2);
    let error = client
        .query("person")
        .select()
        .first_value::<String, _>(&mut tx)
        .await
        .expect_err("A scalar needs a single column");
    assert!(error.to_string().contains("exactly one selected column"));
    executor.assert_met();
}

pub(crate) async fn read_only(dialect: &'static dyn Dialect, sources: DataSources<'_>) {
    let client = client(dialect, sources.read_only, true);
    assert!(client.read_only());
    let mut executor = MockExecutor::new();
    executor
        .expect_query("SELECT id FROM jdb WHERE")
        .will_return_rows(&["id"], vec![vec!["1".into()]]);

    let mut tx = client.tx(&mut executor);
    let error = client
        .query("person")
        .insert([Person::new("1", "", "Ann", 31)])
        .exec(&mut tx)
        .await
        .expect_err("Insert must fail in read-only mode");
    assert_eq!(error.downcast_ref::<JdbError>(), Some(&JdbError::ReadOnlyMode));
    let error = client
        .query("person")
        .delete(["1"])
        .exec(&mut tx)
        .await
        .expect_err("Delete must fail in read-only mode");
    assert_eq!(error.to_string(), "jdb: read-only mode");
    let id: String = client
        .query("person")
        .select_columns([ID])
        .first_value(&mut tx)
        .await
        .expect("Reading is allowed in read-only mode");
    assert_eq!(id, "1");
    executor.assert_met();
    assert_eq!(executor.statements().len(), 1);
}

pub(crate) async fn errors(dialect: &'static dyn Dialect, sources: DataSources<'_>) {
    let client = client(dialect, sources.read_write, false);
    let mut executor = MockExecutor::new();
    executor
        .expect_exec("DELETE FROM jdb")
        .will_return_error(BackendError::new("99999", "boom"));

    let mut tx = client.tx(&mut executor);
    let error = client
        .query("person")
        .delete(["1"])
        .exec(&mut tx)
        .await
        .expect_err("The backend error must surface");
    let error = error
        .downcast_ref::<DatabaseError>()
        .expect("Backend errors are classified");
    assert_eq!(error.source.message, "boom");
    let error = client
        .query("person")
        .delete(["1"])
        .exec(&mut tx)
        .await
        .expect_err("The script is over");
    assert!(error.downcast_ref::<DatabaseError>().is_none());
    executor.assert_met();
}

pub(crate) async fn now(dialect: &'static dyn Dialect, sources: DataSources<'_>) {
    let client = client(dialect, sources.read_write, false);
    let mut executor = MockExecutor::new();
    let now = datetime!(2025-01-02 03:04:05.678 UTC);
    let mut expected = String::from("SELECT ");
    expected.push_str(dialect.timestamp_expression());
    expected.push_str(" AS now");
    executor
        .expect_query(&expected)
        .will_return_rows(&["now"], vec![vec![now.into()]]);
    let result = client
        .tx(&mut executor)
        .now()
        .await
        .expect("Could not read the database time");
    assert_eq!(result, now);
    executor.assert_met();
}

pub(crate) async fn migrate(dialect: &'static dyn Dialect, sources: DataSources<'_>) {
    let client = client(dialect, sources.read_write, false);
    let revisions = dialect
        .migrations()
        .map(|v| v.revisions().len())
        .unwrap_or_default();
    assert_eq!(revisions, 16);

    let mut executor = MockExecutor::new();
    executor
        .expect_query("")
        .will_return_rows(&["table_exists"], vec![vec![false.into()]]);
    executor.expect_exec("CREATE TABLE jdb");
    executor.expect_exec("'jdb'");
    for _ in 2..=revisions {
        executor.expect_exec("CREATE ");
        executor.expect_exec("'jdb'");
    }
    executor.expect_exec("'jdb'");
    client
        .migrate(&mut executor)
        .await
        .expect("Could not create the table");
    executor.assert_met();
    let statements = executor.statements();
    assert_eq!(
        statements[2].args[..2],
        [Value::from("revision"), Value::from(r#"{"ID":1}"#)]
    );
    assert!(statements[3].sql.contains("jdb_r2"));
    assert_eq!(
        statements[statements.len() - 1].args[..2],
        [Value::from("version"), Value::from(r#"{"ID":1}"#)]
    );

    let mut executor = MockExecutor::new();
    executor
        .expect_query("")
        .will_return_rows(&["table_exists"], vec![vec![true.into()]]);
    executor
        .expect_query("'jdb'")
        .will_return_rows(&["id"], vec![vec![Value::Int64(Some(16))]]);
    executor
        .expect_query("'jdb'")
        .will_return_rows(&["id"], vec![vec![Value::Int64(Some(1))]]);
    executor.expect_exec("'jdb'");
    client
        .migrate(&mut executor)
        .await
        .expect("An up to date table only records the version");
    executor.assert_met();

    let mut executor = MockExecutor::new();
    executor
        .expect_query("")
        .will_return_rows(&["table_exists"], vec![vec![true.into()]]);
    executor
        .expect_query("'jdb'")
        .will_return_rows(&["id"], vec![vec![Value::Int64(Some(16))]]);
    executor
        .expect_query("'jdb'")
        .will_return_rows(&["id"], vec![vec![Value::Int64(Some(2))]]);
    let error = client
        .migrate(&mut executor)
        .await
        .expect_err("A newer database must be refused");
    assert_eq!(
        error.to_string(),
        "database version 2 is newer than library version 1"
    );
    executor.assert_met();
}
