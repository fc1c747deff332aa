#[cfg(test)]
mod tests {
    use indoc::indoc;
    use jdb::{
        Condition, DATA, GENERIC_DIALECT, ID, KIND, NUMERIC_KEY, PathField, Query, SelectItem,
        ToSql, UPDATE_TIME, Value, WhereField,
    };
    use jdb_tests::{Address, Person};

    fn query() -> Query {
        Query::new(&GENERIC_DIALECT, "jdb", "test")
    }

    fn sql(builder: &impl ToSql) -> String {
        builder.to_sql().expect("Could not compile the statement").sql
    }

    #[test]
    fn select_default() {
        let statement = query()
            .select()
            .to_sql()
            .expect("Could not compile the select");
        assert_eq!(
            statement.sql,
            "SELECT kind, id, parent_kind, parent_id, data, create_time, update_time FROM jdb WHERE ((kind = ?))"
        );
        assert_eq!(statement.args, [Value::from("test")]);
    }

    #[test]
    fn select_columns_order_and_paging() {
        let select = query()
            .filter([Condition::gt(NUMERIC_KEY, 3.5_f64)])
            .select_columns([ID.into(), DATA.into(), SelectItem::Count])
            .order_by([PathField::from_keys(["rank"]).desc(), ID.asc()])
            .limit(10)
            .offset(20);
        let statement = select.to_sql().expect("Could not compile the select");
        assert_eq!(
            statement.sql,
            indoc! {"
                SELECT id, data, count(*) AS count FROM jdb WHERE ((kind = ?) AND (numeric_key > ?)) ORDER BY data->'$.rank' DESC, id ASC LIMIT 10 OFFSET 20
            "}
            .trim()
        );
        assert_eq!(statement.args, [Value::from("test"), Value::Float64(Some(3.5))]);
        assert_eq!(
            sql(&query().select_columns(Vec::<SelectItem>::new())),
            sql(&query().select())
        );
        assert_eq!(
            sql(&query().select().limit(0)),
            "SELECT kind, id, parent_kind, parent_id, data, create_time, update_time FROM jdb WHERE ((kind = ?)) LIMIT 0"
        );
    }

    #[test]
    fn count() {
        let statement = query()
            .filter([Condition::eq(KIND, "ignored")])
            .count()
            .to_sql()
            .expect("Could not compile the count");
        assert_eq!(
            statement.sql,
            "SELECT count(*) AS count FROM jdb WHERE ((kind = ?) AND (kind = ?))"
        );
        assert_eq!(statement.args.len(), 2);
    }

    #[test]
    fn builders_are_values() {
        let base = query().select();
        let ten = base.limit(10);
        let twenty = ten.limit(20);
        assert_eq!(base.get_limit(), None);
        assert_eq!(ten.get_limit(), Some(10));
        assert_eq!(twenty.get_limit(), Some(20));

        let ordered = ten.order_by([UPDATE_TIME.desc()]);
        assert!(ten.ordering().is_empty());
        assert_eq!(ordered.ordering().len(), 1);
        assert_eq!(ordered.order_by([]).ordering().len(), 1);

        let filter = query().filter([Condition::eq(ID, "1")]);
        let narrower = filter.filter([Condition::eq(NUMERIC_KEY, 1_i64)]);
        assert_eq!(filter.conditions().len(), 1);
        assert_eq!(narrower.conditions().len(), 2);
        assert_eq!(sql(&filter.select()), sql(&filter.select()));

        let insert = query().insert([Person::new("1", "", "Ann", 31)]);
        let more = insert.add([Person::new("2", "", "Bob", 45)]);
        assert_eq!(insert.len(), 1);
        assert_eq!(more.len(), 2);
    }

    #[test]
    fn get() {
        assert_eq!(
            sql(&query().get(Vec::<String>::new()).select_columns([ID])),
            "SELECT id FROM jdb WHERE ((kind = ?))"
        );
        let statement = query()
            .get(["1"])
            .select_columns([ID])
            .to_sql()
            .expect("Could not compile the select");
        assert_eq!(statement.sql, "SELECT id FROM jdb WHERE ((kind = ?) AND (id = ?))");
        assert_eq!(statement.args, [Value::from("test"), Value::from("1")]);
        assert_eq!(
            sql(&query().get(["1", "2", "3"]).select_columns([ID])),
            "SELECT id FROM jdb WHERE ((kind = ?) AND (id IN (?, ?, ?)))"
        );
    }

    #[test]
    fn delete() {
        let statement = query()
            .delete(["1", "2"])
            .to_sql()
            .expect("Could not compile the delete");
        assert_eq!(
            statement.sql,
            "DELETE FROM jdb WHERE ((kind = ?) AND (id IN (?, ?)))"
        );
        assert_eq!(
            statement.args,
            [Value::from("test"), Value::from("1"), Value::from("2")]
        );
        assert_eq!(
            sql(&query()
                .filter([Condition::like(ID, "tmp-%")])
                .delete()),
            "DELETE FROM jdb WHERE ((kind = ?) AND (id LIKE ?))"
        );
    }

    #[test]
    fn insert() {
        let statement = query()
            .insert([
                Person::new("1", "ann@example.com", "Ann", 31),
                Person::new("2", "", "Bob", 45),
            ])
            .to_sql()
            .expect("Could not compile the insert");
        assert_eq!(
            statement.sql,
            indoc! {"
                INSERT INTO jdb (kind, id, parent_kind, parent_id, unique_string_key, string_key, numeric_key, time_key, data) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?), (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "}
            .trim()
        );
        assert_eq!(statement.args.len(), 18);
        assert_eq!(statement.args[0], Value::from("test"));
        assert_eq!(statement.args[5], Value::from("ann@example.com"));
        assert_eq!(statement.args[14], Value::Null);
    }

    #[test]
    fn insert_errors() {
        let error = query()
            .insert([Person::new("1", "", "Ann", 31), Person::new("", "", "Bob", 45)])
            .to_sql()
            .expect_err("The second person has no id");
        assert_eq!(format!("{error:#}"), "value 1: id not defined");
        let error = query()
            .insert(Vec::<Person>::new())
            .to_sql()
            .expect_err("Nothing to insert");
        assert_eq!(error.to_string(), "nothing to insert");
    }

    #[test]
    fn update() {
        let statement = query()
            .update(Person::new("1", "", "Ann", 32))
            .to_sql()
            .expect("Could not compile the update");
        assert_eq!(
            statement.sql,
            indoc! {"
                UPDATE jdb SET parent_kind = ?, parent_id = ?, unique_string_key = ?, string_key = ?, numeric_key = ?, time_key = ?, data = ?, update_time = CURRENT_TIMESTAMP WHERE ((kind = ?) AND (id = ?))
            "}
            .trim()
        );
        assert_eq!(
            statement.args[6..],
            [
                Value::from(r#"{"age":32,"email":"","name":"Ann"}"#),
                Value::from("test"),
                Value::from("1"),
            ]
        );
    }

    #[test]
    fn update_matching_nothing() {
        let other = Address {
            kind: "other".into(),
            id: "a1".into(),
            ..Default::default()
        };
        let update = query().update(other);
        assert_eq!(update.conditions(), [Condition::False]);
        let statement = update.to_sql().expect("A foreign kind still compiles");
        assert!(statement.sql.ends_with("WHERE ((kind = ?) AND (1 != 1))"));
        assert_eq!(statement.args.last(), Some(&Value::from("test")));

        let update = query().update(Person::new("", "", "Nobody", 0));
        assert_eq!(update.conditions(), [Condition::False]);
        assert!(update.to_sql().is_ok());

        let same = Address {
            kind: "test".into(),
            id: "a1".into(),
            ..Default::default()
        };
        assert_eq!(
            query().update(same).conditions(),
            [Condition::eq(ID, "a1")]
        );
    }
}
