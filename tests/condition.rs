#[cfg(test)]
mod tests {
    use jdb::{
        CREATE_TIME, Condition, GENERIC_DIALECT, ID, NUMERIC_KEY, PARENT_ID, PathField,
        STRING_KEY, Statement, TIME_KEY, Value,
    };
    use time::macros::datetime;

    fn compile(condition: &Condition) -> Statement {
        condition.to_sql(&GENERIC_DIALECT)
    }

    #[test]
    fn equality() {
        let statement = compile(&Condition::eq(ID, "a"));
        assert_eq!(statement.sql, "(id = ?)");
        assert_eq!(statement.args, [Value::from("a")]);

        let statement = compile(&Condition::eq(ID, Value::Null));
        assert_eq!(statement.sql, "(id IS NULL)");
        assert!(statement.args.is_empty());

        let statement = compile(&Condition::not_eq(PARENT_ID, Option::<String>::None));
        assert_eq!(statement.sql, "(parent_id IS NOT NULL)");
        assert!(statement.args.is_empty());

        let statement = compile(&Condition::not_eq(NUMERIC_KEY, 4_i64));
        assert_eq!(statement.sql, "(numeric_key != ?)");
        assert_eq!(statement.args, [Value::Int64(Some(4))]);
    }

    #[test]
    fn comparisons_with_null() {
        assert_eq!(
            compile(&Condition::like(STRING_KEY, Value::Null)).sql,
            "(string_key LIKE NULL)"
        );
        assert_eq!(
            compile(&Condition::not_like(STRING_KEY, Value::Varchar(None))).sql,
            "(string_key NOT LIKE NULL)"
        );
        assert_eq!(compile(&Condition::lt(NUMERIC_KEY, Value::Null)).sql, "(numeric_key < NULL)");
        assert_eq!(compile(&Condition::gte(TIME_KEY, Value::Null)).sql, "(time_key >= NULL)");
        assert_eq!(compile(&Condition::lte(TIME_KEY, Value::Null)).sql, "(time_key <= NULL)");
    }

    #[test]
    fn constants() {
        assert_eq!(compile(&Condition::True).sql, "(1 = 1)");
        assert_eq!(compile(&Condition::False).sql, "(1 != 1)");
        assert_eq!(compile(&Condition::and([])).sql, "(1 = 1)");
        assert_eq!(compile(&Condition::or([])).sql, "(1 = 1)");
        assert_eq!(
            compile(&Condition::is_in(ID, Vec::<Value>::new())),
            compile(&Condition::False)
        );
        assert_eq!(
            compile(&Condition::not_in(ID, Vec::<Value>::new())),
            compile(&Condition::True)
        );
    }

    #[test]
    fn membership() {
        let statement = compile(&Condition::is_in(ID, ["a", "b"]));
        assert_eq!(statement.sql, "(id IN (?, ?))");
        assert_eq!(statement.args, [Value::from("a"), Value::from("b")]);

        let statement = compile(&Condition::is_in(
            ID,
            [Value::Null, Value::from("a"), Value::from("b")],
        ));
        assert_eq!(statement.sql, "((id IS NULL) OR (id IN (?, ?)))");
        assert_eq!(statement.args, [Value::from("a"), Value::from("b")]);

        assert_eq!(
            compile(&Condition::is_in(ID, [Value::Null])),
            compile(&Condition::eq(ID, Value::Null))
        );
        assert_eq!(
            compile(&Condition::not_in(ID, [Value::Null])),
            compile(&Condition::not_eq(ID, Value::Null))
        );

        let statement = compile(&Condition::not_in(ID, ["a"]));
        assert_eq!(statement.sql, "((id IS NULL) OR (id NOT IN (?)))");
        assert_eq!(statement.args, [Value::from("a")]);

        let statement = compile(&Condition::not_in(ID, [Value::from("a"), Value::Null]));
        assert_eq!(statement.sql, "(id NOT IN (?))");
        assert_eq!(statement.args, [Value::from("a")]);
    }

    #[test]
    fn nesting_keeps_argument_order() {
        let since = datetime!(2024-01-01 00:00 UTC);
        let condition = Condition::and([
            Condition::or([
                Condition::eq(STRING_KEY, "x"),
                Condition::is_in(ID, [Value::from("1"), Value::Null, Value::from("2")]),
            ]),
            Condition::gt(CREATE_TIME, since),
            Condition::eq(PathField::from_keys(["a"]).index(0), 7_i32),
        ]);
        let statement = compile(&condition);
        assert_eq!(
            statement.sql,
            "(((string_key = ?) OR ((id IS NULL) OR (id IN (?, ?)))) AND (create_time > ?) AND (data->'$.a[0]' = ?))"
        );
        assert_eq!(
            statement.args,
            [
                Value::from("x"),
                "1".into(),
                "2".into(),
                since.into(),
                Value::Int32(Some(7)),
            ]
        );
        assert_eq!(compile(&condition), statement);
    }

    #[test]
    fn single_child() {
        assert_eq!(
            compile(&Condition::and([Condition::eq(ID, "a")])).sql,
            "((id = ?))"
        );
        assert_eq!(
            compile(&Condition::or([Condition::True, Condition::False])).sql,
            "((1 = 1) OR (1 != 1))"
        );
    }
}
