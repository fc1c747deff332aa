use jdb::{
    BackendError, Error, Executor, QueryResult, Result, RowLabeled, RowNames, RowsAffected,
    Statement, Value,
    stream::{self, Stream, StreamExt, TryStreamExt},
};
use std::{collections::VecDeque, future::Future};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectationKind {
    Exec,
    Query,
}

#[derive(Debug, Clone)]
enum Outcome {
    Affected(RowsAffected),
    Rows(RowNames, Vec<Box<[Value]>>),
    Error(BackendError),
}

/// One scripted statement.
#[derive(Debug, Clone)]
pub struct Expectation {
    kind: ExpectationKind,
    sql: String,
    args: Option<Vec<Value>>,
    outcome: Outcome,
}

impl Expectation {
    /// The statement must carry exactly these arguments.
    pub fn with_args<V: Into<Value>>(&mut self, args: impl IntoIterator<Item = V>) -> &mut Self {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    pub fn will_return_affected(&mut self, rows_affected: u64) -> &mut Self {
        self.outcome = Outcome::Affected(RowsAffected { rows_affected });
        self
    }

    pub fn will_return_rows(&mut self, labels: &[&str], rows: Vec<Vec<Value>>) -> &mut Self {
        self.outcome = Outcome::Rows(
            labels.iter().map(|v| v.to_string()).collect(),
            rows.into_iter().map(Vec::into_boxed_slice).collect(),
        );
        self
    }

    pub fn will_return_error(&mut self, error: BackendError) -> &mut Self {
        self.outcome = Outcome::Error(error);
        self
    }
}

/// Executor replaying a script of expected statements, in order.
///
/// Expected SQL is matched as a fragment of the received text, an empty fragment accepts any
/// statement. A statement that does not match, or arrives when the script is over, fails like a
/// database error would.
#[derive(Debug, Default)]
pub struct MockExecutor {
    expectations: VecDeque<Expectation>,
    statements: Vec<Statement>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    fn expect(&mut self, kind: ExpectationKind, sql: &str) -> &mut Expectation {
        self.expectations.push_back(Expectation {
            kind,
            sql: sql.into(),
            args: None,
            outcome: match kind {
                ExpectationKind::Exec => Outcome::Affected(RowsAffected::default()),
                ExpectationKind::Query => Outcome::Rows(RowNames::from([]), Vec::new()),
            },
        });
        let last = self.expectations.len() - 1;
        &mut self.expectations[last]
    }

    pub fn expect_exec(&mut self, sql: &str) -> &mut Expectation {
        self.expect(ExpectationKind::Exec, sql)
    }

    pub fn expect_query(&mut self, sql: &str) -> &mut Expectation {
        self.expect(ExpectationKind::Query, sql)
    }

    /// Every statement received so far.
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn remaining(&self) -> usize {
        self.expectations.len()
    }

    /// Panics when part of the script was never played.
    pub fn assert_met(&self) {
        if let Some(expectation) = self.expectations.front() {
            panic!(
                "{} expectation(s) not met, next one is {:?} `{}`",
                self.expectations.len(),
                expectation.kind,
                expectation.sql
            );
        }
    }

    fn play(&mut self, kind: Option<ExpectationKind>, statement: Statement) -> Vec<Result<QueryResult>> {
        self.statements.push(statement.clone());
        let Some(expectation) = self.expectations.pop_front() else {
            return vec![Err(Error::msg(format!(
                "Unexpected statement, the script is over: {statement}"
            )))];
        };
        if kind.is_some_and(|kind| kind != expectation.kind) {
            return vec![Err(Error::msg(format!(
                "Expected a {:?} statement but received {:?}: {statement}",
                expectation.kind,
                kind
            )))];
        }
        if !statement.sql.contains(&expectation.sql) {
            return vec![Err(Error::msg(format!(
                "Statement `{statement}` does not match the expected `{}`",
                expectation.sql
            )))];
        }
        if let Some(args) = &expectation.args {
            if *args != statement.args {
                return vec![Err(Error::msg(format!(
                    "Statement `{statement}` was called with arguments {:?}, expected {args:?}",
                    statement.args
                )))];
            }
        }
        match expectation.outcome {
            Outcome::Affected(affected) => vec![Ok(affected.into())],
            Outcome::Rows(labels, rows) => rows
                .into_iter()
                .map(|values| Ok(RowLabeled::new(labels.clone(), values).into()))
                .collect(),
            Outcome::Error(error) => vec![Err(error.into())],
        }
    }
}

impl Executor for MockExecutor {
    fn run(&mut self, statement: Statement) -> impl Stream<Item = Result<QueryResult>> + Send {
        stream::iter(self.play(None, statement))
    }

    fn fetch(&mut self, statement: Statement) -> impl Stream<Item = Result<RowLabeled>> + Send {
        stream::iter(self.play(Some(ExpectationKind::Query), statement)).filter_map(
            |v| async move {
                match v {
                    Ok(QueryResult::Row(v)) => Some(Ok(v)),
                    Err(e) => Some(Err(e)),
                    _ => None,
                }
            },
        )
    }

    fn execute(&mut self, statement: Statement) -> impl Future<Output = Result<RowsAffected>> + Send {
        stream::iter(self.play(Some(ExpectationKind::Exec), statement))
            .try_filter_map(|v| async move {
                Ok(match v {
                    QueryResult::Affected(v) => Some(v),
                    QueryResult::Row(..) => None,
                })
            })
            .try_collect()
    }
}
