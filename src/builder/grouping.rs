//! GROUP BY and HAVING.

use serde::{Deserialize, Serialize};

use crate::ast::{IntoOperator, LogicalOp, Predicate, Value};
use crate::builder::conditions::compare_predicate;
use crate::error::QueryResult;
use crate::transpiler::{ParamContext, ToSql};

/// A HAVING predicate tagged with the keyword that joins it to the previous one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HavingClause {
    pub logic: LogicalOp,
    pub predicate: Predicate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grouping {
    columns: Vec<String>,
    having: Vec<HavingClause>,
}

impl Grouping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn having_clauses(&self) -> &[HavingClause] {
        &self.having
    }

    /// Replace the grouping columns.
    pub fn group_by<S: AsRef<str>>(&mut self, columns: impl IntoIterator<Item = S>) -> &mut Self {
        self.columns = columns.into_iter().map(|c| c.as_ref().to_string()).collect();
        self
    }

    pub fn having(
        &mut self,
        column: &str,
        op: impl IntoOperator,
        value: impl Into<Value>,
    ) -> QueryResult<&mut Self> {
        self.push_having(LogicalOp::And, column, op, value.into())
    }

    pub fn or_having(
        &mut self,
        column: &str,
        op: impl IntoOperator,
        value: impl Into<Value>,
    ) -> QueryResult<&mut Self> {
        self.push_having(LogicalOp::Or, column, op, value.into())
    }

    fn push_having(
        &mut self,
        logic: LogicalOp,
        column: &str,
        op: impl IntoOperator,
        value: Value,
    ) -> QueryResult<&mut Self> {
        let op = op.into_operator()?;
        self.having.push(HavingClause {
            logic,
            predicate: compare_predicate(column, op, value, false),
        });
        Ok(self)
    }
}

impl ToSql for Grouping {
    fn write_sql(&self, ctx: &mut ParamContext) -> String {
        if self.columns.is_empty() {
            if !self.having.is_empty() {
                tracing::warn!(
                    "dropping {} HAVING predicate(s): no GROUP BY columns",
                    self.having.len()
                );
            }
            return String::new();
        }

        let mut sql = format!("GROUP BY {}", self.columns.join(", "));
        for (i, clause) in self.having.iter().enumerate() {
            if i == 0 {
                sql.push_str(" HAVING ");
            } else {
                sql.push(' ');
                sql.push_str(clause.logic.keyword());
                sql.push(' ');
            }
            sql.push_str(&clause.predicate.write_sql(ctx));
        }
        sql
    }
}
