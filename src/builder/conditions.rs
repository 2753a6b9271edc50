//! The WHERE predicate tree.
//!
//! Predicates accumulate in call order and form an implicit top-level AND. An OR call
//! folds the new predicate into the one before it: the two become an OR group, or the
//! new predicate joins the preceding group when there already is one.

use serde::{Deserialize, Serialize};

use crate::ast::{IntoOperator, LikeOptions, Operator, Predicate, SetSource, Value};
use crate::query::Query;
use crate::transpiler::conditions::write_conjunction;
use crate::transpiler::{ParamContext, ToSql};

/// Predicate comparing a column to a value. LIKE-family operators become pattern
/// predicates so the dialect can render them.
pub fn compare_predicate(column: &str, op: Operator, value: Value, negate: bool) -> Predicate {
    if op.is_pattern() {
        let options = LikeOptions {
            case_sensitive: matches!(op, Operator::Like | Operator::NotLike),
            ..LikeOptions::default()
        };
        let inverted = matches!(op, Operator::NotLike | Operator::NotILike);
        return Predicate::Pattern {
            column: column.to_string(),
            value: value.as_text(),
            negate: negate != inverted,
            options,
        };
    }
    Predicate::Comparison {
        column: column.to_string(),
        op,
        value,
        negate,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionTree {
    predicates: Vec<Predicate>,
}

impl ConditionTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Append a predicate to the implicit AND.
    pub fn push_and(&mut self, predicate: Predicate) -> &mut Self {
        self.predicates.push(predicate);
        self
    }

    /// Append a predicate and fold it with the preceding one into an OR group.
    pub fn push_or(&mut self, predicate: Predicate) -> &mut Self {
        self.predicates.push(predicate);
        self.fold_last_two();
        self
    }

    fn push(&mut self, predicate: Predicate, or: bool) -> &mut Self {
        if or {
            self.push_or(predicate)
        } else {
            self.push_and(predicate)
        }
    }

    fn fold_last_two(&mut self) {
        if self.predicates.len() < 2 {
            return;
        }
        let (Some(new), Some(previous)) = (self.predicates.pop(), self.predicates.pop()) else {
            return;
        };
        let group = match previous {
            Predicate::OrGroup(mut children) => {
                children.push(new);
                Predicate::OrGroup(children)
            }
            previous => Predicate::OrGroup(vec![previous, new]),
        };
        if let Predicate::OrGroup(children) = &group {
            tracing::trace!("folded OR group, {} member(s)", children.len());
        }
        self.predicates.push(group);
    }

    pub fn where_(
        &mut self,
        column: &str,
        op: impl IntoOperator,
        value: impl Into<Value>,
    ) -> crate::QueryResult<&mut Self> {
        let op = op.into_operator()?;
        Ok(self.push_and(compare_predicate(column, op, value.into(), false)))
    }

    pub fn or_where(
        &mut self,
        column: &str,
        op: impl IntoOperator,
        value: impl Into<Value>,
    ) -> crate::QueryResult<&mut Self> {
        let op = op.into_operator()?;
        Ok(self.push_or(compare_predicate(column, op, value.into(), false)))
    }

    pub fn where_not(
        &mut self,
        column: &str,
        op: impl IntoOperator,
        value: impl Into<Value>,
    ) -> crate::QueryResult<&mut Self> {
        let op = op.into_operator()?;
        Ok(self.push_and(compare_predicate(column, op, value.into(), true)))
    }

    pub fn or_where_not(
        &mut self,
        column: &str,
        op: impl IntoOperator,
        value: impl Into<Value>,
    ) -> crate::QueryResult<&mut Self> {
        let op = op.into_operator()?;
        Ok(self.push_or(compare_predicate(column, op, value.into(), true)))
    }

    pub fn where_column(
        &mut self,
        column: &str,
        op: impl IntoOperator,
        other: &str,
        or: bool,
    ) -> crate::QueryResult<&mut Self> {
        let op = op.into_operator()?;
        Ok(self.push(
            Predicate::ColumnComparison {
                column: column.to_string(),
                op,
                other: other.to_string(),
                negate: false,
            },
            or,
        ))
    }

    pub fn where_null(&mut self, column: &str, negate: bool, or: bool) -> &mut Self {
        self.push(
            Predicate::NullCheck {
                column: column.to_string(),
                negate,
            },
            or,
        )
    }

    pub fn where_in(&mut self, column: &str, source: SetSource, negate: bool) -> &mut Self {
        self.push_and(Predicate::InSet {
            column: column.to_string(),
            source,
            negate,
        })
    }

    pub fn where_like(
        &mut self,
        column: &str,
        pattern: &str,
        options: LikeOptions,
        negate: bool,
    ) -> &mut Self {
        self.push_and(Predicate::Pattern {
            column: column.to_string(),
            value: pattern.to_string(),
            negate,
            options,
        })
    }

    pub fn where_fulltext(&mut self, column: &str, value: &str, negate: bool) -> &mut Self {
        self.push_and(Predicate::FullText {
            column: column.to_string(),
            value: value.to_string(),
            negate,
        })
    }

    /// Rows whose `[start, end]` window contains `at`; a NULL bound is open.
    ///
    /// Produces `(start IS NULL OR start <= at) AND (end IS NULL OR end >= at)`.
    pub fn where_active_at(&mut self, start: &str, end: &str, at: i64) -> &mut Self {
        self.where_null(start, false, false);
        self.push_or(compare_predicate(start, Operator::Lte, Value::Int(at), false));
        self.where_null(end, false, false);
        self.push_or(compare_predicate(end, Operator::Gte, Value::Int(at), false))
    }

    /// [`where_active_at`](Self::where_active_at) at the current Unix time.
    pub fn where_currently_active(&mut self, start: &str, end: &str) -> &mut Self {
        self.where_active_at(start, end, chrono::Utc::now().timestamp())
    }

    /// `column [NOT] IN (SELECT ...)`.
    pub fn where_in_query(&mut self, column: &str, query: Query, negate: bool) -> &mut Self {
        self.where_in(column, SetSource::Query(Box::new(query)), negate)
    }
}

impl ToSql for ConditionTree {
    fn write_sql(&self, ctx: &mut ParamContext) -> String {
        write_conjunction(&self.predicates, ctx)
    }
}
