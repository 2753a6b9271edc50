//! The query compiler.
//!
//! A [`Query`] owns one builder per clause and delegates every call to it. Methods take
//! `&mut self` and return `&mut Self` so calls chain; methods that validate input
//! return `QueryResult<&mut Self>` and leave the query untouched on error.
//!
//! ```rust,ignore
//! use sqlweave::prelude::*;
//!
//! let mut q = sqlweave::table("user");
//! q.select("username")
//!     .left_join("user_enrolments", [("ue.userid", "=", "user.id")], "ue")?
//!     .where_("suspended", "=", 0)?
//!     .or_where_null("suspended")
//!     .order_asc(["username"]);
//! let compiled = q.compile();
//! ```

use serde::{Deserialize, Serialize};

use crate::ast::{
    AggregateFunc, FromSource, IntoOperator, JoinConditions, JoinKind, JoinTarget, LikeOptions,
    Operator, Predicate, SetSource, Value, DEFAULT_VALUES_NAME,
};
use crate::builder::{compare_predicate, ConditionTree, Grouping, JoinClause, OrderBy, Projection};
use crate::engine::{Executor, Record};
use crate::error::QueryResult;
use crate::transpiler::{CompiledQuery, Dialect, ToSql};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub(crate) from: FromSource,
    pub(crate) projection: Projection,
    pub(crate) joins: JoinClause,
    pub(crate) conditions: ConditionTree,
    pub(crate) grouping: Grouping,
    pub(crate) ordering: OrderBy,
}

impl Query {
    fn with_source(from: FromSource) -> Self {
        Self {
            from,
            projection: Projection::new(),
            joins: JoinClause::new(),
            conditions: ConditionTree::new(),
            grouping: Grouping::new(),
            ordering: OrderBy::new(),
        }
    }

    /// Query a table, rendered as the `{name}` placeholder.
    pub fn table(name: &str) -> Self {
        Self::with_source(FromSource::table(name))
    }

    pub fn table_as(name: &str, alias: &str) -> Self {
        Self::with_source(FromSource::Table {
            name: name.to_string(),
            alias: Some(alias.to_string()),
        })
    }

    /// Query a literal values matrix. Column aliases name the matrix columns; the
    /// matrix itself is called `name`, or `custom_value_table` by default.
    pub fn from_values(
        rows: Vec<Vec<Value>>,
        aliases: Option<Vec<String>>,
        name: Option<&str>,
    ) -> Self {
        Self::with_source(FromSource::Values {
            rows,
            aliases,
            name: name.unwrap_or(DEFAULT_VALUES_NAME).to_string(),
        })
    }

    /// Query the rows of a nested query.
    pub fn from_sub(query: Query, alias: Option<&str>) -> Self {
        Self::with_source(FromSource::SubQuery {
            query: Box::new(query),
            alias: alias.map(str::to_string),
        })
    }

    // ==================== Accessors ====================

    pub fn source(&self) -> &FromSource {
        &self.from
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn joins(&self) -> &JoinClause {
        &self.joins
    }

    pub fn conditions(&self) -> &ConditionTree {
        &self.conditions
    }

    pub fn grouping(&self) -> &Grouping {
        &self.grouping
    }

    pub fn ordering(&self) -> &OrderBy {
        &self.ordering
    }

    // ==================== Projection ====================

    pub fn select_all(&mut self) -> &mut Self {
        self.projection.select_all();
        self
    }

    pub fn select(&mut self, name: &str) -> &mut Self {
        self.projection.select(name);
        self
    }

    /// Rendered as `(name) AS alias`.
    pub fn select_as(&mut self, name: &str, alias: &str) -> &mut Self {
        self.projection.select_as(name, alias);
        self
    }

    pub fn select_column(&mut self, table: &str, name: &str, alias: Option<&str>) -> &mut Self {
        self.projection.select_column(table, name, alias);
        self
    }

    /// Raw SQL expression; its `?` markers stand for `params`.
    pub fn select_raw(&mut self, sql: &str, params: Vec<Value>) -> QueryResult<&mut Self> {
        self.projection.select_raw(sql, params)?;
        Ok(self)
    }

    pub fn select_count(&mut self, operand: Option<&str>, alias: Option<&str>) -> &mut Self {
        self.projection.select_count(operand, alias);
        self
    }

    pub fn select_min(&mut self, name: &str, alias: Option<&str>) -> &mut Self {
        self.projection.select_aggregate(AggregateFunc::Min, name, alias);
        self
    }

    pub fn select_max(&mut self, name: &str, alias: Option<&str>) -> &mut Self {
        self.projection.select_aggregate(AggregateFunc::Max, name, alias);
        self
    }

    pub fn select_sum(&mut self, name: &str, alias: Option<&str>) -> &mut Self {
        self.projection.select_aggregate(AggregateFunc::Sum, name, alias);
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.projection.distinct();
        self
    }

    // ==================== Predicates ====================

    pub fn where_predicate(&mut self, predicate: Predicate) -> &mut Self {
        self.conditions.push_and(predicate);
        self
    }

    pub fn or_where_predicate(&mut self, predicate: Predicate) -> &mut Self {
        self.conditions.push_or(predicate);
        self
    }

    /// `column op value`. LIKE-family operators produce a pattern match.
    pub fn where_(
        &mut self,
        column: &str,
        op: impl IntoOperator,
        value: impl Into<Value>,
    ) -> QueryResult<&mut Self> {
        self.conditions.where_(column, op, value)?;
        Ok(self)
    }

    pub fn or_where(
        &mut self,
        column: &str,
        op: impl IntoOperator,
        value: impl Into<Value>,
    ) -> QueryResult<&mut Self> {
        self.conditions.or_where(column, op, value)?;
        Ok(self)
    }

    pub fn where_not(
        &mut self,
        column: &str,
        op: impl IntoOperator,
        value: impl Into<Value>,
    ) -> QueryResult<&mut Self> {
        self.conditions.where_not(column, op, value)?;
        Ok(self)
    }

    pub fn or_where_not(
        &mut self,
        column: &str,
        op: impl IntoOperator,
        value: impl Into<Value>,
    ) -> QueryResult<&mut Self> {
        self.conditions.or_where_not(column, op, value)?;
        Ok(self)
    }

    pub fn where_column(
        &mut self,
        column: &str,
        op: impl IntoOperator,
        other: &str,
    ) -> QueryResult<&mut Self> {
        self.conditions.where_column(column, op, other, false)?;
        Ok(self)
    }

    pub fn or_where_column(
        &mut self,
        column: &str,
        op: impl IntoOperator,
        other: &str,
    ) -> QueryResult<&mut Self> {
        self.conditions.where_column(column, op, other, true)?;
        Ok(self)
    }

    pub fn where_null(&mut self, column: &str) -> &mut Self {
        self.conditions.where_null(column, false, false);
        self
    }

    pub fn or_where_null(&mut self, column: &str) -> &mut Self {
        self.conditions.where_null(column, false, true);
        self
    }

    pub fn where_not_null(&mut self, column: &str) -> &mut Self {
        self.conditions.where_null(column, true, false);
        self
    }

    pub fn or_where_not_null(&mut self, column: &str) -> &mut Self {
        self.conditions.where_null(column, true, true);
        self
    }

    /// `column IN (...)`; an empty list matches nothing.
    pub fn where_in<V: Into<Value>>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.where_in(column, SetSource::Values(values), false);
        self
    }

    pub fn where_not_in<V: Into<Value>>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions.where_in(column, SetSource::Values(values), true);
        self
    }

    pub fn where_in_query(&mut self, column: &str, query: Query) -> &mut Self {
        self.conditions.where_in_query(column, query, false);
        self
    }

    pub fn where_not_in_query(&mut self, column: &str, query: Query) -> &mut Self {
        self.conditions.where_in_query(column, query, true);
        self
    }

    /// Case-sensitive LIKE with `\` as the escape character.
    pub fn where_like(&mut self, column: &str, pattern: &str) -> &mut Self {
        self.conditions
            .where_like(column, pattern, LikeOptions::default(), false);
        self
    }

    pub fn where_not_like(&mut self, column: &str, pattern: &str) -> &mut Self {
        self.conditions
            .where_like(column, pattern, LikeOptions::default(), true);
        self
    }

    pub fn where_like_with(
        &mut self,
        column: &str,
        pattern: &str,
        options: LikeOptions,
        negate: bool,
    ) -> &mut Self {
        self.conditions.where_like(column, pattern, options, negate);
        self
    }

    pub fn where_fulltext(&mut self, column: &str, value: &str) -> &mut Self {
        self.conditions.where_fulltext(column, value, false);
        self
    }

    pub fn where_fulltext_not(&mut self, column: &str, value: &str) -> &mut Self {
        self.conditions.where_fulltext(column, value, true);
        self
    }

    /// Rows active at Unix time `at`: `start` and `end` are open when NULL.
    pub fn where_active_at(&mut self, start: &str, end: &str, at: i64) -> &mut Self {
        self.conditions.where_active_at(start, end, at);
        self
    }

    pub fn where_currently_active(&mut self, start: &str, end: &str) -> &mut Self {
        self.conditions.where_currently_active(start, end);
        self
    }

    // ==================== Joins ====================

    /// Join a table with explicit kind.
    pub fn join_as(
        &mut self,
        kind: JoinKind,
        table: &str,
        conditions: impl Into<JoinConditions>,
        alias: &str,
    ) -> QueryResult<&mut Self> {
        self.joins.add(
            JoinTarget::Table(table.to_string()),
            kind,
            conditions.into(),
            alias,
        )?;
        Ok(self)
    }

    /// INNER JOIN.
    pub fn join(
        &mut self,
        table: &str,
        conditions: impl Into<JoinConditions>,
        alias: &str,
    ) -> QueryResult<&mut Self> {
        self.join_as(JoinKind::Inner, table, conditions, alias)
    }

    pub fn left_join(
        &mut self,
        table: &str,
        conditions: impl Into<JoinConditions>,
        alias: &str,
    ) -> QueryResult<&mut Self> {
        self.join_as(JoinKind::Left, table, conditions, alias)
    }

    pub fn right_join(
        &mut self,
        table: &str,
        conditions: impl Into<JoinConditions>,
        alias: &str,
    ) -> QueryResult<&mut Self> {
        self.join_as(JoinKind::Right, table, conditions, alias)
    }

    pub fn full_join(
        &mut self,
        table: &str,
        conditions: impl Into<JoinConditions>,
        alias: &str,
    ) -> QueryResult<&mut Self> {
        self.join_as(JoinKind::Full, table, conditions, alias)
    }

    pub fn cross_join(&mut self, table: &str, alias: &str) -> &mut Self {
        self.joins
            .add_cross(JoinTarget::Table(table.to_string()), alias);
        self
    }

    /// Join a nested query, rendered in parentheses.
    pub fn join_sub(
        &mut self,
        kind: JoinKind,
        query: Query,
        conditions: impl Into<JoinConditions>,
        alias: &str,
    ) -> QueryResult<&mut Self> {
        self.joins.add(
            JoinTarget::SubQuery(Box::new(query)),
            kind,
            conditions.into(),
            alias,
        )?;
        Ok(self)
    }

    // ==================== Grouping & ordering ====================

    pub fn group_by<S: AsRef<str>>(&mut self, columns: impl IntoIterator<Item = S>) -> &mut Self {
        self.grouping.group_by(columns);
        self
    }

    pub fn having(
        &mut self,
        column: &str,
        op: impl IntoOperator,
        value: impl Into<Value>,
    ) -> QueryResult<&mut Self> {
        self.grouping.having(column, op, value)?;
        Ok(self)
    }

    pub fn or_having(
        &mut self,
        column: &str,
        op: impl IntoOperator,
        value: impl Into<Value>,
    ) -> QueryResult<&mut Self> {
        self.grouping.or_having(column, op, value)?;
        Ok(self)
    }

    pub fn order_asc<S: AsRef<str>>(&mut self, columns: impl IntoIterator<Item = S>) -> &mut Self {
        self.ordering.order_asc(columns);
        self
    }

    pub fn order_desc<S: AsRef<str>>(&mut self, columns: impl IntoIterator<Item = S>) -> &mut Self {
        self.ordering.order_desc(columns);
        self
    }

    pub fn clear_order(&mut self) -> &mut Self {
        self.ordering.clear();
        self
    }

    // ==================== Compilation ====================

    /// Compile with bound parameters for the generic dialect.
    pub fn compile(&self) -> CompiledQuery {
        self.compile_with(Dialect::default())
    }

    pub fn compile_with(&self, dialect: Dialect) -> CompiledQuery {
        let compiled = ToSql::compile_with_dialect(self, dialect);
        tracing::debug!(
            "compiled ({:?}): {} [{} param(s)]",
            dialect,
            compiled.sql,
            compiled.params.len()
        );
        compiled
    }

    /// SQL with every value rendered inline, for logs and fixtures.
    pub fn to_sql(&self) -> String {
        ToSql::to_sql_with_dialect(self, Dialect::default())
    }

    pub fn to_sql_with(&self, dialect: Dialect) -> String {
        ToSql::to_sql_with_dialect(self, dialect)
    }

    // ==================== Execution ====================

    /// Every matching row.
    pub async fn get(&self, db: &impl Executor) -> QueryResult<Vec<Record>> {
        let compiled = self.compile_with(db.dialect());
        db.fetch_all(&compiled).await
    }

    /// The first matching row.
    pub async fn first(&self, db: &impl Executor) -> QueryResult<Option<Record>> {
        let compiled = self.compile_with(db.dialect());
        db.fetch_optional(&compiled).await
    }

    /// The first row with `id = id`. The query itself is not modified.
    pub async fn find(&self, db: &impl Executor, id: impl Into<Value>) -> QueryResult<Option<Record>> {
        let mut scoped = self.clone();
        scoped
            .conditions
            .push_and(compare_predicate("id", Operator::Eq, id.into(), false));
        scoped.first(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QueryError;

    #[test]
    fn test_empty_projection() {
        assert_eq!(Query::table("user").to_sql(), "SELECT * FROM {user}");
    }

    #[test]
    fn test_where_inline_and_bound() {
        let mut q = Query::table("user");
        q.select("username").where_("suspended", "=", 1).unwrap();
        assert_eq!(q.to_sql(), "SELECT username FROM {user} WHERE suspended = 1");
        let compiled = q.compile();
        assert_eq!(compiled.sql, "SELECT username FROM {user} WHERE suspended = ?");
        assert_eq!(compiled.params, vec![Value::Int(1)]);
    }

    #[test]
    fn test_compile_is_repeatable() {
        let mut q = Query::table("user");
        q.where_("a", "=", 1).unwrap().or_where("b", "=", 2).unwrap();
        assert_eq!(q.compile(), q.compile());
        assert_eq!(q.to_sql(), q.to_sql());
    }

    #[test]
    fn test_rejected_join_keeps_query() {
        let mut q = Query::table("user");
        let before = q.clone();
        let err = q.join("t", vec!["OR"], "t").unwrap_err();
        assert!(matches!(err, QueryError::MalformedConditionShape(_)));
        assert_eq!(q, before);
    }

    #[test]
    fn test_from_values_default_name() {
        let q = Query::from_values(
            vec![vec![Value::Int(1)]],
            Some(vec!["id".into()]),
            None,
        );
        assert_eq!(
            q.to_sql(),
            "SELECT * FROM VALUES(\n((1))\n) AS custom_value_table(id)"
        );
    }

    #[test]
    fn test_nested_numbering() {
        let mut inner = Query::table("user_enrolments");
        inner.select("userid").where_("status", "=", 0).unwrap();
        let mut q = Query::table("user");
        q.where_("deleted", "=", 0)
            .unwrap()
            .where_in_query("id", inner)
            .where_("suspended", "=", 0)
            .unwrap();
        let compiled = q.compile_with(Dialect::Postgres);
        assert_eq!(
            compiled.sql,
            "SELECT * FROM {user} WHERE deleted = $1 AND id IN (SELECT userid FROM {user_enrolments} WHERE status = $2) AND suspended = $3"
        );
        assert_eq!(compiled.params.len(), 3);
    }
}
