//! Declarative query definitions.
//!
//! A [`QueryDef`] is the serde form of a query, loaded from TOML by the CLI:
//!
//! ```toml
//! table = "user"
//! alias = "u"
//! select = ["u.id", "u.username"]
//!
//! [[join]]
//! kind = "left"
//! table = "user_enrolments"
//! alias = "ue"
//! on = ["ue.userid = u.id"]
//!
//! [[where]]
//! column = "u.suspended"
//! op = "="
//! value = 0
//!
//! [[order]]
//! column = "u.username"
//! ```

use serde::{Deserialize, Serialize};

use crate::ast::{ConditionItem, JoinConditions, JoinKind, LogicalOp, Value};
use crate::error::{QueryError, QueryResult};
use crate::query::Query;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDef {
    pub table: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub distinct: bool,
    #[serde(default)]
    pub select: Vec<String>,
    #[serde(default, rename = "join")]
    pub joins: Vec<JoinDef>,
    #[serde(default, rename = "where")]
    pub filters: Vec<FilterDef>,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub having: Vec<FilterDef>,
    #[serde(default)]
    pub order: Vec<OrderDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinDef {
    #[serde(default = "default_join_kind")]
    pub kind: JoinKind,
    pub table: String,
    #[serde(default)]
    pub alias: String,
    /// Textual conditions and AND/OR tokens, in order.
    #[serde(default)]
    pub on: Vec<String>,
}

fn default_join_kind() -> JoinKind {
    JoinKind::Inner
}

/// One WHERE or HAVING entry.
///
/// With `values` it is a set membership test; without `value` it is a NULL check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDef {
    pub column: String,
    #[serde(default = "default_op")]
    pub op: String,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub values: Option<Vec<Value>>,
    #[serde(default)]
    pub logic: LogicalOp,
    #[serde(default)]
    pub negate: bool,
}

fn default_op() -> String {
    "=".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDef {
    pub column: String,
    #[serde(default)]
    pub desc: bool,
}

impl QueryDef {
    pub fn from_toml(text: &str) -> QueryResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Build the query. Operators and join conditions are validated here.
    pub fn to_query(&self) -> QueryResult<Query> {
        let mut query = match &self.alias {
            Some(alias) => Query::table_as(&self.table, alias),
            None => Query::table(&self.table),
        };

        if self.distinct {
            query.distinct();
        }
        for column in &self.select {
            query.select(column);
        }

        for join in &self.joins {
            if join.kind == JoinKind::Cross {
                if !join.on.is_empty() {
                    return Err(QueryError::UnsupportedJoin(format!(
                        "CROSS JOIN on {{{}}} cannot carry ON conditions",
                        join.table
                    )));
                }
                query.cross_join(&join.table, &join.alias);
                continue;
            }
            let items: Vec<ConditionItem> = join.on.iter().map(|s| s.as_str().into()).collect();
            query.join_as(join.kind, &join.table, JoinConditions::Sequence(items), &join.alias)?;
        }

        for filter in &self.filters {
            apply_filter(&mut query, filter)?;
        }

        if !self.group_by.is_empty() {
            query.group_by(&self.group_by);
        }
        for having in &self.having {
            let value = having.value.clone().unwrap_or(Value::Null);
            match having.logic {
                LogicalOp::And => query.having(&having.column, having.op.as_str(), value)?,
                LogicalOp::Or => query.or_having(&having.column, having.op.as_str(), value)?,
            };
        }

        for order in &self.order {
            if order.desc {
                query.order_desc([&order.column]);
            } else {
                query.order_asc([&order.column]);
            }
        }

        Ok(query)
    }
}

fn apply_filter(query: &mut Query, filter: &FilterDef) -> QueryResult<()> {
    let or = filter.logic == LogicalOp::Or;
    let column = filter.column.as_str();

    if let Some(values) = &filter.values {
        if or {
            tracing::warn!("'or' logic is ignored for set membership on {}", column);
        }
        if filter.negate {
            query.where_not_in(column, values.clone());
        } else {
            query.where_in(column, values.clone());
        }
        return Ok(());
    }

    let Some(value) = filter.value.clone() else {
        match (filter.negate, or) {
            (false, false) => query.where_null(column),
            (false, true) => query.or_where_null(column),
            (true, false) => query.where_not_null(column),
            (true, true) => query.or_where_not_null(column),
        };
        return Ok(());
    };

    let op = filter.op.as_str();
    match (filter.negate, or) {
        (false, false) => query.where_(column, op, value)?,
        (false, true) => query.or_where(column, op, value)?,
        (true, false) => query.where_not(column, op, value)?,
        (true, true) => query.or_where_not(column, op, value)?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENROLLED: &str = r#"
        table = "user"
        alias = "u"
        select = ["u.id", "u.username"]

        [[join]]
        kind = "left"
        table = "user_enrolments"
        alias = "ue"
        on = ["ue.userid = u.id", "OR", "ue.modifierid = u.id"]

        [[where]]
        column = "u.suspended"
        value = 0

        [[where]]
        column = "u.deleted"
        logic = "or"

        [[order]]
        column = "u.username"
        desc = true
    "#;

    #[test]
    fn test_definition_to_query() {
        let def = QueryDef::from_toml(ENROLLED).unwrap();
        let query = def.to_query().unwrap();
        assert_eq!(
            query.to_sql(),
            "SELECT u.id, u.username FROM {user} u LEFT JOIN {user_enrolments} ue ON ue.userid = u.id OR ue.modifierid = u.id WHERE u.suspended = 0 OR u.deleted IS NULL ORDER BY u.username DESC"
        );
    }

    #[test]
    fn test_bad_operator_in_definition() {
        let def = QueryDef::from_toml(
            r#"
            table = "user"
            [[where]]
            column = "id"
            op = "=~"
            value = 1
            "#,
        )
        .unwrap();
        assert!(matches!(
            def.to_query().unwrap_err(),
            QueryError::UnsupportedOperator(_)
        ));
    }

    #[test]
    fn test_in_and_having() {
        let def = QueryDef::from_toml(
            r#"
            table = "course"
            select = ["category"]
            group_by = ["category"]

            [[where]]
            column = "id"
            values = [1, 2]

            [[having]]
            column = "COUNT(id)"
            op = ">"
            value = 3
            "#,
        )
        .unwrap();
        let compiled = def.to_query().unwrap().compile();
        assert_eq!(
            compiled.sql,
            "SELECT category FROM {course} WHERE id IN (?, ?) GROUP BY category HAVING COUNT(id) > ?"
        );
        assert_eq!(compiled.params, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }
}
