use serde::{Deserialize, Serialize};

use crate::ast::{IntoOperator, JoinKind, LogicalOp, Operator};
use crate::error::{QueryError, QueryResult};
use crate::parser;
use crate::query::Query;

/// A single `left op right` join condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinCondition {
    pub left: String,
    pub op: Operator,
    pub right: String,
}

impl JoinCondition {
    /// Build a condition, validating the operator immediately.
    pub fn new(
        left: impl Into<String>,
        op: impl IntoOperator,
        right: impl Into<String>,
    ) -> QueryResult<Self> {
        Ok(Self {
            left: left.into(),
            op: op.into_operator()?,
            right: right.into(),
        })
    }

    /// Parse a textual condition such as `"ue.id = user.id"`.
    pub fn parse(text: &str) -> QueryResult<Self> {
        parser::parse_join_condition(text)
    }
}

impl std::fmt::Display for JoinCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.left, self.op.sql_symbol(), self.right)
    }
}

/// Raw condition triple as written by the caller; the operator is still a token.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionTriple {
    pub left: String,
    pub op: String,
    pub right: String,
}

impl ConditionTriple {
    fn resolve(self) -> QueryResult<JoinCondition> {
        JoinCondition::new(self.left, self.op.as_str(), self.right)
    }
}

impl<A: Into<String>, B: Into<String>, C: Into<String>> From<(A, B, C)> for ConditionTriple {
    fn from((left, op, right): (A, B, C)) -> Self {
        Self {
            left: left.into(),
            op: op.into(),
            right: right.into(),
        }
    }
}

/// One element of a condition sequence: a condition or a logic token.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionItem {
    Condition(ConditionTriple),
    /// Textual condition (`"a.id = b.id"`) or logic token (`"AND"`, `"or"`).
    Text(String),
}

impl<A: Into<String>, B: Into<String>, C: Into<String>> From<(A, B, C)> for ConditionItem {
    fn from(triple: (A, B, C)) -> Self {
        ConditionItem::Condition(triple.into())
    }
}

impl From<&str> for ConditionItem {
    fn from(text: &str) -> Self {
        ConditionItem::Text(text.to_string())
    }
}

impl From<String> for ConditionItem {
    fn from(text: String) -> Self {
        ConditionItem::Text(text)
    }
}

/// The condition argument of a join call.
#[derive(Debug, Clone, PartialEq)]
pub enum JoinConditions {
    /// Exactly one condition.
    Single(ConditionTriple),
    /// Conditions interleaved with optional AND/OR tokens; AND is implied between
    /// adjacent conditions.
    Sequence(Vec<ConditionItem>),
}

impl<A: Into<String>, B: Into<String>, C: Into<String>> From<(A, B, C)> for JoinConditions {
    fn from(triple: (A, B, C)) -> Self {
        JoinConditions::Single(triple.into())
    }
}

impl From<&str> for JoinConditions {
    fn from(text: &str) -> Self {
        JoinConditions::Sequence(vec![ConditionItem::Text(text.to_string())])
    }
}

impl<T: Into<ConditionItem>> From<Vec<T>> for JoinConditions {
    fn from(items: Vec<T>) -> Self {
        JoinConditions::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ConditionItem>, const N: usize> From<[T; N]> for JoinConditions {
    fn from(items: [T; N]) -> Self {
        JoinConditions::Sequence(items.into_iter().map(Into::into).collect())
    }
}

/// A condition together with the logic keyword that precedes it.
/// The first condition of a join never carries one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCondition {
    pub condition: JoinCondition,
    pub logic: Option<LogicalOp>,
}

impl JoinConditions {
    /// Resolve into an ordered list of conditions with their logic keywords.
    ///
    /// Logic tokens set the keyword for the next condition; after each condition it
    /// falls back to AND. A resolution that yields nothing is an error.
    pub fn parse(self) -> QueryResult<Vec<ParsedCondition>> {
        let items = match self {
            JoinConditions::Single(triple) => {
                return Ok(vec![ParsedCondition {
                    condition: triple.resolve()?,
                    logic: None,
                }]);
            }
            JoinConditions::Sequence(items) => items,
        };

        let mut parsed: Vec<ParsedCondition> = Vec::new();
        let mut pending = LogicalOp::And;

        for item in items {
            let condition = match item {
                ConditionItem::Condition(triple) => triple.resolve()?,
                ConditionItem::Text(text) => {
                    if let Some(logic) = LogicalOp::from_token(&text) {
                        pending = logic;
                        continue;
                    }
                    JoinCondition::parse(&text).map_err(|e| {
                        QueryError::malformed(format!(
                            "'{}' is neither a condition nor AND/OR ({})",
                            text, e
                        ))
                    })?
                }
            };
            let logic = if parsed.is_empty() { None } else { Some(pending) };
            parsed.push(ParsedCondition { condition, logic });
            pending = LogicalOp::And;
        }

        if parsed.is_empty() {
            return Err(QueryError::malformed(
                "no condition found in join condition sequence",
            ));
        }
        Ok(parsed)
    }
}

/// What a join attaches: a table placeholder or a nested query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinTarget {
    Table(String),
    SubQuery(Box<Query>),
}

/// A join definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub target: JoinTarget,
    pub kind: JoinKind,
    pub conditions: Vec<ParsedCondition>,
    pub alias: String,
}
