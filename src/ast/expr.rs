use serde::{Deserialize, Serialize};

use crate::ast::{Operator, Value};
use crate::query::Query;

/// Options for LIKE pattern matching, handed to the dialect's pattern expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeOptions {
    pub case_sensitive: bool,
    pub accent_sensitive: bool,
    pub escape: char,
}

impl Default for LikeOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            accent_sensitive: true,
            escape: '\\',
        }
    }
}

impl LikeOptions {
    pub fn case_insensitive() -> Self {
        Self {
            case_sensitive: false,
            ..Self::default()
        }
    }
}

/// Right hand side of a set membership test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SetSource {
    Values(Vec<Value>),
    Query(Box<Query>),
}

/// A boolean condition usable in WHERE and HAVING clauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// `column op value`
    Comparison {
        column: String,
        op: Operator,
        value: Value,
        negate: bool,
    },
    /// `column op other_column`, nothing is bound.
    ColumnComparison {
        column: String,
        op: Operator,
        other: String,
        negate: bool,
    },
    /// `column IS [NOT] NULL`
    NullCheck { column: String, negate: bool },
    /// Full-text comparison, rendered by the dialect.
    FullText {
        column: String,
        value: String,
        negate: bool,
    },
    /// LIKE pattern match, rendered by the dialect.
    Pattern {
        column: String,
        value: String,
        negate: bool,
        options: LikeOptions,
    },
    /// `column [NOT] IN (...)`
    InSet {
        column: String,
        source: SetSource,
        negate: bool,
    },
    /// Two or more predicates combined with OR.
    OrGroup(Vec<Predicate>),
}

impl Predicate {
    pub fn is_or_group(&self) -> bool {
        matches!(self, Predicate::OrGroup(_))
    }
}
