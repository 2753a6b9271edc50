//! Predicate constructors for use with `Query::where_predicate` and friends.
//!
//! ```ignore
//! use sqlweave::ast::builders::*;
//!
//! let mut q = sqlweave::table("user");
//! q.where_predicate(eq("deleted", 0)).or_where_predicate(is_null("deleted"));
//! ```

use crate::ast::{LikeOptions, Operator, Predicate, SetSource, Value};
use crate::query::Query;

fn compare(column: &str, op: Operator, value: Value) -> Predicate {
    Predicate::Comparison {
        column: column.to_string(),
        op,
        value,
        negate: false,
    }
}

/// Create an equality predicate (column = value)
pub fn eq(column: &str, value: impl Into<Value>) -> Predicate {
    compare(column, Operator::Eq, value.into())
}

/// Create a not-equal predicate (column <> value)
pub fn ne(column: &str, value: impl Into<Value>) -> Predicate {
    compare(column, Operator::Ne, value.into())
}

/// Create a greater-than predicate (column > value)
pub fn gt(column: &str, value: impl Into<Value>) -> Predicate {
    compare(column, Operator::Gt, value.into())
}

/// Create a greater-than-or-equal predicate (column >= value)
pub fn gte(column: &str, value: impl Into<Value>) -> Predicate {
    compare(column, Operator::Gte, value.into())
}

/// Create a less-than predicate (column < value)
pub fn lt(column: &str, value: impl Into<Value>) -> Predicate {
    compare(column, Operator::Lt, value.into())
}

/// Create a less-than-or-equal predicate (column <= value)
pub fn lte(column: &str, value: impl Into<Value>) -> Predicate {
    compare(column, Operator::Lte, value.into())
}

/// Compare two columns (column op other)
pub fn column_cmp(column: &str, op: Operator, other: &str) -> Predicate {
    Predicate::ColumnComparison {
        column: column.to_string(),
        op,
        other: other.to_string(),
        negate: false,
    }
}

/// Create an IS NULL predicate
pub fn is_null(column: &str) -> Predicate {
    Predicate::NullCheck {
        column: column.to_string(),
        negate: false,
    }
}

/// Create an IS NOT NULL predicate
pub fn is_not_null(column: &str) -> Predicate {
    Predicate::NullCheck {
        column: column.to_string(),
        negate: true,
    }
}

/// Create an IN predicate (column IN (values))
pub fn is_in<V: Into<Value>>(column: &str, values: impl IntoIterator<Item = V>) -> Predicate {
    Predicate::InSet {
        column: column.to_string(),
        source: SetSource::Values(values.into_iter().map(Into::into).collect()),
        negate: false,
    }
}

/// Create an IN predicate over a nested query (column IN (SELECT ...))
pub fn in_query(column: &str, query: Query) -> Predicate {
    Predicate::InSet {
        column: column.to_string(),
        source: SetSource::Query(Box::new(query)),
        negate: false,
    }
}

/// Create a LIKE predicate with default options
pub fn like(column: &str, pattern: &str) -> Predicate {
    Predicate::Pattern {
        column: column.to_string(),
        value: pattern.to_string(),
        negate: false,
        options: LikeOptions::default(),
    }
}

/// Create a full-text comparison predicate
pub fn fulltext(column: &str, value: &str) -> Predicate {
    Predicate::FullText {
        column: column.to_string(),
        value: value.to_string(),
        negate: false,
    }
}

/// Negate an atomic predicate. OR groups are returned unchanged.
pub fn not(predicate: Predicate) -> Predicate {
    match predicate {
        Predicate::Comparison {
            column, op, value, ..
        } => Predicate::Comparison {
            column,
            op,
            value,
            negate: true,
        },
        Predicate::ColumnComparison {
            column, op, other, ..
        } => Predicate::ColumnComparison {
            column,
            op,
            other,
            negate: true,
        },
        Predicate::NullCheck { column, negate } => Predicate::NullCheck {
            column,
            negate: !negate,
        },
        Predicate::FullText { column, value, .. } => Predicate::FullText {
            column,
            value,
            negate: true,
        },
        Predicate::Pattern {
            column,
            value,
            options,
            ..
        } => Predicate::Pattern {
            column,
            value,
            negate: true,
            options,
        },
        Predicate::InSet { column, source, .. } => Predicate::InSet {
            column,
            source,
            negate: true,
        },
        group @ Predicate::OrGroup(_) => group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_flips_null_check() {
        assert_eq!(not(is_null("a")), is_not_null("a"));
        assert_eq!(not(is_not_null("a")), is_null("a"));
    }

    #[test]
    fn test_in_collects_values() {
        let p = is_in("id", [1, 2, 3]);
        assert!(matches!(
            p,
            Predicate::InSet { source: SetSource::Values(v), .. } if v.len() == 3
        ));
    }
}
