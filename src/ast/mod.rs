pub mod builders;
pub mod columns;
pub mod expr;
pub mod from;
pub mod joins;
pub mod operators;
pub mod values;

pub use self::columns::Column;
pub use self::expr::{LikeOptions, Predicate, SetSource};
pub use self::from::{DEFAULT_VALUES_NAME, FromSource};
pub use self::joins::{
    ConditionItem, ConditionTriple, Join, JoinCondition, JoinConditions, JoinTarget,
    ParsedCondition,
};
pub use self::operators::{AggregateFunc, IntoOperator, JoinKind, LogicalOp, Operator};
pub use self::values::Value;

/// A column ordering for ORDER BY.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Ordering {
    pub column: String,
    pub ascending: bool,
}

impl std::fmt::Display for Ordering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dir = if self.ascending { "ASC" } else { "DESC" };
        write!(f, "{} {}", self.column, dir)
    }
}
