//! Clause builders owned by [`Query`](crate::Query).
//!
//! Each builder accumulates one clause and compiles it through
//! [`ToSql`](crate::transpiler::ToSql); the query delegates to them and stitches the
//! fragments together.

pub mod conditions;
pub mod grouping;
pub mod joins;
pub mod ordering;
pub mod select;

pub use conditions::{compare_predicate, ConditionTree};
pub use grouping::{Grouping, HavingClause};
pub use joins::JoinClause;
pub use ordering::OrderBy;
pub use select::Projection;
