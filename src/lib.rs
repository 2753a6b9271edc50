//! # sqlweave: composable SELECT queries
//!
//! Build SELECT statements with chained calls, compile them to SQL with bound
//! parameters, and run them through an injected executor.
//!
//! ## Quick Example
//!
//! ```rust
//! use sqlweave::prelude::*;
//!
//! let mut q = sqlweave::table("user");
//! q.select("username")
//!     .where_("suspended", "=", 1)
//!     .unwrap();
//!
//! assert_eq!(q.to_sql(), "SELECT username FROM {user} WHERE suspended = 1");
//!
//! let compiled = q.compile();
//! assert_eq!(compiled.sql, "SELECT username FROM {user} WHERE suspended = ?");
//! ```
//!
//! ## Predicate folding
//!
//! | Calls                                  | WHERE                        |
//! |----------------------------------------|------------------------------|
//! | `where_(a)`, `where_(b)`               | `a AND b`                    |
//! | `where_(a)`, `or_where(b)`             | `a OR b`                     |
//! | `where_(a)`, `where_(b)`, `or_where(c)`| `a AND (b OR c)`             |
//! | `or_where(a)` on an empty query        | `a`                          |
//!
//! Table names compile to `{name}` placeholders; the executor expands them with its
//! configured prefix.

pub mod ast;
pub mod builder;
pub mod config;
pub mod definition;
pub mod engine;
pub mod error;
pub mod parser;
pub mod query;
pub mod transpiler;

pub use config::Config;
pub use error::{QueryError, QueryResult};
pub use query::Query;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::Config;
    pub use crate::definition::QueryDef;
    pub use crate::engine::{Executor, Record, SqlxExecutor};
    pub use crate::error::*;
    pub use crate::query::Query;
    pub use crate::transpiler::{BindMode, CompiledQuery, Dialect, ToSql};
}

/// Start a query on a table.
pub fn table(name: &str) -> Query {
    Query::table(name)
}

/// Start a query on a literal values matrix named `custom_value_table`.
pub fn from_values(rows: Vec<Vec<ast::Value>>, aliases: Option<Vec<String>>) -> Query {
    Query::from_values(rows, aliases, None)
}
