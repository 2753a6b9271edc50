use serde::{Deserialize, Serialize};

use crate::ast::Value;
use crate::query::Query;

/// Default synthetic name for a literal values matrix.
pub const DEFAULT_VALUES_NAME: &str = "custom_value_table";

/// The row origin of a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FromSource {
    /// A table, rendered as a `{name}` placeholder.
    Table { name: String, alias: Option<String> },
    /// A literal values matrix.
    /// `aliases` names the columns; when present the matrix is aliased as `name(aliases)`.
    Values {
        rows: Vec<Vec<Value>>,
        aliases: Option<Vec<String>>,
        name: String,
    },
    /// A nested query, compiled recursively.
    SubQuery {
        query: Box<Query>,
        alias: Option<String>,
    },
}

impl FromSource {
    pub fn table(name: impl Into<String>) -> Self {
        FromSource::Table {
            name: name.into(),
            alias: None,
        }
    }

    /// Table name for table sources.
    pub fn table_name(&self) -> Option<&str> {
        match self {
            FromSource::Table { name, .. } => Some(name),
            _ => None,
        }
    }
}
