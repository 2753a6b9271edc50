use serde::{Deserialize, Serialize};

use crate::ast::{AggregateFunc, Value};

/// A projected column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Column {
    /// Raw SQL, passed through with its own parameters.
    /// `standalone` marks a projection that stands alone (the `*` marker).
    Raw {
        sql: String,
        params: Vec<Value>,
        standalone: bool,
    },
    /// A named column, optionally table-qualified and aliased.
    Named {
        name: String,
        table: Option<String>,
        alias: Option<String>,
    },
    /// An aggregate over an operand.
    Aggregate {
        func: AggregateFunc,
        operand: String,
        alias: Option<String>,
    },
}

impl Column {
    /// The `*` marker used by `select_all`.
    pub fn star() -> Self {
        Column::Raw {
            sql: "*".to_string(),
            params: Vec::new(),
            standalone: true,
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Column::Named {
            name: name.into(),
            table: None,
            alias: None,
        }
    }

    pub fn is_standalone(&self) -> bool {
        matches!(self, Column::Raw { standalone: true, .. })
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Column::Raw { sql, .. } => write!(f, "{}", sql),
            Column::Named { name, table, alias } => {
                let locator = match table {
                    Some(t) => format!("{}.{}", t, name),
                    None => name.clone(),
                };
                match alias {
                    Some(a) => write!(f, "({}) AS {}", locator, a),
                    None => write!(f, "{}", locator),
                }
            }
            Column::Aggregate {
                func,
                operand,
                alias,
            } => {
                write!(f, "{}({})", func, operand)?;
                if let Some(a) = alias {
                    write!(f, " {}", a)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_display() {
        assert_eq!(Column::named("username").to_string(), "username");
        let aliased = Column::Named {
            name: "id".into(),
            table: Some("u".into()),
            alias: Some("uid".into()),
        };
        assert_eq!(aliased.to_string(), "(u.id) AS uid");
        let agg = Column::Aggregate {
            func: AggregateFunc::Max,
            operand: "grade".into(),
            alias: Some("best".into()),
        };
        assert_eq!(agg.to_string(), "MAX(grade) best");
    }
}
