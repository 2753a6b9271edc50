//! Projection (the SELECT list).

use serde::{Deserialize, Serialize};

use crate::ast::{AggregateFunc, Column, Value};
use crate::error::{QueryError, QueryResult};
use crate::parser;
use crate::transpiler::{ParamContext, ToSql};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    columns: Vec<Column>,
    distinct: bool,
}

impl Projection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn push(&mut self, column: Column) -> &mut Self {
        self.columns.push(column);
        self
    }

    /// Replace the projection with a lone `*`. Later calls append after it.
    pub fn select_all(&mut self) -> &mut Self {
        self.columns = vec![Column::star()];
        self
    }

    pub fn select(&mut self, name: &str) -> &mut Self {
        self.push(Column::named(name))
    }

    pub fn select_as(&mut self, name: &str, alias: &str) -> &mut Self {
        self.push(Column::Named {
            name: name.to_string(),
            table: None,
            alias: Some(alias.to_string()),
        })
    }

    pub fn select_column(&mut self, table: &str, name: &str, alias: Option<&str>) -> &mut Self {
        self.push(Column::Named {
            name: name.to_string(),
            table: Some(table.to_string()),
            alias: alias.map(str::to_string),
        })
    }

    /// Raw expression whose `?` markers stand for `params`, in order. A marker count
    /// that differs from the parameter count is rejected before anything is stored.
    pub fn select_raw(&mut self, sql: &str, params: Vec<Value>) -> QueryResult<&mut Self> {
        let markers = parser::count_markers(sql);
        if markers != params.len() {
            return Err(QueryError::ParamMismatch {
                markers,
                params: params.len(),
            });
        }
        Ok(self.push(Column::Raw {
            sql: sql.to_string(),
            params,
            standalone: false,
        }))
    }

    pub fn select_aggregate(
        &mut self,
        func: AggregateFunc,
        operand: &str,
        alias: Option<&str>,
    ) -> &mut Self {
        self.push(Column::Aggregate {
            func,
            operand: operand.to_string(),
            alias: alias.map(str::to_string),
        })
    }

    /// `COUNT(operand)`, counting `1` when no operand is given.
    pub fn select_count(&mut self, operand: Option<&str>, alias: Option<&str>) -> &mut Self {
        self.select_aggregate(AggregateFunc::Count, operand.unwrap_or("1"), alias)
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }
}

impl ToSql for Projection {
    fn write_sql(&self, ctx: &mut ParamContext) -> String {
        let prefix = if self.distinct { "DISTINCT " } else { "" };
        if self.columns.is_empty() {
            return format!("{}*", prefix);
        }
        let columns: Vec<String> = self.columns.iter().map(|c| c.write_sql(ctx)).collect();
        format!("{}{}", prefix, columns.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_star() {
        assert_eq!(Projection::new().to_sql(), "*");
        assert_eq!(Projection::new().distinct().to_sql(), "DISTINCT *");
    }

    #[test]
    fn test_columns_and_aliases() {
        let mut p = Projection::new();
        p.select("id")
            .select_as("username", "uname")
            .select_column("u", "email", Some("mail"));
        assert_eq!(p.to_sql(), "id, (username) AS uname, (u.email) AS mail");
    }

    #[test]
    fn test_aggregates() {
        let mut p = Projection::new();
        p.select_count(None, Some("total"))
            .select_aggregate(AggregateFunc::Max, "timecreated", None);
        assert_eq!(p.to_sql(), "COUNT(1) total, MAX(timecreated)");
    }

    #[test]
    fn test_raw_params_are_bound() {
        let mut p = Projection::new();
        p.select_raw("CASE WHEN x > ? THEN 1 ELSE 0 END flag", vec![Value::Int(5)])
            .unwrap();
        let compiled = p.compile();
        assert_eq!(compiled.sql, "CASE WHEN x > ? THEN 1 ELSE 0 END flag");
        assert_eq!(compiled.params, vec![Value::Int(5)]);
    }

    #[test]
    fn test_raw_marker_count_must_match() {
        let mut p = Projection::new();
        let err = p.select_raw("COALESCE(a, ?, ?)", vec![Value::Int(1)]).unwrap_err();
        assert!(matches!(err, QueryError::ParamMismatch { markers: 2, params: 1 }));
        assert!(p.columns().is_empty());

        p.select_raw("'?' || b", vec![]).unwrap();
        assert_eq!(p.to_sql(), "'?' || b");
    }

    #[test]
    fn test_select_all_replaces_projection() {
        let mut p = Projection::new();
        p.select("username").select_count(None, None).select_all();
        assert_eq!(p.columns(), &[Column::star()]);
        assert_eq!(p.to_sql(), "*");
    }

    #[test]
    fn test_select_after_select_all_appends() {
        let mut p = Projection::new();
        p.select_all().select("username");
        assert_eq!(p.to_sql(), "*, username");
        p.distinct();
        assert_eq!(p.to_sql(), "DISTINCT *, username");
    }
}
