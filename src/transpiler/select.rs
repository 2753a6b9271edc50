//! SELECT SQL generation.

use crate::ast::{Column, FromSource};
use crate::query::Query;
use crate::transpiler::{ParamContext, ToSql};

/// Generate SELECT SQL.
///
/// Clauses are written in their textual order so bound parameters line up with
/// placeholder order, nested queries included.
pub fn build_select(query: &Query, ctx: &mut ParamContext) -> String {
    let projection = query.projection.write_sql(ctx);
    let from = query.from.write_sql(ctx);
    let joins = query.joins.write_sql(ctx);
    let conditions = query.conditions.write_sql(ctx);
    let grouping = query.grouping.write_sql(ctx);
    let ordering = query.ordering.write_sql(ctx);

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions)
    };

    let segments = [
        format!("SELECT {}", projection),
        format!("FROM {}", from),
        joins,
        where_clause,
        grouping,
        ordering,
    ];

    segments
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl ToSql for Query {
    fn write_sql(&self, ctx: &mut ParamContext) -> String {
        build_select(self, ctx)
    }
}

impl ToSql for Column {
    fn write_sql(&self, ctx: &mut ParamContext) -> String {
        match self {
            Column::Raw { sql, params, .. } => ctx.bind_raw(sql, params),
            column => column.to_string(),
        }
    }
}

impl ToSql for FromSource {
    fn write_sql(&self, ctx: &mut ParamContext) -> String {
        match self {
            FromSource::Table { name, alias } => match alias {
                Some(a) => format!("{{{}}} {}", name, a),
                None => format!("{{{}}}", name),
            },
            FromSource::Values {
                rows,
                aliases,
                name,
            } => {
                let mut sql = String::from("VALUES(\n");
                let rendered: Vec<String> = rows
                    .iter()
                    .map(|row| {
                        let cells: Vec<String> =
                            row.iter().map(|v| format!("({})", ctx.bind(v))).collect();
                        format!("({})", cells.join(", "))
                    })
                    .collect();
                sql.push_str(&rendered.join(",\n"));
                sql.push_str("\n)");
                if let Some(aliases) = aliases {
                    sql.push_str(&format!(" AS {}({})", name, aliases.join(",")));
                }
                sql
            }
            FromSource::SubQuery { query, alias } => {
                let inner = build_select(query, ctx);
                match alias {
                    Some(a) => format!("({}) {}", inner, a),
                    None => format!("({})", inner),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Value;
    use crate::transpiler::Dialect;

    #[test]
    fn test_table_sources() {
        assert_eq!(FromSource::table("user").to_sql(), "{user}");
        let aliased = FromSource::Table {
            name: "enrol".into(),
            alias: Some("e".into()),
        };
        assert_eq!(aliased.to_sql(), "{enrol} e");
    }

    #[test]
    fn test_values_matrix() {
        let source = FromSource::Values {
            rows: vec![
                vec![Value::Int(1), Value::from("a")],
                vec![Value::Int(2), Value::from("b")],
            ],
            aliases: Some(vec!["id".into(), "name".into()]),
            name: "t".into(),
        };
        assert_eq!(
            source.to_sql(),
            "VALUES(\n((1), ('a')),\n((2), ('b'))\n) AS t(id,name)"
        );
        let compiled = source.compile_with_dialect(Dialect::Postgres);
        assert_eq!(
            compiled.sql,
            "VALUES(\n(($1), ($2)),\n(($3), ($4))\n) AS t(id,name)"
        );
        assert_eq!(compiled.params.len(), 4);
    }

    #[test]
    fn test_raw_column_binds_params() {
        let col = Column::Raw {
            sql: "COALESCE(nickname, ?)".into(),
            params: vec![Value::from("anon")],
            standalone: false,
        };
        let compiled = col.compile();
        assert_eq!(compiled.sql, "COALESCE(nickname, ?)");
        assert_eq!(compiled.params, vec![Value::from("anon")]);
        assert_eq!(col.to_sql(), "COALESCE(nickname, 'anon')");
    }
}
