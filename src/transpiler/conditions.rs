use crate::ast::{Predicate, SetSource, Value};
use crate::transpiler::select::build_select;
use crate::transpiler::{ParamContext, ToSql};

impl ToSql for Predicate {
    /// Convert predicate to SQL. OR groups render parenthesized; use
    /// [`write_or_group`] when the group is an entire clause.
    fn write_sql(&self, ctx: &mut ParamContext) -> String {
        match self {
            Predicate::Comparison {
                column,
                op,
                value,
                negate,
            } => {
                let placeholder = ctx.bind(value);
                format!("{}{} {} {}", neg_prefix(*negate), column, op.sql_symbol(), placeholder)
            }
            Predicate::ColumnComparison {
                column,
                op,
                other,
                negate,
            } => format!("{}{} {} {}", neg_prefix(*negate), column, op.sql_symbol(), other),
            Predicate::NullCheck { column, negate } => {
                if *negate {
                    format!("{} IS NOT NULL", column)
                } else {
                    format!("{} IS NULL", column)
                }
            }
            Predicate::FullText {
                column,
                value,
                negate,
            } => {
                let left = ctx.generator().compare_text(column, value.chars().count());
                let placeholder = ctx.bind(&Value::String(value.clone()));
                format!("{}{} = {}", neg_prefix(*negate), left, placeholder)
            }
            Predicate::Pattern {
                column,
                value,
                negate,
                options,
            } => {
                let placeholder = ctx.bind(&Value::String(value.clone()));
                ctx.generator().like(column, &placeholder, options, *negate)
            }
            Predicate::InSet {
                column,
                source,
                negate,
            } => write_in_set(column, source, *negate, ctx),
            Predicate::OrGroup(children) => format!("({})", write_or_group(children, ctx)),
        }
    }
}

fn neg_prefix(negate: bool) -> &'static str {
    if negate { "NOT " } else { "" }
}

/// Join OR group members without the surrounding parentheses.
pub fn write_or_group(children: &[Predicate], ctx: &mut ParamContext) -> String {
    children
        .iter()
        .map(|c| c.write_sql(ctx))
        .collect::<Vec<_>>()
        .join(" OR ")
}

/// Render top-level predicates as an implicit AND. A lone OR group is the whole
/// clause and stays bare.
pub fn write_conjunction(predicates: &[Predicate], ctx: &mut ParamContext) -> String {
    if let [Predicate::OrGroup(children)] = predicates {
        return write_or_group(children, ctx);
    }
    predicates
        .iter()
        .map(|p| p.write_sql(ctx))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn write_in_set(column: &str, source: &SetSource, negate: bool, ctx: &mut ParamContext) -> String {
    let keyword = if negate { "NOT IN" } else { "IN" };
    match source {
        // IN () is not valid SQL; an empty set matches nothing
        SetSource::Values(values) if values.is_empty() => {
            if negate { "1 = 1".to_string() } else { "1 = 0".to_string() }
        }
        SetSource::Values(values) => {
            let placeholders: Vec<String> = values.iter().map(|v| ctx.bind(v)).collect();
            format!("{} {} ({})", column, keyword, placeholders.join(", "))
        }
        SetSource::Query(query) => {
            format!("{} {} ({})", column, keyword, build_select(query, ctx))
        }
    }
}
