use crate::ast::LikeOptions;
use crate::transpiler::traits::{SqlGenerator, escape_clause};

pub struct PostgresGenerator;

impl SqlGenerator for PostgresGenerator {
    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn bool_literal(&self, val: bool) -> String {
        if val {
            "true".to_string()
        } else {
            "false".to_string()
        }
    }

    fn like(&self, column: &str, pattern: &str, options: &LikeOptions, negate: bool) -> String {
        let not = if negate { "NOT " } else { "" };
        let op = if options.case_sensitive { "LIKE" } else { "ILIKE" };
        // unaccent() needs the extension installed on the server
        let (column, pattern) = if options.accent_sensitive {
            (column.to_string(), pattern.to_string())
        } else {
            (format!("unaccent({})", column), format!("unaccent({})", pattern))
        };
        format!(
            "{} {}{} {} {}",
            column,
            not,
            op,
            pattern,
            escape_clause(options.escape)
        )
    }
}
