use crate::ast::LikeOptions;
use crate::transpiler::traits::{SqlGenerator, escape_clause};

pub struct SqlServerGenerator;

impl SqlGenerator for SqlServerGenerator {
    fn placeholder(&self, index: usize) -> String {
        format!("@p{}", index)
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    // NTEXT columns cannot be compared directly
    fn compare_text(&self, column: &str, length: usize) -> String {
        format!("CAST({} AS NVARCHAR({}))", column, length.max(1))
    }

    fn like(&self, column: &str, pattern: &str, options: &LikeOptions, negate: bool) -> String {
        let not = if negate { "NOT " } else { "" };
        let case = if options.case_sensitive { "CS" } else { "CI" };
        let accent = if options.accent_sensitive { "AS" } else { "AI" };
        format!(
            "{} COLLATE Latin1_General_{}_{} {}LIKE {} {}",
            column,
            case,
            accent,
            not,
            pattern,
            escape_clause(options.escape)
        )
    }
}
