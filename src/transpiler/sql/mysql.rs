use crate::ast::LikeOptions;
use crate::transpiler::traits::SqlGenerator;

/// MySQL Generator.
pub struct MysqlGenerator;

impl SqlGenerator for MysqlGenerator {
    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }

    fn like(&self, column: &str, pattern: &str, options: &LikeOptions, negate: bool) -> String {
        let not = if negate { "NOT " } else { "" };
        let collation = match (options.case_sensitive, options.accent_sensitive) {
            (true, _) => "utf8mb4_bin",
            (false, true) => "utf8mb4_0900_as_ci",
            (false, false) => "utf8mb4_0900_ai_ci",
        };
        // Backslash is itself an escape inside MySQL string literals
        let escape = match options.escape {
            '\\' => "'\\\\'".to_string(),
            c => format!("'{}'", c),
        };
        format!(
            "{} {}LIKE {} COLLATE {} ESCAPE {}",
            column, not, pattern, collation, escape
        )
    }
}
