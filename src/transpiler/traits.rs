//! Transpiler traits and utilities.

use crate::ast::{LikeOptions, Value};

/// Trait for dialect-specific SQL generation.
///
/// The builder is dialect agnostic; everything that differs between database engines
/// (placeholders, boolean literals, text matching) is delegated here.
pub trait SqlGenerator {
    /// Generate the parameter placeholder (e.g., $1, ?, @p1) for a given 1-based index.
    fn placeholder(&self, index: usize) -> String;

    /// Get the boolean literal (true/false vs 1/0).
    fn bool_literal(&self, val: bool) -> String;

    /// Render a value inline.
    fn literal(&self, value: &Value) -> String {
        match value {
            Value::Bool(b) => self.bool_literal(*b),
            v => v.to_string(),
        }
    }

    /// Column expression used on the left of a full-text comparison.
    /// `length` is the length of the compared text; engines with LOB columns truncate to it.
    fn compare_text(&self, column: &str, _length: usize) -> String {
        column.to_string()
    }

    /// Generate a LIKE expression against an already rendered placeholder or literal.
    /// Default implementation lowers both sides for case-insensitive matching.
    fn like(&self, column: &str, pattern: &str, options: &LikeOptions, negate: bool) -> String {
        let not = if negate { "NOT " } else { "" };
        let escape = escape_clause(options.escape);
        if options.case_sensitive {
            format!("{} {}LIKE {} {}", column, not, pattern, escape)
        } else {
            format!("LOWER({}) {}LIKE LOWER({}) {}", column, not, pattern, escape)
        }
    }
}

/// `ESCAPE 'c'` with the character quoted as a SQL literal.
pub fn escape_clause(escape: char) -> String {
    format!("ESCAPE {}", Value::quote(&escape.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl SqlGenerator for Plain {
        fn placeholder(&self, _index: usize) -> String {
            "?".to_string()
        }

        fn bool_literal(&self, val: bool) -> String {
            if val { "1".to_string() } else { "0".to_string() }
        }
    }

    #[test]
    fn test_default_like() {
        let g = Plain;
        assert_eq!(
            g.like("name", "?", &LikeOptions::default(), false),
            "name LIKE ? ESCAPE '\\'"
        );
        assert_eq!(
            g.like("name", "?", &LikeOptions::case_insensitive(), true),
            "LOWER(name) NOT LIKE LOWER(?) ESCAPE '\\'"
        );
    }

    #[test]
    fn test_literal_uses_bool_literal() {
        assert_eq!(Plain.literal(&Value::Bool(true)), "1");
        assert_eq!(Plain.literal(&Value::from("x")), "'x'");
    }
}
