use super::super::traits::SqlGenerator;

/// SQLite: LIKE is already case-insensitive for ASCII, so the default expression applies.
pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn bool_literal(&self, val: bool) -> String {
        if val {
            "1".to_string()
        } else {
            "0".to_string()
        }
    }
}
