use crate::transpiler::traits::SqlGenerator;

/// Portable generator: `?` placeholders and integer booleans.
pub struct GenericGenerator;

impl SqlGenerator for GenericGenerator {
    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn bool_literal(&self, val: bool) -> String {
        if val { "1".to_string() } else { "0".to_string() }
    }
}
