//! ORDER BY.

use serde::{Deserialize, Serialize};

use crate::ast::Ordering;
use crate::transpiler::{ParamContext, ToSql};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    orderings: Vec<Ordering>,
}

impl OrderBy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orderings(&self) -> &[Ordering] {
        &self.orderings
    }

    fn push<S: AsRef<str>>(&mut self, columns: impl IntoIterator<Item = S>, ascending: bool) -> &mut Self {
        self.orderings.extend(columns.into_iter().map(|c| Ordering {
            column: c.as_ref().to_string(),
            ascending,
        }));
        self
    }

    pub fn order_asc<S: AsRef<str>>(&mut self, columns: impl IntoIterator<Item = S>) -> &mut Self {
        self.push(columns, true)
    }

    pub fn order_desc<S: AsRef<str>>(&mut self, columns: impl IntoIterator<Item = S>) -> &mut Self {
        self.push(columns, false)
    }

    pub fn clear(&mut self) -> &mut Self {
        self.orderings.clear();
        self
    }
}

impl ToSql for OrderBy {
    fn write_sql(&self, _ctx: &mut ParamContext) -> String {
        if self.orderings.is_empty() {
            return String::new();
        }
        let items: Vec<String> = self.orderings.iter().map(|o| o.to_string()).collect();
        format!("ORDER BY {}", items.join(", "))
    }
}
