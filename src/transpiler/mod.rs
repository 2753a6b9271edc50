//! SQL Transpiler for the query AST.
//!
//! Every node writes its SQL into a [`ParamContext`], which either collects bound
//! parameters behind dialect placeholders or renders literals inline.

pub mod conditions;
pub mod dialect;
pub mod select;
pub mod sql;
pub mod traits;

use serde::{Deserialize, Serialize};

use crate::ast::Value;
use crate::parser;

pub use dialect::Dialect;
pub use traits::SqlGenerator;

/// How values reach the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindMode {
    /// Values become placeholders and are collected in order.
    #[default]
    Bound,
    /// Values are rendered as quoted literals; nothing is collected.
    Inline,
}

/// A compiled statement: SQL text plus parameters in placeholder order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Context for parameterized query building.
pub struct ParamContext {
    generator: Box<dyn SqlGenerator>,
    mode: BindMode,
    /// Collected parameter values in order
    params: Vec<Value>,
}

impl ParamContext {
    pub fn new(dialect: Dialect, mode: BindMode) -> Self {
        Self {
            generator: dialect.generator(),
            mode,
            params: Vec::new(),
        }
    }

    pub fn generator(&self) -> &dyn SqlGenerator {
        self.generator.as_ref()
    }

    pub fn mode(&self) -> BindMode {
        self.mode
    }

    /// Add a value and return the placeholder (or literal) for it.
    pub fn bind(&mut self, value: &Value) -> String {
        match self.mode {
            BindMode::Bound => {
                self.params.push(value.clone());
                self.generator.placeholder(self.params.len())
            }
            BindMode::Inline => self.generator.literal(value),
        }
    }

    /// Splice a raw fragment whose `?` markers stand for `params`, in order.
    /// Markers inside quoted literals are left alone.
    pub fn bind_raw(&mut self, sql: &str, params: &[Value]) -> String {
        let markers = parser::count_markers(sql);
        if markers != params.len() {
            tracing::warn!(
                "raw fragment '{}' has {} marker(s) but {} parameter(s)",
                sql,
                markers,
                params.len()
            );
        }
        let mut values = params.iter();
        parser::rewrite_markers(sql, |_| match values.next() {
            Some(v) => self.bind(v),
            None => "?".to_string(),
        })
    }

    pub fn into_params(self) -> Vec<Value> {
        self.params
    }
}

/// Trait for converting AST nodes to SQL.
pub trait ToSql {
    /// Write this node into the context and return its SQL fragment.
    fn write_sql(&self, ctx: &mut ParamContext) -> String;

    /// Convert this node to SQL with values inlined, using the default dialect.
    fn to_sql(&self) -> String {
        self.to_sql_with_dialect(Dialect::default())
    }

    /// Convert this node to SQL with values inlined for a specific dialect.
    fn to_sql_with_dialect(&self, dialect: Dialect) -> String {
        let mut ctx = ParamContext::new(dialect, BindMode::Inline);
        self.write_sql(&mut ctx)
    }

    /// Compile with bound parameters using the default dialect.
    fn compile(&self) -> CompiledQuery {
        self.compile_with_dialect(Dialect::default())
    }

    /// Compile with bound parameters for a specific dialect.
    fn compile_with_dialect(&self, dialect: Dialect) -> CompiledQuery {
        let mut ctx = ParamContext::new(dialect, BindMode::Bound);
        let sql = self.write_sql(&mut ctx);
        CompiledQuery {
            sql,
            params: ctx.into_params(),
        }
    }
}
