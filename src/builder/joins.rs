//! JOIN clause accumulation and compilation.

use serde::{Deserialize, Serialize};

use crate::ast::{Join, JoinConditions, JoinKind, JoinTarget};
use crate::error::{QueryError, QueryResult};
use crate::parser::collapse_whitespace;
use crate::transpiler::select::build_select;
use crate::transpiler::{ParamContext, ToSql};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinClause {
    joins: Vec<Join>,
}

impl JoinClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Record a conditional join. The conditions are resolved before anything is
    /// stored, so a rejected call leaves the clause unchanged.
    pub fn add(
        &mut self,
        target: JoinTarget,
        kind: JoinKind,
        conditions: JoinConditions,
        alias: &str,
    ) -> QueryResult<&mut Self> {
        if kind == JoinKind::Cross {
            return Err(QueryError::UnsupportedJoin(format!(
                "CROSS JOIN on {} cannot carry ON conditions",
                describe(&target)
            )));
        }
        let conditions = conditions.parse()?;
        self.joins.push(Join {
            target,
            kind,
            conditions,
            alias: alias.to_string(),
        });
        Ok(self)
    }

    /// Record a CROSS JOIN.
    pub fn add_cross(&mut self, target: JoinTarget, alias: &str) -> &mut Self {
        self.joins.push(Join {
            target,
            kind: JoinKind::Cross,
            conditions: Vec::new(),
            alias: alias.to_string(),
        });
        self
    }
}

fn describe(target: &JoinTarget) -> String {
    match target {
        JoinTarget::Table(name) => format!("{{{}}}", name),
        JoinTarget::SubQuery(_) => "a nested query".to_string(),
    }
}

impl ToSql for Join {
    fn write_sql(&self, ctx: &mut ParamContext) -> String {
        let target = match &self.target {
            JoinTarget::Table(name) => format!("{{{}}}", name),
            JoinTarget::SubQuery(query) => format!("({})", build_select(query, ctx)),
        };
        let mut sql = format!("{} JOIN {} {}", self.kind.keyword(), target, self.alias);
        if !self.conditions.is_empty() {
            sql.push_str(" ON");
            for parsed in &self.conditions {
                if let Some(logic) = parsed.logic {
                    sql.push(' ');
                    sql.push_str(logic.keyword());
                }
                sql.push(' ');
                sql.push_str(&parsed.condition.to_string());
            }
        }
        collapse_whitespace(&sql)
    }
}

impl ToSql for JoinClause {
    fn write_sql(&self, ctx: &mut ParamContext) -> String {
        self.joins
            .iter()
            .map(|j| j.write_sql(ctx))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
