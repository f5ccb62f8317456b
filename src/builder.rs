//! Statement composition.
//!
//! [`QueryBuilder`] turns the registry's columns, the host's [`ConditionSet`],
//! an ordered list of criteria and a [`RowLimit`] into one parameterized
//! [`Statement`] for a given [`Dialect`]. User values only ever travel as
//! bound parameters.
//!
//! Criteria are folded left to right: every criterion after the first joins
//! the whole predicate accumulated so far with its own conjunction, so
//! `[a, OR b, AND c]` reads `((a OR b) AND c)`. Removed slots (`None`) are
//! skipped without disturbing the order of the others.

use std::fmt;

use tracing::debug;

use crate::conditions::ConditionSet;
use crate::criteria::Criterion;
use crate::dialect::Dialect;
use crate::error::{Result, SearchError};
use crate::registry::ColumnRegistry;
use crate::target::Target;

pub const DEFAULT_ROW_LIMIT: u32 = 500;

/// Maximum number of rows or values any issued query may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLimit(u32);

impl RowLimit {
    pub fn new(limit: i64) -> Result<Self> {
        match u32::try_from(limit) {
            Ok(n) if n > 0 => Ok(Self(n)),
            _ => Err(SearchError::Config(format!("Row limit must be a positive integer, got {}", limit))),
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for RowLimit {
    fn default() -> Self {
        Self(DEFAULT_ROW_LIMIT)
    }
}

impl fmt::Display for RowLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// SQL text plus the values bound to its placeholders, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<String>,
}

pub struct QueryBuilder<'a> {
    dialect: &'a dyn Dialect,
    target: &'a Target,
    registry: &'a ColumnRegistry,
    conditions: &'a ConditionSet,
    limit: RowLimit,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(
        dialect: &'a dyn Dialect,
        target: &'a Target,
        registry: &'a ColumnRegistry,
        conditions: &'a ConditionSet,
        limit: RowLimit,
    ) -> Self {
        Self { dialect, target, registry, conditions, limit }
    }

    fn known_column(&self, column: &str) -> Result<String> {
        if !self.registry.has(column) {
            return Err(SearchError::Validation(format!(
                "This column ({}) does not exist or is not available.",
                column
            )));
        }
        self.dialect.quote_identifier(column)
    }

    /// Results statement for `criteria`. Any unknown column rejects the
    /// whole statement.
    pub fn results(&self, criteria: &[Option<Criterion>]) -> Result<Statement> {
        if self.registry.is_empty() {
            return Err(SearchError::Validation("No columns are available to select".into()));
        }
        let select = self
            .registry
            .list()
            .iter()
            .map(|c| self.dialect.quote_identifier(c))
            .collect::<Result<Vec<_>>>()?
            .join(", ");

        let mut params = Vec::new();
        let mut predicate: Option<String> = None;
        for criterion in criteria.iter().flatten() {
            let column = self.known_column(criterion.column())?;
            params.push(criterion.operator().bind(criterion.value()));
            let test = criterion.operator().render(&column, &self.dialect.placeholder(params.len()));
            predicate = Some(match predicate {
                None => test,
                Some(acc) => format!("({} {} {})", acc, criterion.conjunction().unwrap_or_default(), test),
            });
        }

        let mut sql = format!("SELECT {} FROM {} WHERE 1=1", select, self.target.render(self.dialect)?);
        if let Some(predicate) = predicate {
            sql.push_str(" AND ");
            sql.push_str(&predicate);
        }
        if !self.conditions.is_empty() {
            sql.push(' ');
            sql.push_str(&self.conditions.render());
        }
        sql.push(' ');
        sql.push_str(&self.dialect.limit_clause(self.limit.get()));
        debug!(%sql, params = params.len(), "results statement");
        Ok(Statement { sql, params })
    }

    /// Bounded `SELECT DISTINCT` over one registry column.
    pub fn distinct(&self, column: &str) -> Result<Statement> {
        let column = self.known_column(column)?;
        let sql = format!(
            "SELECT DISTINCT {} FROM {} WHERE 1=1 {}",
            column,
            self.target.render(self.dialect)?,
            self.dialect.limit_clause(self.limit.get())
        );
        debug!(%sql, "distinct statement");
        Ok(Statement { sql, params: Vec::new() })
    }
}
