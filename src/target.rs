use std::fmt;

use crate::dialect::Dialect;
use crate::error::Result;

/// The relation a search runs against.
///
/// A plain table or view name is quoted by the dialect. Anything containing
/// whitespace is taken to be a host-written subquery and wrapped as a derived
/// table; it is trusted in the same way as condition fragments are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Relation(String),
    Subquery(String),
}

impl Target {
    pub fn parse(target: &str) -> Self {
        let trimmed = target.trim();
        if trimmed.chars().any(char::is_whitespace) {
            Target::Subquery(trimmed.to_string())
        } else {
            Target::Relation(trimmed.to_string())
        }
    }

    pub fn render(&self, dialect: &dyn Dialect) -> Result<String> {
        match self {
            Target::Relation(name) => dialect.quote_identifier(name),
            Target::Subquery(sql) => Ok(format!("({}) ast", sql)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Relation(name) => write!(f, "{}", name),
            Target::Subquery(sql) => write!(f, "({})", sql),
        }
    }
}
