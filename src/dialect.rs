//! Per-database syntax differences.
//!
//! A [`Dialect`] knows how to quote identifiers, how to write bind
//! placeholders, how to bound the number of returned rows and how to fetch a
//! single row when probing a table for its columns. Dialects are stateless and
//! shared as `&'static dyn Dialect`.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, SearchError};

lazy_static! {
    static ref BARE_IDENTIFIER: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9_$#]*$").unwrap();
}

pub trait Dialect: Send + Sync {
    /// Get the dialect name
    fn name(&self) -> &'static str;

    /// Quote a column or table identifier.
    ///
    /// Identifiers that cannot be represented safely are rejected with a
    /// validation error; user values never pass through here.
    fn quote_identifier(&self, name: &str) -> Result<String>;

    /// Placeholder for the bound parameter at `index` (1-based)
    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    /// Fragment appended after the WHERE clause that returns at most `limit` rows
    fn limit_clause(&self, limit: u32) -> String {
        format!("LIMIT {}", limit)
    }

    /// Fragment appended to `SELECT * FROM <target>` to fetch a single row
    fn single_row_clause(&self) -> &'static str {
        "LIMIT 1"
    }
}

fn check_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(SearchError::Validation("Empty identifier".into()));
    }
    if name.contains('\0') {
        return Err(SearchError::Validation(format!("Identifier ({}) contains a NUL byte", name.escape_debug())));
    }
    Ok(())
}

/// MySQL/MariaDB: backtick quoting, `LIMIT n`
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, name: &str) -> Result<String> {
        check_identifier(name)?;
        Ok(format!("`{}`", name.replace('`', "``")))
    }
}

/// Oracle: unquoted identifiers, `ROWNUM` bounding, `:n` placeholders
pub struct OracleDialect;

impl Dialect for OracleDialect {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn quote_identifier(&self, name: &str) -> Result<String> {
        check_identifier(name)?;
        if !BARE_IDENTIFIER.is_match(name) {
            return Err(SearchError::Validation(format!(
                "Identifier ({}) cannot be used unquoted",
                name
            )));
        }
        Ok(name.to_string())
    }

    fn placeholder(&self, index: usize) -> String {
        format!(":{}", index)
    }

    // ROWNUM is assigned before the predicate is checked, so `< n + 1` yields n rows
    fn limit_clause(&self, limit: u32) -> String {
        format!("AND ROWNUM < {}", u64::from(limit) + 1)
    }

    fn single_row_clause(&self) -> &'static str {
        "WHERE ROWNUM = 1"
    }
}

/// SQLite: ANSI double-quote quoting, `LIMIT n`
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, name: &str) -> Result<String> {
        check_identifier(name)?;
        Ok(format!("\"{}\"", name.replace('"', "\"\"")))
    }
}

/// Dialect selector used by host configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    MySql,
    Oracle,
    Sqlite,
}

impl DialectKind {
    /// Get the SQL dialect for this kind
    pub fn dialect(&self) -> &'static dyn Dialect {
        match self {
            DialectKind::MySql => &MySqlDialect,
            DialectKind::Oracle => &OracleDialect,
            DialectKind::Sqlite => &SqliteDialect,
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dialect().name())
    }
}
