use std::collections::HashSet;

use tracing::{debug, info};

use crate::access::DataAccess;
use crate::dialect::Dialect;
use crate::error::{Result, SearchError};
use crate::target::Target;

/// Ordered list of the columns a search may select and filter on.
///
/// Built once from a single-row sample of the target. The order of the sample's
/// fields is the select and display order.
#[derive(Debug, Clone)]
pub struct ColumnRegistry {
    columns: Vec<String>,
}

impl ColumnRegistry {
    pub fn new(columns: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            return Err(SearchError::Initialization("Column list is empty".into()));
        }
        Ok(Self { columns })
    }

    /// Fetch one row of `target` and take its field names as the column list.
    ///
    /// An empty relation cannot be told apart from a bad name here, so both
    /// fail initialization.
    pub fn introspect(target: &Target, dialect: &dyn Dialect, access: &dyn DataAccess) -> Result<Self> {
        let relation = target
            .render(dialect)
            .map_err(|e| SearchError::Initialization(e.to_string()))?;
        let sql = format!("SELECT * FROM {} {}", relation, dialect.single_row_clause());
        let rows = access
            .fetch(&sql, &[])
            .map_err(|e| SearchError::Initialization(e.to_string()))?;
        let columns: Vec<String> = match rows.into_iter().next() {
            Some(row) => row.into_iter().map(|(name, _)| name).collect(),
            None => Vec::new(),
        };
        if columns.is_empty() {
            return Err(SearchError::Initialization(format!(
                "Not able to gather column data from {}",
                target
            )));
        }
        info!(%target, columns = columns.len(), "columns introspected");
        Ok(Self { columns })
    }

    /// Drop every column whose name matches one of `names`, ignoring case.
    /// Names that match nothing are ignored.
    pub fn omit<S: AsRef<str>>(&mut self, names: &[S]) {
        let omitted: HashSet<String> = names.iter().map(|n| n.as_ref().to_uppercase()).collect();
        let before = self.columns.len();
        self.columns.retain(|c| !omitted.contains(&c.to_uppercase()));
        debug!(removed = before - self.columns.len(), "columns omitted");
    }

    pub fn list(&self) -> &[String] {
        &self.columns
    }

    /// Exact-case membership; stored names round-trip from the sampled row unchanged.
    pub fn has(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
