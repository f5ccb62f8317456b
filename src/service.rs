//! Request handling.
//!
//! [`SearchService`] is the one place where requests come in and envelopes go
//! out. It owns the column registry, conditions, row limit and dialect chosen
//! by the host, all read-only while requests are served, and talks to the
//! database only through the injected [`DataAccess`] port.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::access::{DataAccess, Row};
use crate::builder::{QueryBuilder, RowLimit};
use crate::conditions::ConditionSet;
use crate::criteria::{CriterionInput, Parsed};
use crate::dialect::{Dialect, DialectKind};
use crate::error::{Result, SearchError};
use crate::registry::ColumnRegistry;
use crate::settings::Settings;
use crate::target::Target;

pub const SUCCESS_MESSAGE: &str = "Success!";

/// A protocol request, discriminated by its `action` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action")]
pub enum SearchRequest {
    #[serde(rename = "getVals", alias = "distinctValues")]
    DistinctValues {
        #[serde(default)]
        column: Option<String>,
    },
    #[serde(rename = "getResults", alias = "results")]
    Results {
        #[serde(default)]
        criteria: Option<Vec<Option<CriterionInput>>>,
    },
}

/// Uniform response returned for every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    pub data: Vec<Value>,
}

impl Envelope {
    pub fn ok(data: Vec<Value>, notes: &[String]) -> Self {
        let message = if notes.is_empty() {
            SUCCESS_MESSAGE.to_string()
        } else {
            format!("{} {}", SUCCESS_MESSAGE, notes.join(" "))
        };
        Self { success: true, message, data }
    }

    pub fn failure(error: &SearchError) -> Self {
        Self { success: false, message: error.to_string(), data: Vec::new() }
    }
}

/// Rows of a results request together with any fallback notes.
#[derive(Debug)]
pub struct Found {
    pub rows: Vec<Row>,
    pub notes: Vec<String>,
}

pub struct SearchService {
    access: Arc<dyn DataAccess>,
    dialect: &'static dyn Dialect,
    target: Target,
    registry: ColumnRegistry,
    conditions: ConditionSet,
    limit: RowLimit,
    strict_operators: bool,
}

impl SearchService {
    /// Introspect `target` and set up a service with default limit, no
    /// conditions and lenient operator parsing.
    pub fn new(target: &str, dialect: DialectKind, access: Arc<dyn DataAccess>) -> Result<Self> {
        let target = Target::parse(target);
        if let Target::Relation(name) = &target {
            if name.is_empty() {
                return Err(SearchError::Initialization("No table or view given".into()));
            }
        }
        let dialect = dialect.dialect();
        let registry = ColumnRegistry::introspect(&target, dialect, access.as_ref())?;
        info!(%target, dialect = dialect.name(), columns = registry.len(), "search service ready");
        Ok(Self {
            access,
            dialect,
            target,
            registry,
            conditions: ConditionSet::new(),
            limit: RowLimit::default(),
            strict_operators: false,
        })
    }

    pub fn from_settings(settings: &Settings, access: Arc<dyn DataAccess>) -> Result<Self> {
        let mut service = Self::new(&settings.target, settings.dialect, access)?;
        service.omit_columns(settings.omit_columns.as_slice());
        if service.registry.is_empty() {
            return Err(SearchError::Config("Every column of the target was omitted".into()));
        }
        for fragment in &settings.conditions {
            service.add_condition(fragment.as_str())?;
        }
        service.set_row_limit(RowLimit::new(settings.row_limit)?);
        service.set_strict_operators(settings.strict_operators);
        Ok(service)
    }

    pub fn omit_columns<S: AsRef<str>>(&mut self, names: &[S]) {
        self.registry.omit(names);
    }

    pub fn add_condition(&mut self, fragment: impl Into<String>) -> Result<()> {
        self.conditions.add(fragment)
    }

    pub fn set_row_limit(&mut self, limit: RowLimit) {
        self.limit = limit;
    }

    pub fn set_strict_operators(&mut self, strict: bool) {
        self.strict_operators = strict;
    }

    pub fn columns(&self) -> &[String] {
        self.registry.list()
    }

    pub fn row_limit(&self) -> RowLimit {
        self.limit
    }

    pub fn builder(&self) -> QueryBuilder<'_> {
        QueryBuilder::new(self.dialect, &self.target, &self.registry, &self.conditions, self.limit)
    }

    /// Distinct non-null values of `column`, as text, bounded by the row limit.
    pub fn distinct_values(&self, column: Option<&str>) -> Result<Vec<String>> {
        let column = match column {
            Some(c) if !c.is_empty() => c,
            _ => {
                return Err(SearchError::Validation(
                    "The 'column' parameter is missing from your request.".into(),
                ));
            }
        };
        let statement = self.builder().distinct(column)?;
        let rows = self.access.fetch(&statement.sql, &statement.params)?;
        let values = rows
            .into_iter()
            .filter_map(|row| row.into_iter().next().map(|(_, v)| v))
            .filter_map(|v| match v {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .collect();
        Ok(values)
    }

    /// Rows matching `criteria`. `None` slots are criteria the client removed.
    pub fn results(&self, criteria: &[Option<CriterionInput>]) -> Result<Found> {
        if criteria.is_empty() {
            return Err(SearchError::Validation(
                "The 'criteria' parameter is missing from your request.".into(),
            ));
        }
        let mut parsed = Vec::with_capacity(criteria.len());
        let mut notes = Vec::new();
        let mut first = true;
        for slot in criteria {
            match slot {
                None => parsed.push(None),
                Some(input) => {
                    let Parsed { criterion, note } = input.parse(first, self.strict_operators)?;
                    first = false;
                    notes.extend(note);
                    parsed.push(Some(criterion));
                }
            }
        }
        let statement = self.builder().results(&parsed)?;
        let rows = self.access.fetch(&statement.sql, &statement.params)?;
        debug!(rows = rows.len(), "results fetched");
        Ok(Found { rows, notes })
    }

    pub fn handle(&self, request: SearchRequest) -> Envelope {
        let outcome = match request {
            SearchRequest::DistinctValues { column } => self
                .distinct_values(column.as_deref())
                .map(|values| Envelope::ok(values.into_iter().map(Value::String).collect(), &[])),
            SearchRequest::Results { criteria } => self
                .results(criteria.as_deref().unwrap_or_default())
                .map(|found| Envelope::ok(found.rows.into_iter().map(Value::Object).collect(), &found.notes)),
        };
        outcome.unwrap_or_else(|e| {
            warn!(error = %e, "request failed");
            Envelope::failure(&e)
        })
    }

    /// Decode a raw JSON request and handle it; shape errors become a failed envelope.
    pub fn handle_json(&self, request: Value) -> Envelope {
        match serde_json::from_value::<SearchRequest>(request) {
            Ok(request) => self.handle(request),
            Err(e) => {
                let error = SearchError::Validation(format!("Malformed request: {}", e));
                warn!(error = %error, "request rejected");
                Envelope::failure(&error)
            }
        }
    }

    /// The selectable columns, wrapped like any other response.
    pub fn columns_envelope(&self) -> Envelope {
        Envelope::ok(self.columns().iter().cloned().map(Value::String).collect(), &[])
    }
}
