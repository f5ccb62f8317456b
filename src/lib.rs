//! Tablesearch – incrementally built filter searches over a single table or view.
//!
//! A client accumulates criteria one at a time: a column, an operator
//! (`equals`, `contains`, `does not equal`), a value and the conjunction that
//! joins it to what came before. Every round-trip sends the whole ordered list
//! to a [`service::SearchService`], which checks it against live column
//! metadata, composes one bounded, parameterized statement and returns the
//! matching rows. A second, simpler request lists the distinct values of a
//! column so a client can offer suggestions.
//!
//! ## Modules
//! * [`dialect`] – Identifier quoting, placeholders and row limiting per database.
//! * [`target`] – The table, view or host subquery searched.
//! * [`access`] – The data-access port and its SQLite adapter.
//! * [`registry`] – The ordered list of selectable columns.
//! * [`criteria`] – Operators, conjunctions and criteria as typed values.
//! * [`conditions`] – Host fragments applied to every results query.
//! * [`builder`] – Composition of all of the above into a [`builder::Statement`].
//! * [`service`] – Request dispatch and the response envelope.
//! * [`settings`] – Host configuration.
//! * [`server`] – HTTP exposure of the protocol.
//!
//! ## Quick Start
//! ```
//! use std::sync::Arc;
//! use serde_json::json;
//! use tablesearch::{access::SqliteAccess, dialect::DialectKind, service::SearchService};
//! let access = SqliteAccess::open(":memory:").unwrap();
//! access.execute_batch("CREATE TABLE people (name TEXT, dept TEXT); INSERT INTO people VALUES ('Anna', 'X'), ('Bob', 'Y');").unwrap();
//! let service = SearchService::new("people", DialectKind::MySql, Arc::new(access)).unwrap();
//! let envelope = service.handle_json(json!({
//!     "action": "getResults",
//!     "criteria": [{ "column": "name", "operator": "contains", "value": "an", "conjunction": null }]
//! }));
//! assert!(envelope.success);
//! assert_eq!(envelope.data.len(), 1);
//! ```
//!
//! ## Known Limitations
//! Mixed AND/OR sequences are folded strictly left to right; there is no way
//! to express grouping other than by ordering the criteria.

pub mod access;
pub mod builder;
pub mod conditions;
pub mod criteria;
pub mod dialect;
pub mod error;
pub mod registry;
pub mod server;
pub mod service;
pub mod settings;
pub mod target;
