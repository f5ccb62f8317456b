use config::{Config, Environment, File};
use serde::Deserialize;

use crate::access::DEFAULT_POOL_SIZE;
use crate::builder::DEFAULT_ROW_LIMIT;
use crate::dialect::DialectKind;
use crate::error::Result;

pub const CONFIG_FILE_NAME: &str = "tablesearch";
pub const ENV_PREFIX: &str = "TABLESEARCH";

fn default_database() -> String {
    ":memory:".to_string()
}
fn default_row_limit() -> i64 {
    i64::from(DEFAULT_ROW_LIMIT)
}
fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}
fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// Host configuration for one search service.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// SQLite database path, `:memory:` for a scratch database
    #[serde(default = "default_database")]
    pub database: String,
    /// Connections kept for concurrent requests
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    /// Table, view or subquery searched
    pub target: String,
    #[serde(default)]
    pub dialect: DialectKind,
    #[serde(default = "default_row_limit")]
    pub row_limit: i64,
    /// Columns hidden from clients, matched case-insensitively
    #[serde(default)]
    pub omit_columns: Vec<String>,
    /// Trusted SQL fragments ANDed onto every results query
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub strict_operators: bool,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Settings {
    /// Read settings from `path` (or `tablesearch.*` in the working directory
    /// when no path is given), then let `TABLESEARCH_*` variables override.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(p) => File::with_name(p).required(true),
            None => File::with_name(CONFIG_FILE_NAME).required(false),
        };
        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("omit_columns"),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
