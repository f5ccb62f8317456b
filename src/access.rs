//! The data-access port.
//!
//! The search core never owns a connection: the host hands it something that
//! implements [`DataAccess`] and the core only ever issues read statements
//! through it. [`SqliteAccess`] is the adapter shipped with the crate.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, OpenFlags};
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::error::{Result, SearchError};

/// One result row, keyed by column name in SELECT order.
pub type Row = Map<String, Value>;

pub trait DataAccess: Send + Sync {
    /// Run a read statement, binding `params` positionally.
    fn fetch(&self, sql: &str, params: &[String]) -> Result<Vec<Row>>;
}

pub const DEFAULT_POOL_SIZE: u32 = 8;

static MEMORY_DATABASES: AtomicU64 = AtomicU64::new(0);

/// SQLite adapter. Every `fetch` checks out its own pooled connection, so a
/// slow statement only occupies one of them.
pub struct SqliteAccess {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAccess {
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Self {
        Self { pool }
    }

    /// Open a database file, or an in-memory database for `:memory:`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, DEFAULT_POOL_SIZE)
    }

    /// Like [`SqliteAccess::open`] with an explicit pool size.
    ///
    /// `:memory:` becomes a uniquely named shared-cache database so all
    /// pooled connections see the same tables.
    pub fn open_with<P: AsRef<Path>>(path: P, max_size: u32) -> Result<Self> {
        let path = path.as_ref();
        let in_memory = path == Path::new(":memory:");
        let manager = if in_memory {
            let n = MEMORY_DATABASES.fetch_add(1, Ordering::Relaxed);
            SqliteConnectionManager::file(format!("file:tablesearch-{}?mode=memory&cache=shared", n))
                .with_flags(OpenFlags::default() | OpenFlags::SQLITE_OPEN_URI)
        } else {
            SqliteConnectionManager::file(path)
        };
        let mut builder = Pool::builder().max_size(max_size.max(1)).min_idle(Some(1));
        if in_memory {
            // the shared database only lives while a connection to it is open
            builder = builder.max_lifetime(None).idle_timeout(None);
        }
        let pool = builder
            .build(manager)
            .map_err(|e| SearchError::Initialization(format!("No database connection available: {e}")))?;
        Ok(Self::new(pool))
    }

    fn connection(&self) -> Result<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(|e| SearchError::Execution(e.to_string()))
    }

    /// Run setup SQL (schema, seed data) on a pooled connection.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.connection()?.execute_batch(sql)?;
        Ok(())
    }
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Number(i.into()),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(t) | ValueRef::Blob(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
    }
}

impl DataAccess for SqliteAccess {
    fn fetch(&self, sql: &str, params: &[String]) -> Result<Vec<Row>> {
        debug!(%sql, params = params.len(), "fetch");
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut fetched = Vec::new();
        while let Some(row) = rows.next()? {
            let mut mapped = Row::new();
            for (i, column) in columns.iter().enumerate() {
                mapped.insert(column.clone(), to_json(row.get_ref(i)?));
            }
            fetched.push(mapped);
        }
        Ok(fetched)
    }
}
