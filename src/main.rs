//! Serves ad-hoc filter searches over one SQLite table or view.
//!
//! Usage: `tablesearch [config-file]`. Without an argument `tablesearch.*` in
//! the working directory is read if present; `TABLESEARCH_*` environment
//! variables override either. Logging honours `RUST_LOG`.

use std::sync::Arc;

use tablesearch::access::SqliteAccess;
use tablesearch::server;
use tablesearch::service::SearchService;
use tablesearch::settings::Settings;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run().await {
        error!(error = %e, "tablesearch stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1);
    let settings = Settings::load(path.as_deref())?;
    let access = SqliteAccess::open_with(&settings.database, settings.pool_size)?;
    let service = SearchService::from_settings(&settings, Arc::new(access))?;
    let app = server::router(Arc::new(service));
    let listener = tokio::net::TcpListener::bind(&settings.bind).await?;
    info!(bind = %settings.bind, target = %settings.target, dialect = %settings.dialect, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
