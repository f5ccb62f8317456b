use std::sync::Arc;
use axum::{body::Bytes, routing::{get, post}, Router, Json};
use tower_http::cors::{CorsLayer, Any};
use serde_json::Value;
use axum::http::StatusCode;
use tracing::{info, warn};
use crate::error::SearchError;
use crate::service::{Envelope, SearchService};

pub fn router(service: Arc<SearchService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers(Any);
    let columns_service = Arc::clone(&service);
    Router::new()
        .route("/v1/search", post(move |body: Bytes| {
            let svc = Arc::clone(&service);
            async move {
                let started = std::time::Instant::now();
                // Read the body ourselves so a bad body still gets an envelope.
                let req = match serde_json::from_slice::<Value>(&body) {
                    Ok(req) => req,
                    Err(e) => {
                        let error = SearchError::Validation(format!("Malformed request: {}", e));
                        warn!(error=%error, "request rejected");
                        return (StatusCode::OK, Json(Envelope::failure(&error)));
                    }
                };
                // Data access is synchronous, so it runs on the blocking pool.
                let envelope = match tokio::task::spawn_blocking(move || svc.handle_json(req)).await {
                    Ok(envelope) => envelope,
                    Err(e) => {
                        warn!(error=%e, "Join error");
                        Envelope::failure(&SearchError::Execution(e.to_string()))
                    }
                };
                let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                info!(ms=elapsed_ms, success=envelope.success, rows=envelope.data.len(), "search complete");
                // The envelope carries the outcome; the status is always OK.
                (StatusCode::OK, Json(envelope))
            }
        }))
        .route("/v1/columns", get(move || {
            let svc = Arc::clone(&columns_service);
            async move { (StatusCode::OK, Json(svc.columns_envelope())) }
        }))
        .layer(cors)
}
