//! Request handlers.
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

pub(crate) mod attribute;
pub(crate) mod convert;
pub(crate) mod upload;

/// Liveness check.
pub(crate) async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
