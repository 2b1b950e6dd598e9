//! HTTP service for uploading DICOM files,
//! reading their header attributes
//! and converting their pixel data to PNG.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /upload` | store a file sent as the multipart field `file` |
//! | `GET /dicom-header-attribute?filename=&tag=` | render one header attribute |
//! | `GET /convert-to-png?filename=` | 8-bit grayscale PNG of the pixel data |
//! | `GET /health` | liveness check |
//! | `GET /openapi.json` | OpenAPI description of the routes above |
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use dicom_vault::Storage;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod config;
mod docs;
pub mod error;
mod routes;

use config::ServerOptions;
use error::{ApiError, TaskSnafu};
use snafu::ResultExt;

/// State shared by all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    storage: Arc<Storage>,
}

impl AppState {
    pub fn new(storage: Storage) -> Self {
        AppState {
            storage: Arc::new(storage),
        }
    }

    /// Run synchronous storage and decoding work off the async executor.
    pub(crate) async fn run_blocking<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Storage) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || f(&storage))
            .await
            .context(TaskSnafu)?
    }
}

/// Build the application router.
pub fn create_app(storage: Storage, options: &ServerOptions) -> Router {
    let mut app = Router::new()
        .route("/upload", post(routes::upload::upload))
        .route(
            "/dicom-header-attribute",
            get(routes::attribute::header_attribute),
        )
        .route("/convert-to-png", get(routes::convert::convert_to_png))
        .route("/health", get(routes::health))
        .route("/openapi.json", get(docs::openapi_document));

    match options.api_docs() {
        Some(api_docs) => app = app.merge(docs::router(&api_docs)),
        None => warn!("Swagger environment variables are not set."),
    }

    app.layer(DefaultBodyLimit::max(options.max_upload_size))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(storage))
}
