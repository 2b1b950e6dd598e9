//! `GET /convert-to-png`
use crate::error::{ApiError, FileNotFoundSnafu, FormatSnafu, MissingInputSnafu, StorageSnafu};
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use dicom_vault::{normalize, png, Container};
use serde::Deserialize;
use snafu::{OptionExt, ResultExt};
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct ConvertQuery {
    filename: Option<String>,
}

/// Convert the pixel data of a stored file into an 8-bit PNG image.
pub(crate) async fn convert_to_png(
    State(state): State<AppState>,
    Query(query): Query<ConvertQuery>,
) -> Result<Response, ApiError> {
    let filename = query
        .filename
        .filter(|s| !s.is_empty())
        .context(MissingInputSnafu {
            message: "Filename is required",
        })?;

    let image = state
        .run_blocking(move |storage| {
            let bytes = match storage.load(&filename) {
                Ok(bytes) => bytes,
                Err(e) if e.is_not_found() => {
                    return FileNotFoundSnafu {
                        message: "File not found",
                    }
                    .fail()
                }
                Err(e) => return Err(e).context(StorageSnafu),
            };
            let container = Container::decode(&bytes).context(FormatSnafu)?;

            let samples = container
                .sample_array()
                .map_err(|e| ApiError::processing(&e))?;
            let normalized = normalize(&samples).map_err(|e| ApiError::processing(&e))?;
            let image = png::encode(&normalized).map_err(|e| ApiError::processing(&e))?;

            debug!(
                "Converted {} with shape {:?} into {} bytes of PNG",
                filename,
                samples.shape(),
                image.len()
            );
            Ok(image)
        })
        .await?;

    Ok(([(header::CONTENT_TYPE, "image/png")], image).into_response())
}
