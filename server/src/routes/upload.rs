//! `POST /upload`
use crate::error::{ApiError, FormatSnafu, MissingInputSnafu, MultipartSnafu, StorageSnafu};
use crate::AppState;
use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::Json;
use dicom_vault::{sanitize_filename, validate, ValidateError};
use serde_json::{json, Value};
use snafu::{ensure, OptionExt, ResultExt};
use tracing::info;

/// Name of the multipart field holding the file.
const FILE_FIELD: &str = "file";

/// Store the uploaded file, then check that it is DICOM.
///
/// A file which does not decode is removed again
/// and the decoder's complaint is returned to the client.
pub(crate) async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let mut multipart = multipart
        .ok()
        .context(MissingInputSnafu { message: "Missing file" })?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.context(MultipartSnafu)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        // a part without a file name is a plain form value
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let bytes = field.bytes().await.context(MultipartSnafu)?;
        upload = Some((file_name, bytes));
        break;
    }
    let (file_name, bytes) = upload.context(MissingInputSnafu { message: "Missing file" })?;

    let name = sanitize_filename(&file_name);
    ensure!(
        !name.is_empty(),
        MissingInputSnafu {
            message: "No selected file"
        }
    );

    state
        .run_blocking(move |storage| {
            storage.save(&name, &bytes).context(StorageSnafu)?;
            match validate(storage, &name) {
                Ok(_) => {
                    info!("Stored {} ({} bytes)", name, bytes.len());
                    Ok(())
                }
                Err(ValidateError::Format { source, .. }) => Err(source).context(FormatSnafu),
                Err(ValidateError::Load { source, .. }) => Err(source).context(StorageSnafu),
            }
        })
        .await?;

    Ok(Json(json!({ "message": "Sucessfully uploaded" })))
}
