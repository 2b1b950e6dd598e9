//! `GET /dicom-header-attribute`
use crate::error::{
    ApiError, FileNotFoundSnafu, FormatSnafu, InvalidTagSnafu, MissingInputSnafu, StorageSnafu,
    TagNotFoundSnafu,
};
use crate::AppState;
use axum::extract::{Query, State};
use axum::Json;
use dicom_vault::{Container, TagKey};
use serde::Deserialize;
use serde_json::{json, Value};
use snafu::{OptionExt, ResultExt};

#[derive(Debug, Deserialize)]
pub(crate) struct AttributeQuery {
    filename: Option<String>,
    tag: Option<String>,
}

/// Render one attribute of a stored file's header.
pub(crate) async fn header_attribute(
    State(state): State<AppState>,
    Query(query): Query<AttributeQuery>,
) -> Result<Json<Value>, ApiError> {
    let filename = query
        .filename
        .filter(|s| !s.is_empty())
        .context(MissingInputSnafu {
            message: "Please specify filename",
        })?;
    let tag = query
        .tag
        .filter(|s| !s.is_empty())
        .context(MissingInputSnafu {
            message: "Please specify tag",
        })?;

    let not_found = format!("{} not found", filename);

    let attribute = state
        .run_blocking(move |storage| {
            let bytes = match storage.load(&filename) {
                Ok(bytes) => bytes,
                Err(e) if e.is_not_found() => {
                    return FileNotFoundSnafu { message: not_found }.fail()
                }
                Err(e) => return Err(e).context(StorageSnafu),
            };
            let container = Container::decode(&bytes).context(FormatSnafu)?;
            let key = TagKey::parse(&tag).context(InvalidTagSnafu)?;
            container.attribute(&key).context(TagNotFoundSnafu)
        })
        .await?;

    Ok(Json(json!({ "attribute": attribute })))
}
