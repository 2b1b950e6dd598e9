//! Request failures and their HTTP responses.
//!
//! Every failure is reported to the client as a JSON object
//! with a single `error` key.
//! Variants fall into four kinds:
//! validation (400), not found (404),
//! invalid DICOM content (400),
//! and processing or storage failures (500).
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dicom_vault::{error_chain, storage, DecodeError, ParseTagError, TagNotFoundError};
use serde_json::json;
use snafu::Snafu;
use tracing::{debug, error};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApiError {
    /// A required input is missing or empty.
    #[snafu(display("{}", message))]
    MissingInput { message: String },
    /// The tag query is not made of hexadecimal numbers.
    #[snafu(display("{}", source))]
    InvalidTag { source: ParseTagError },
    /// The multipart request body could not be read.
    #[snafu(display("Could not read upload: {}", source.body_text()))]
    Multipart { source: MultipartError },
    /// No such file in storage.
    #[snafu(display("{}", message))]
    FileNotFound { message: String },
    /// No such attribute in the file.
    #[snafu(display("{}", source))]
    TagNotFound { source: TagNotFoundError },
    /// The stored bytes are not a DICOM file.
    #[snafu(display("Error processing DICOM file; {}", source.reason()))]
    Format { source: DecodeError },
    /// Pixel data could not be turned into an image.
    #[snafu(display("Failed to convert to PNG: {}", message))]
    Processing { message: String },
    #[snafu(display("Storage failure: {}", error_chain(source)))]
    Storage { source: storage::Error },
    #[snafu(display("Request processing failed: {}", source))]
    Task { source: tokio::task::JoinError },
}

impl ApiError {
    /// Build a processing error out of any underlying failure.
    pub(crate) fn processing(error: &dyn std::error::Error) -> Self {
        ApiError::Processing {
            message: error_chain(error),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput { .. }
            | ApiError::InvalidTag { .. }
            | ApiError::Format { .. } => StatusCode::BAD_REQUEST,
            ApiError::Multipart { source } => source.status(),
            ApiError::FileNotFound { .. } | ApiError::TagNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Processing { .. } | ApiError::Storage { .. } | ApiError::Task { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!("{}", message);
        } else {
            debug!("{}: {}", status, message);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        let err = ApiError::MissingInput {
            message: "Missing file".into(),
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Missing file");

        let err = ApiError::InvalidTag {
            source: "zz".parse::<dicom_vault::TagKey>().unwrap_err(),
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().starts_with("Invalid structure for tag"));

        let err = ApiError::FileNotFound {
            message: "File not found".into(),
        };
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = ApiError::Processing {
            message: "boom".into(),
        };
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to convert to PNG: boom");
    }

    #[test]
    fn format_errors_embed_decoder_reason() {
        let source = dicom_vault::Container::decode(b"Invalid content").unwrap_err();
        let reason = source.reason();
        let err = ApiError::Format { source };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            format!("Error processing DICOM file; {}", reason)
        );
    }
}
