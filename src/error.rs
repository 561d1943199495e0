// Error types module

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::storage::StorageError;
use crate::watermark::WatermarkError;

/// Centralized error type for the upload pipeline
///
/// Categorizes request failures into 3 main types. Every kind is reported
/// to the caller as HTTP 400 with a JSON body; the service never answers
/// 500 and never terminates over a failed request.
#[derive(Debug)]
pub enum UploadError {
    /// Client input errors (not form-data, missing field, non-image MIME)
    BadRequest(&'static str),

    /// Pipeline errors (decode, compositing, encode failures)
    Processing(WatermarkError),

    /// Storage backend errors (upload failed or rejected)
    Backend(StorageError),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::BadRequest(msg) => write!(f, "{}", msg),
            UploadError::Processing(err) => write!(f, "{}", err),
            UploadError::Backend(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for UploadError {}

impl From<WatermarkError> for UploadError {
    fn from(err: WatermarkError) -> Self {
        UploadError::Processing(err)
    }
}

impl From<StorageError> for UploadError {
    fn from(err: StorageError) -> Self {
        UploadError::Backend(err)
    }
}

/// JSON body of a failed request.
#[derive(Serialize)]
struct ErrorBody {
    status: u16,
    message: String,
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match &self {
            UploadError::BadRequest(reason) => {
                tracing::warn!(reason, "upload rejected")
            }
            UploadError::Processing(err) => {
                tracing::warn!(error = %err, "upload processing failed")
            }
            UploadError::Backend(err) => {
                tracing::error!(error = %err, "storage upload failed")
            }
        }

        let body = ErrorBody {
            status: StatusCode::BAD_REQUEST.as_u16(),
            message: self.to_string(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UploadError::BadRequest("Please use form-data");
        assert_eq!(err.to_string(), "Please use form-data");

        let err = UploadError::Processing(WatermarkError::Decode("bad magic".to_string()));
        assert_eq!(err.to_string(), "Failed to decode image: bad magic");

        let err =
            UploadError::Backend(StorageError::Upload("connection refused".to_string()));
        assert_eq!(
            err.to_string(),
            "upload to object storage failed: connection refused"
        );
    }

    #[test]
    fn test_every_variant_maps_to_400() {
        let cases = vec![
            UploadError::BadRequest("No image to upload"),
            UploadError::Processing(WatermarkError::Encode("boom".to_string())),
            UploadError::Backend(StorageError::Upload("boom".to_string())),
        ];

        for err in cases {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn test_response_body_carries_status_and_message() {
        let response = UploadError::BadRequest("No image to upload").into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["status"], 400);
        assert_eq!(body["message"], "No image to upload");
    }
}
