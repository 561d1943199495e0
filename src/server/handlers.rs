//! HTTP request handlers.
//!
//! Two routes: the informational greeting at `/` and the upload pipeline
//! at `/api/upload`. Validation is ordered and short-circuiting; the first
//! failing check determines the response message.

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::constants::{
    FALLBACK_CONTENT_TYPE, IMAGE_MIME_PREFIX, MSG_NO_IMAGE, MSG_ONLY_IMAGES, MSG_USE_FORM_DATA,
    UPLOAD_FIELD,
};
use crate::error::UploadError;
use crate::storage::StorageKey;

/// One uploaded file pulled out of a multipart body.
#[derive(Debug)]
pub struct UploadRequest {
    /// Raw file bytes.
    pub data: Bytes,
    /// Declared content type; `application/octet-stream` when the part
    /// declares none.
    pub content_type: String,
    /// Original file name, for logging only.
    pub file_name: String,
}

/// JSON body of a successful upload.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadAccepted {
    pub status: u16,
    /// Public URL of the stored object.
    pub url: String,
}

/// `GET /` - greeting identifying the running instance.
pub async fn greeting(State(state): State<AppState>) -> Json<String> {
    Json(state.greeting.clone())
}

/// `POST /api/upload` - validate, watermark, store, respond with the URL.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadAccepted>, UploadError> {
    let mut multipart = multipart.map_err(|_| UploadError::BadRequest(MSG_USE_FORM_DATA))?;
    let upload = read_upload(&mut multipart).await?;

    if !upload.content_type.starts_with(IMAGE_MIME_PREFIX) {
        return Err(UploadError::BadRequest(MSG_ONLY_IMAGES));
    }

    let key = StorageKey::generate(&upload.content_type);
    tracing::debug!(
        key = %key,
        file_name = %upload.file_name,
        content_type = %upload.content_type,
        size = upload.data.len(),
        "processing upload"
    );

    let stamped = state.processor.apply(&upload.data).await?;

    // The object is stored under the upload's declared content type, not
    // image/jpeg, although the body has been re-encoded. Objects already
    // published carry the declared type, so it stays.
    let stored = state
        .store
        .put(&key, stamped.data, &upload.content_type)
        .await?;

    tracing::info!(
        key = %key,
        url = %stored.location,
        width = stamped.width,
        height = stamped.height,
        "upload stored"
    );

    Ok(Json(UploadAccepted {
        status: StatusCode::OK.as_u16(),
        url: stored.location,
    }))
}

/// Drain the multipart body and pick out the upload.
///
/// Only parts carrying a file name count as file-upload data; plain value
/// fields are skipped. A body with no file parts at all fails the same way
/// a non-multipart body does, and a malformed multipart stream is treated
/// as carrying no usable form data.
async fn read_upload(multipart: &mut Multipart) -> Result<UploadRequest, UploadError> {
    let mut upload: Option<UploadRequest> = None;
    let mut saw_file = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| UploadError::BadRequest(MSG_USE_FORM_DATA))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        saw_file = true;

        if field.name() != Some(UPLOAD_FIELD) || upload.is_some() {
            continue;
        }

        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string());

        let data = field
            .bytes()
            .await
            .map_err(|_| UploadError::BadRequest(MSG_USE_FORM_DATA))?;

        upload = Some(UploadRequest {
            data,
            content_type,
            file_name,
        });
    }

    if !saw_file {
        return Err(UploadError::BadRequest(MSG_USE_FORM_DATA));
    }

    upload.ok_or(UploadError::BadRequest(MSG_NO_IMAGE))
}
