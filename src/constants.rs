// Constants module - centralized fixed values for the upload pipeline
//
// This module defines the literals the service is contractually tied to:
// validation messages, the storage bucket, and the watermark placement
// parameters. Keeping them in one place makes the pipeline code readable
// and the tests unambiguous.

// =============================================================================
// Server defaults
// =============================================================================

/// Default HTTP listen port when `PORT` is not set
pub const DEFAULT_PORT: u16 = 5051;

/// Fixed port of the secondary TLS listener
pub const TLS_PORT: u16 = 5443;

/// Maximum accepted request body size (10 MB)
pub const DEFAULT_MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

// =============================================================================
// Upload validation
// =============================================================================

/// Multipart field name the uploaded file must arrive under
pub const UPLOAD_FIELD: &str = "image";

/// MIME prefix an upload's declared content type must carry
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Content type assumed for file parts that declare none
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Rejection message when the request carries no file-upload data
pub const MSG_USE_FORM_DATA: &str = "Please use form-data";

/// Rejection message when no file arrives under the expected field
pub const MSG_NO_IMAGE: &str = "No image to upload";

/// Rejection message for non-image content types
pub const MSG_ONLY_IMAGES: &str = "only images allowed for upload";

// =============================================================================
// Storage
// =============================================================================

/// Bucket every upload is stored in
pub const UPLOAD_BUCKET: &str = "snowball-digital";

/// Default storage region when `AWS_REGION` is not set
pub const DEFAULT_REGION: &str = "eu-west-1";

/// Random bytes in a storage key token (16 hex characters once encoded)
pub const KEY_TOKEN_BYTES: usize = 8;

// =============================================================================
// Watermark
// =============================================================================

/// Scale factor applied to the logo before compositing
pub const LOGO_SCALE: f32 = 0.3;

/// Horizontal placement of the logo, in upload coordinates
pub const LOGO_OFFSET_X: i64 = 53;

/// Vertical placement of the logo, in upload coordinates
pub const LOGO_OFFSET_Y: i64 = 128;

/// Opacity applied to the logo during the blend
pub const LOGO_SOURCE_OPACITY: f32 = 0.5;

/// Opacity applied to the upload's alpha channel before the blend
pub const LOGO_DEST_OPACITY: f32 = 0.5;

/// Quality of the JPEG output encoding
pub const JPEG_QUALITY: u8 = 100;

// =============================================================================
// Configuration defaults
// =============================================================================

/// Default path of the watermark logo
pub const DEFAULT_LOGO_PATH: &str = "logo/snowball-digital.png";

/// Default deployment label reported by the greeting endpoint
pub const DEFAULT_STACK_NAME: &str = "Unknown Stack";

/// Environment file loaded before configuration is read
pub const DEFAULT_ENV_FILE: &str = "variable.env";
