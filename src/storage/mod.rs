//! Object storage for watermarked uploads.
//!
//! The upload handler talks to storage through the [`ObjectStore`] trait;
//! production uses the S3-backed implementation, tests substitute
//! in-memory stores. Uploads are single attempts with a public-read ACL
//! and the caller-declared content type.

pub mod key;
pub mod s3;

pub use key::StorageKey;
pub use s3::S3ObjectStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the storage backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The upload call failed or was rejected by the backend.
    #[error("upload to object storage failed: {0}")]
    Upload(String),
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Public URL of the stored object, as reported by the backend.
    pub location: String,
}

/// Remote store of uploaded objects.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store one object under `key` with a public-read access policy.
    ///
    /// A single attempt; failures are returned, never retried.
    async fn put(
        &self,
        key: &StorageKey,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError>;
}
