//! S3-backed object store.
//!
//! One client is built at startup from the storage configuration. SDK
//! retries are disabled: an upload is attempted exactly once and its
//! outcome reported to the caller.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;

use super::key::StorageKey;
use super::{ObjectStore, StorageError, StoredObject};
use crate::config::StorageConfig;
use crate::constants::UPLOAD_BUCKET;

/// Object store writing to the fixed upload bucket in S3.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    url_base: String,
}

impl S3ObjectStore {
    /// Build the store from configuration.
    ///
    /// Static credentials are used when both keys are configured;
    /// otherwise the SDK's default provider chain applies. A custom
    /// endpoint switches object URLs to path style.
    pub async fn connect(config: &StorageConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .retry_config(aws_config::retry::RetryConfig::disabled());

        if let (Some(key_id), Some(secret)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            loader = loader.credentials_provider(aws_credential_types::Credentials::new(
                key_id,
                secret,
                None,
                None,
                "logomark-env",
            ));
        }

        if let Some(endpoint) = &config.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;

        Self {
            client: aws_sdk_s3::Client::new(&sdk_config),
            bucket: UPLOAD_BUCKET.to_string(),
            url_base: public_url_base(&config.region, config.endpoint.as_deref(), UPLOAD_BUCKET),
        }
    }

    /// Public URL of an object in this store.
    pub fn object_url(&self, key: &StorageKey) -> String {
        format!("{}/{}", self.url_base, encode_key(key.as_str()))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        key: &StorageKey,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .body(ByteStream::from(body))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| StorageError::Upload(format!("{e}")))?;

        Ok(StoredObject {
            location: self.object_url(key),
        })
    }
}

/// Base URL objects in `bucket` are publicly reachable under.
///
/// AWS endpoints use the virtual-hosted style
/// `https://{bucket}.s3.{region}.amazonaws.com`; custom endpoints use the
/// path style `{endpoint}/{bucket}`.
fn public_url_base(region: &str, endpoint: Option<&str>, bucket: &str) -> String {
    match endpoint {
        Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), bucket),
        None => format!("https://{}.s3.{}.amazonaws.com", bucket, region),
    }
}

/// Percent-encode a key for use in a URL path, preserving `/` between
/// segments. The MIME suffix of upload keys contains a slash, so the
/// public URL carries it as a path separator the same way the hosted
/// store reports it.
fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test: AWS endpoints get virtual-hosted-style URLs
    #[test]
    fn test_url_base_virtual_hosted_style() {
        let base = public_url_base("eu-west-1", None, "snowball-digital");
        assert_eq!(base, "https://snowball-digital.s3.eu-west-1.amazonaws.com");
    }

    // Test: Custom endpoints get path-style URLs
    #[test]
    fn test_url_base_path_style_for_custom_endpoint() {
        let base = public_url_base("eu-west-1", Some("http://localhost:9000"), "snowball-digital");
        assert_eq!(base, "http://localhost:9000/snowball-digital");

        let base = public_url_base("eu-west-1", Some("http://localhost:9000/"), "snowball-digital");
        assert_eq!(base, "http://localhost:9000/snowball-digital");
    }

    // Test: Key encoding keeps the slash separating the MIME suffix
    #[test]
    fn test_encode_key_preserves_slash() {
        assert_eq!(
            encode_key("3a0f9b2c1d4e5f60.image/png"),
            "3a0f9b2c1d4e5f60.image/png"
        );
    }

    // Test: Reserved characters in segments are percent-encoded
    #[test]
    fn test_encode_key_escapes_reserved_characters() {
        assert_eq!(
            encode_key("3a0f9b2c1d4e5f60.image/svg+xml"),
            "3a0f9b2c1d4e5f60.image/svg%2Bxml"
        );
        assert_eq!(encode_key("with space/x"), "with%20space/x");
    }
}
