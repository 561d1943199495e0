//! Storage key generation.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;

use crate::constants::KEY_TOKEN_BYTES;

/// Object name of one upload in the remote store.
///
/// Generated once per accepted upload, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Generate a fresh key for an upload with the given declared MIME type.
    ///
    /// The token is 8 bytes from the operating system's CSPRNG, hex encoded
    /// to 16 characters. The suffix is the raw MIME type, not a file
    /// extension, so keys come out as `3a0f9b2c1d4e5f60.image/png`. Objects
    /// already published under this shape pin it in place.
    pub fn generate(mime: &str) -> Self {
        let mut token = [0u8; KEY_TOKEN_BYTES];
        OsRng.fill_bytes(&mut token);
        StorageKey(format!("{}.{}", hex::encode(token), mime))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
