//! Watermark error types.
//!
//! Defines errors that can occur during watermark processing.

use std::fmt;

/// Errors that can occur during watermark processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatermarkError {
    /// Failed to read or decode the logo file
    Logo(String),

    /// Failed to decode the uploaded image
    Decode(String),

    /// Failed to encode the composited image
    Encode(String),
}

impl fmt::Display for WatermarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Logo(msg) => write!(f, "Failed to load watermark logo: {}", msg),
            Self::Decode(msg) => write!(f, "Failed to decode image: {}", msg),
            Self::Encode(msg) => write!(f, "Failed to encode image: {}", msg),
        }
    }
}

impl std::error::Error for WatermarkError {}
