//! Watermark processor for stamping the logo onto uploads.
//!
//! This module provides the high-level API the upload handler calls: decode
//! the uploaded bytes, load the logo from disk, scale it, composite it at
//! the fixed placement, and encode the result as JPEG.
//!
//! The logo is read and decoded per request. Requests share nothing, so a
//! cold logo file or a swapped file on disk is picked up immediately.
//!
//! # Example
//!
//! ```ignore
//! use logomark::watermark::WatermarkProcessor;
//!
//! let processor = WatermarkProcessor::new("logo/snowball-digital.png");
//! let stamped = processor.apply(&upload_bytes).await?;
//! ```

use std::path::{Path, PathBuf};

use image::DynamicImage;

use super::codec::{decode_image, encode_jpeg};
use super::compositor::{composite, scale_image, BlendMode, BlendOptions};
use super::error::WatermarkError;
use crate::constants::{
    JPEG_QUALITY, LOGO_DEST_OPACITY, LOGO_OFFSET_X, LOGO_OFFSET_Y, LOGO_SCALE,
    LOGO_SOURCE_OPACITY,
};

/// JPEG output of the watermark pipeline.
///
/// Dimensions are those of the uploaded image; compositing never resizes
/// the base.
#[derive(Debug, Clone)]
pub struct WatermarkedImage {
    /// Encoded JPEG bytes.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Watermark processor bound to one logo file.
#[derive(Debug, Clone)]
pub struct WatermarkProcessor {
    logo_path: PathBuf,
}

impl WatermarkProcessor {
    /// Create a processor stamping the logo at `logo_path`.
    pub fn new(logo_path: impl Into<PathBuf>) -> Self {
        Self {
            logo_path: logo_path.into(),
        }
    }

    /// Path of the logo this processor stamps.
    pub fn logo_path(&self) -> &Path {
        &self.logo_path
    }

    /// Run the full pipeline over one uploaded image.
    ///
    /// The upload decode and the logo load have no ordering dependency and
    /// are joined concurrently. The logo is scaled to 30% and blended
    /// destination-over at the fixed offset with both opacities at one
    /// half, then the canvas is encoded as JPEG.
    pub async fn apply(&self, upload: &[u8]) -> Result<WatermarkedImage, WatermarkError> {
        let decode_upload = async { decode_image(upload) };
        let (base, logo) = tokio::try_join!(decode_upload, self.load_logo())?;

        let logo = scale_image(&logo, LOGO_SCALE);

        let mut canvas = base.to_rgba8();
        composite(
            &mut canvas,
            &logo.to_rgba8(),
            LOGO_OFFSET_X,
            LOGO_OFFSET_Y,
            &BlendOptions {
                mode: BlendMode::DestinationOver,
                opacity_source: LOGO_SOURCE_OPACITY,
                opacity_dest: LOGO_DEST_OPACITY,
            },
        );

        let data = encode_jpeg(&canvas, JPEG_QUALITY)?;

        Ok(WatermarkedImage {
            data,
            width: canvas.width(),
            height: canvas.height(),
        })
    }

    async fn load_logo(&self) -> Result<DynamicImage, WatermarkError> {
        let bytes = tokio::fs::read(&self.logo_path).await.map_err(|e| {
            WatermarkError::Logo(format!("{}: {}", self.logo_path.display(), e))
        })?;

        decode_image(&bytes).map_err(|e| WatermarkError::Logo(e.to_string()))
    }
}
