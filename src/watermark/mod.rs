//! Watermark module for stamping the service logo onto uploaded images.
//!
//! Every accepted upload passes through this pipeline: decode, scale the
//! logo to 30%, composite it destination-over at a fixed offset with both
//! opacities at one half, encode as JPEG.
//!
//! # Features
//!
//! - Format-sniffing decode of uploaded bytes
//! - Dual-opacity Porter-Duff compositing (source-over and
//!   destination-over) with edge clipping
//! - Per-request logo loading from a configured file path
//! - Fixed-quality JPEG output

pub mod codec;
pub mod compositor;
pub mod error;
pub mod processor;

// Re-export main types for convenience
pub use codec::{decode_image, encode_jpeg};
pub use compositor::{composite, scale_image, BlendMode, BlendOptions};
pub use error::WatermarkError;
pub use processor::{WatermarkProcessor, WatermarkedImage};
