//! Image decoding and JPEG encoding.
//!
//! The decoder sniffs the actual byte format rather than trusting the
//! declared content type, so a PNG uploaded as `image/jpeg` still decodes.
//! Output is always JPEG regardless of the input format.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::io::Reader as ImageReader;
use image::ImageEncoder as _;
use image::{DynamicImage, RgbaImage};

use super::error::WatermarkError;

/// Decode raw bytes into an in-memory raster image.
///
/// The format is guessed from the magic bytes. Fails with a decode error
/// when the bytes are not an image the decoder supports.
pub fn decode_image(data: &[u8]) -> Result<DynamicImage, WatermarkError> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| WatermarkError::Decode(format!("unable to probe format: {}", e)))?;

    reader
        .decode()
        .map_err(|e| WatermarkError::Decode(e.to_string()))
}

/// Encode an RGBA image as JPEG at the given quality.
///
/// JPEG has no alpha channel, so the alpha plane is dropped before
/// encoding.
pub fn encode_jpeg(canvas: &RgbaImage, quality: u8) -> Result<Vec<u8>, WatermarkError> {
    let rgb_data = rgba_to_rgb(canvas);
    let (width, height) = canvas.dimensions();

    let mut output = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut output, quality);
    encoder
        .write_image(&rgb_data, width, height, image::ColorType::Rgb8)
        .map_err(|e| WatermarkError::Encode(e.to_string()))?;

    Ok(output.into_inner())
}

/// Strip the alpha channel from RGBA pixel data.
fn rgba_to_rgb(canvas: &RgbaImage) -> Vec<u8> {
    let mut rgb = Vec::with_capacity((canvas.width() * canvas.height() * 3) as usize);
    for pixel in canvas.pixels() {
        rgb.push(pixel[0]);
        rgb.push(pixel[1]);
        rgb.push(pixel[2]);
    }
    rgb
}
