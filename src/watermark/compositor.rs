//! Watermark compositor for blending a logo onto uploaded images.
//!
//! This module implements the per-pixel blend the service stamps uploads
//! with: the destination opacity is applied to the alpha channel of the
//! whole base image first, then the overlay is blended into its clipped
//! region using Porter-Duff source-over or destination-over with a
//! per-pixel source opacity.
//!
//! Destination-over draws the overlay *behind* existing content, so on a
//! fully opaque base the logo only becomes visible because the base alpha
//! has been reduced first.

use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

/// How overlay pixels combine with base pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// Overlay is drawn on top of the base.
    SourceOver,
    /// Overlay is drawn behind the base; base pixels take precedence.
    DestinationOver,
}

/// Parameters of one composite operation.
#[derive(Debug, Clone, Copy)]
pub struct BlendOptions {
    pub mode: BlendMode,
    /// Opacity multiplied into each overlay pixel's alpha (0.0 to 1.0).
    pub opacity_source: f32,
    /// Opacity multiplied into the whole base image's alpha before
    /// blending (0.0 to 1.0).
    pub opacity_dest: f32,
}

/// Composite `overlay` onto `base` with its top-left corner at `(x, y)`.
///
/// Overlay regions outside the base are clipped; negative offsets are
/// valid. The destination-opacity pass touches every base pixel even when
/// the overlay is clipped away entirely.
pub fn composite(
    base: &mut RgbaImage,
    overlay: &RgbaImage,
    x: i64,
    y: i64,
    options: &BlendOptions,
) {
    let opacity_source = options.opacity_source.clamp(0.0, 1.0);
    let opacity_dest = options.opacity_dest.clamp(0.0, 1.0);

    if opacity_dest < 1.0 {
        for pixel in base.pixels_mut() {
            pixel[3] = (pixel[3] as f32 * opacity_dest) as u8;
        }
    }

    let base_width = base.width() as i64;
    let base_height = base.height() as i64;
    let overlay_width = overlay.width() as i64;
    let overlay_height = overlay.height() as i64;

    // Calculate the visible region (clamp to base bounds)
    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = (x + overlay_width).min(base_width);
    let y_end = (y + overlay_height).min(base_height);

    for by in y_start..y_end {
        for bx in x_start..x_end {
            // Source coordinates in the overlay image
            let ox = (bx - x) as u32;
            let oy = (by - y) as u32;

            let overlay_pixel = overlay.get_pixel(ox, oy);
            let base_pixel = base.get_pixel(bx as u32, by as u32);

            let blended = blend_pixels(*overlay_pixel, *base_pixel, options.mode, opacity_source);
            base.put_pixel(bx as u32, by as u32, blended);
        }
    }
}

/// Blend one overlay pixel with one base pixel.
///
/// Channel math follows Porter-Duff in straight (non-premultiplied) alpha:
///
/// - source-over:      `out = (src * src_a + dst * dst_a * (1 - src_a)) / out_a`
/// - destination-over: `out = (dst * dst_a + src * src_a * (1 - dst_a)) / out_a`
///
/// with `out_a = dst_a + src_a - dst_a * src_a` in both cases.
fn blend_pixels(source: Rgba<u8>, dest: Rgba<u8>, mode: BlendMode, opacity_source: f32) -> Rgba<u8> {
    let src_alpha = (source[3] as f32 / 255.0) * opacity_source;
    let dst_alpha = dest[3] as f32 / 255.0;

    let out_alpha = dst_alpha + src_alpha - dst_alpha * src_alpha;

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |src: u8, dst: u8| -> u8 {
        let src_f = src as f32 / 255.0;
        let dst_f = dst as f32 / 255.0;
        let result = match mode {
            BlendMode::SourceOver => {
                (src_f * src_alpha + dst_f * dst_alpha * (1.0 - src_alpha)) / out_alpha
            }
            BlendMode::DestinationOver => {
                (dst_f * dst_alpha + src_f * src_alpha * (1.0 - dst_alpha)) / out_alpha
            }
        };
        (result * 255.0).clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(source[0], dest[0]),
        blend_channel(source[1], dest[1]),
        blend_channel(source[2], dest[2]),
        (out_alpha * 255.0).clamp(0.0, 255.0) as u8,
    ])
}

/// Scale an image by `factor`, rounding target dimensions to the nearest
/// pixel (never below 1x1).
///
/// A factor of 1.0 is the identity and returns the input pixels untouched,
/// with no resampling pass.
pub fn scale_image(source: &DynamicImage, factor: f32) -> DynamicImage {
    if (factor - 1.0).abs() < f32::EPSILON {
        return source.clone();
    }

    let (width, height) = source.dimensions();
    let scaled_width = ((width as f32 * factor).round() as u32).max(1);
    let scaled_height = ((height as f32 * factor).round() as u32).max(1);

    source.resize_exact(
        scaled_width,
        scaled_height,
        image::imageops::FilterType::Lanczos3,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const OPAQUE_RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn create_test_image(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(width, height, color)
    }

    fn dst_over(opacity_source: f32, opacity_dest: f32) -> BlendOptions {
        BlendOptions {
            mode: BlendMode::DestinationOver,
            opacity_source,
            opacity_dest,
        }
    }

    fn src_over(opacity_source: f32, opacity_dest: f32) -> BlendOptions {
        BlendOptions {
            mode: BlendMode::SourceOver,
            opacity_source,
            opacity_dest,
        }
    }

    // Test: Destination-over against an opaque base hides the overlay
    #[test]
    fn test_dst_over_opaque_base_is_unchanged() {
        let mut base = create_test_image(40, 40, WHITE);
        let overlay = create_test_image(10, 10, OPAQUE_RED);

        composite(&mut base, &overlay, 5, 5, &dst_over(1.0, 1.0));

        let pixel = base.get_pixel(8, 8);
        assert_eq!(*pixel, WHITE);
    }

    // Test: Destination-over shows through where the base is transparent
    #[test]
    fn test_dst_over_transparent_base_shows_overlay() {
        let mut base = create_test_image(40, 40, Rgba([0, 0, 0, 0]));
        let overlay = create_test_image(10, 10, OPAQUE_RED);

        composite(&mut base, &overlay, 0, 0, &dst_over(1.0, 1.0));

        let pixel = base.get_pixel(5, 5);
        assert_eq!(*pixel, OPAQUE_RED);
    }

    // Test: Dual half opacity tints an opaque base with the overlay color
    #[test]
    fn test_dst_over_dual_half_opacity_tints_opaque_base() {
        let mut base = create_test_image(40, 40, WHITE);
        let overlay = create_test_image(10, 10, OPAQUE_RED);

        composite(&mut base, &overlay, 0, 0, &dst_over(0.5, 0.5));

        // Inside the overlay: white weighted by halved base alpha, red by
        // the source opacity. Works out to roughly two thirds white, one
        // third red per channel.
        let inside = base.get_pixel(5, 5);
        assert!(inside[0] >= 254, "red channel should stay high: {:?}", inside);
        assert!(
            inside[1] >= 165 && inside[1] <= 175,
            "green should blend toward red: {:?}",
            inside
        );
        assert!(
            inside[2] >= 165 && inside[2] <= 175,
            "blue should blend toward red: {:?}",
            inside
        );
        assert!(
            inside[3] >= 190 && inside[3] <= 192,
            "alpha should recombine above one half: {:?}",
            inside
        );

        // Outside the overlay only the destination-opacity pass applies
        let outside = base.get_pixel(30, 30);
        assert_eq!(outside[0], 255);
        assert_eq!(outside[3], 127);
    }

    // Test: Destination opacity touches the whole base even when the
    // overlay is clipped away entirely
    #[test]
    fn test_dest_opacity_applies_when_overlay_is_off_canvas() {
        let mut base = create_test_image(20, 20, WHITE);
        let overlay = create_test_image(10, 10, OPAQUE_RED);

        composite(&mut base, &overlay, 100, 100, &dst_over(0.5, 0.5));

        let pixel = base.get_pixel(10, 10);
        assert_eq!(pixel[0], 255);
        assert_eq!(pixel[3], 127);
    }

    // Test: Source-over with an opaque overlay replaces base pixels
    #[test]
    fn test_src_over_opaque_overlay_replaces_base() {
        let mut base = create_test_image(40, 40, WHITE);
        let overlay = create_test_image(10, 10, Rgba([0, 0, 255, 255]));

        composite(&mut base, &overlay, 15, 15, &src_over(1.0, 1.0));

        let inside = base.get_pixel(20, 20);
        assert_eq!(*inside, Rgba([0, 0, 255, 255]));

        let outside = base.get_pixel(5, 5);
        assert_eq!(*outside, WHITE);
    }

    // Test: Half source opacity averages overlay into the base
    #[test]
    fn test_src_over_half_opacity_blends() {
        let mut base = create_test_image(40, 40, Rgba([0, 0, 0, 255]));
        let overlay = create_test_image(10, 10, WHITE);

        composite(&mut base, &overlay, 0, 0, &src_over(0.5, 1.0));

        let pixel = base.get_pixel(5, 5);
        assert!(pixel[0] > 100 && pixel[0] < 160);
        assert!(pixel[1] > 100 && pixel[1] < 160);
        assert!(pixel[2] > 100 && pixel[2] < 160);
        assert_eq!(pixel[3], 255);
    }

    // Test: Zero source opacity leaves base pixels alone
    #[test]
    fn test_zero_source_opacity_has_no_effect() {
        let mut base = create_test_image(40, 40, WHITE);
        let overlay = create_test_image(10, 10, OPAQUE_RED);

        composite(&mut base, &overlay, 0, 0, &src_over(0.0, 1.0));

        assert_eq!(*base.get_pixel(5, 5), WHITE);
    }

    // Test: Overlay clipping at the bottom-right edge
    #[test]
    fn test_overlay_clipping_at_edges() {
        let mut base = create_test_image(50, 50, Rgba([0, 0, 0, 0]));
        let overlay = create_test_image(30, 30, OPAQUE_RED);

        // Only the top-left 10x10 of the overlay lands on the base
        composite(&mut base, &overlay, 40, 40, &dst_over(1.0, 1.0));

        assert_eq!(*base.get_pixel(45, 45), OPAQUE_RED);
        assert_eq!(*base.get_pixel(30, 30), Rgba([0, 0, 0, 0]));
    }

    // Test: Negative offsets clip the overlay's top-left corner
    #[test]
    fn test_negative_offset_clipping() {
        let mut base = create_test_image(50, 50, Rgba([0, 0, 0, 0]));
        let overlay = create_test_image(30, 30, OPAQUE_RED);

        composite(&mut base, &overlay, -20, -20, &dst_over(1.0, 1.0));

        assert_eq!(*base.get_pixel(5, 5), OPAQUE_RED);
        assert_eq!(*base.get_pixel(20, 20), Rgba([0, 0, 0, 0]));
    }

    // Test: Transparent overlay on transparent base stays transparent
    #[test]
    fn test_zero_output_alpha_is_fully_transparent() {
        let result = blend_pixels(
            Rgba([255, 0, 0, 0]),
            Rgba([0, 255, 0, 0]),
            BlendMode::DestinationOver,
            1.0,
        );
        assert_eq!(result, Rgba([0, 0, 0, 0]));
    }

    // Test: Opacities outside 0..1 are clamped instead of misbehaving
    #[test]
    fn test_out_of_range_opacities_are_clamped() {
        let mut base = create_test_image(10, 10, WHITE);
        let overlay = create_test_image(10, 10, OPAQUE_RED);

        composite(&mut base, &overlay, 0, 0, &src_over(7.5, 3.0));

        // Clamps to source opacity 1.0 over an untouched base
        assert_eq!(*base.get_pixel(5, 5), OPAQUE_RED);
    }

    // Test: Scaling by 1.0 is the identity
    #[test]
    fn test_scale_by_one_is_identity() {
        let original = DynamicImage::ImageRgba8(create_test_image(13, 7, Rgba([1, 2, 3, 4])));
        let scaled = scale_image(&original, 1.0);

        assert_eq!(scaled.dimensions(), (13, 7));
        assert_eq!(
            scaled.to_rgba8().into_raw(),
            original.to_rgba8().into_raw()
        );
    }

    // Test: Scaling to 30% rounds dimensions to the nearest pixel
    #[test]
    fn test_scale_rounds_dimensions() {
        let original = DynamicImage::ImageRgba8(create_test_image(40, 10, WHITE));
        let scaled = scale_image(&original, 0.3);
        assert_eq!(scaled.dimensions(), (12, 3));

        let original = DynamicImage::ImageRgba8(create_test_image(5, 5, WHITE));
        let scaled = scale_image(&original, 0.5);
        assert_eq!(scaled.dimensions(), (3, 3));
    }

    // Test: Tiny images never scale to a zero dimension
    #[test]
    fn test_scale_never_produces_zero_dimension() {
        let original = DynamicImage::ImageRgba8(create_test_image(1, 1, WHITE));
        let scaled = scale_image(&original, 0.3);
        assert_eq!(scaled.dimensions(), (1, 1));
    }
}
