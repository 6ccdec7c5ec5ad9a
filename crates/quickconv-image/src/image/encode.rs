// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared encode step: bitmap → JPEG, PNG or WebP bytes at a quality fraction.
//
// The WebP encoder in `image` is lossless only, so quality below 1.0 is
// applied by quantising the colour channels before encoding.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::webp::WebPEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat, Rgb, RgbImage};
use quickconv_core::error::{QuickconvError, Result};
use quickconv_core::types::MimeType;
use tracing::{debug, instrument};

use super::transform::validate_quality;

/// Map a quality fraction onto the 1–100 scale the encoders use.
pub fn quality_percent(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encode `image` as `mime`.
///
/// PNG ignores `quality`. JPEG has no alpha channel, so transparent pixels
/// are composited onto white first.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn encode(image: &DynamicImage, mime: MimeType, quality: f32) -> Result<Vec<u8>> {
    validate_quality(quality)?;

    let bytes = match mime {
        MimeType::Jpeg => encode_jpeg(image, quality_percent(quality))?,
        MimeType::Png => encode_to_format(image, ImageFormat::Png)?,
        MimeType::Webp => encode_webp(image, quality_percent(quality))?,
        other => {
            return Err(QuickconvError::EncodeFailed(format!(
                "cannot encode images as {other}"
            )));
        }
    };

    debug!(%mime, quality, len = bytes.len(), "encoded");
    Ok(bytes)
}

/// Composite onto an opaque white background.
pub fn flatten_onto_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = f32::from(a) / 255.0;
        let blend = |c: u8| (f32::from(c) * alpha + 255.0 * (1.0 - alpha)).round() as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let rgb = flatten_onto_white(image);
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    rgb.write_with_encoder(encoder)
        .map_err(|err| QuickconvError::EncodeFailed(format!("JPEG encoding failed: {err}")))?;
    Ok(buffer)
}

fn encode_webp(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut rgba = image.to_rgba8();
    quantize_rgb(rgba.as_mut(), quality);

    let mut buffer = Vec::new();
    let (width, height) = rgba.dimensions();
    WebPEncoder::new_lossless(Cursor::new(&mut buffer))
        .encode(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|err| QuickconvError::EncodeFailed(format!("WebP encoding failed: {err}")))?;
    Ok(buffer)
}

/// Reduce each colour channel to fewer levels as quality drops. Alpha is
/// left alone.
fn quantize_rgb(data: &mut [u8], quality: u8) {
    let levels = levels_for_quality(quality);
    if levels >= 256 {
        return;
    }
    let step = 255.0 / (f32::from(levels) - 1.0);
    for pixel in data.chunks_exact_mut(4) {
        for channel in pixel.iter_mut().take(3) {
            let bucket = (f32::from(*channel) / step).round();
            *channel = (bucket * step).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// 2 levels at the bottom of the scale, 256 (no quantisation) at 100, with
/// the curve biased toward finer palettes at high quality.
fn levels_for_quality(quality: u8) -> u16 {
    if quality >= 100 {
        return 256;
    }
    let normalized = f32::from(quality.max(1)) / 100.0;
    (2.0 + normalized * normalized * 254.0).round().clamp(2.0, 256.0) as u16
}

/// Encode through `image`'s format dispatch.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| QuickconvError::EncodeFailed(format!("image encoding failed: {err}")))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8, 255])
        }))
    }

    #[test]
    fn png_round_trips_pixels() {
        let img = gradient(12, 9);
        let bytes = encode(&img, MimeType::Png, 0.1).unwrap();
        let back = image::load_from_memory(&bytes).unwrap();
        assert_eq!(back.to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn jpeg_quality_changes_size() {
        let img = gradient(64, 64);
        let low = encode(&img, MimeType::Jpeg, 0.1).unwrap();
        let high = encode(&img, MimeType::Jpeg, 1.0).unwrap();
        assert!(low.len() < high.len());
        assert_eq!(image::guess_format(&low).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn jpeg_flattens_transparency_onto_white() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0])));
        let bytes = encode(&img, MimeType::Jpeg, 1.0).unwrap();
        let back = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert!(back.get_pixel(4, 4).0.iter().all(|c| *c > 245));
    }

    #[test]
    fn webp_keeps_dimensions_and_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(5, 3, Rgba([10, 200, 30, 40])));
        let bytes = encode(&img, MimeType::Webp, 0.5).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::WebP);
        let back = image::load_from_memory(&bytes).unwrap();
        assert_eq!((back.width(), back.height()), (5, 3));
        assert_eq!(back.to_rgba8().get_pixel(0, 0).0[3], 40);
    }

    #[test]
    fn webp_at_full_quality_is_lossless() {
        let img = gradient(10, 10);
        let bytes = encode(&img, MimeType::Webp, 1.0).unwrap();
        let back = image::load_from_memory(&bytes).unwrap();
        assert_eq!(back.to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn unsupported_targets_fail() {
        let img = gradient(2, 2);
        assert!(matches!(
            encode(&img, MimeType::Gif, 0.5),
            Err(QuickconvError::EncodeFailed(_))
        ));
        assert!(matches!(
            encode(&img, MimeType::Svg, 0.5),
            Err(QuickconvError::EncodeFailed(_))
        ));
    }

    #[test]
    fn out_of_range_quality_fails_before_encoding() {
        let img = gradient(2, 2);
        assert!(matches!(
            encode(&img, MimeType::Jpeg, 1.5),
            Err(QuickconvError::InvalidQuality(_))
        ));
    }

    #[test]
    fn quality_levels() {
        assert_eq!(levels_for_quality(100), 256);
        assert_eq!(levels_for_quality(1), 2);
        assert_eq!(levels_for_quality(50), 66);
    }
}
