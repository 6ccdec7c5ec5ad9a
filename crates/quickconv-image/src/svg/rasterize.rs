// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SVG → raster. The document is parsed with usvg, rendered with resvg onto a
// tiny-skia pixmap, then handed to the shared encode step.

use image::{DynamicImage, RgbaImage};
use quickconv_core::error::{QuickconvError, Result};
use quickconv_core::geometry::MAX_SURFACE_EDGE;
use quickconv_core::types::MimeType;
use tiny_skia::{Color, Pixmap, Transform};
use tracing::{debug, info, instrument};

use crate::artifact::EncodedArtifact;
use crate::image::encode::encode;
use crate::image::transform::validate_quality;

/// What sits behind the drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    White,
    /// Only meaningful for PNG and WebP; JPEG output is flattened onto white.
    Transparent,
}

/// Settings for one rasterisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizeOptions {
    /// Multiplier on the SVG's intrinsic size.
    pub scale: f32,
    pub background: Background,
    pub target: MimeType,
    pub quality: f32,
}

impl Default for RasterizeOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: Background::White,
            target: MimeType::Jpeg,
            quality: 0.9,
        }
    }
}

/// Surface size: intrinsic size × scale, rounded up.
fn surface_size(width: f32, height: f32, scale: f32) -> Result<(u32, u32)> {
    let w = (f64::from(width) * f64::from(scale)).ceil();
    let h = (f64::from(height) * f64::from(scale)).ceil();
    if !(w >= 1.0 && h >= 1.0) {
        return Err(QuickconvError::InvalidSvg(format!(
            "document size {width}x{height} renders to an empty surface"
        )));
    }
    if w > f64::from(MAX_SURFACE_EDGE) || h > f64::from(MAX_SURFACE_EDGE) {
        return Err(QuickconvError::InvalidScale(scale));
    }
    Ok((w as u32, h as u32))
}

/// Render `svg` and encode it per `options`.
#[instrument(skip(svg), fields(len = svg.len(), scale = options.scale, target = %options.target))]
pub fn rasterize(svg: &[u8], options: &RasterizeOptions) -> Result<EncodedArtifact> {
    if !(options.scale.is_finite() && options.scale > 0.0) {
        return Err(QuickconvError::InvalidScale(options.scale));
    }
    validate_quality(options.quality)?;

    let tree = usvg::Tree::from_data(svg, &usvg::Options::default())
        .map_err(|err| QuickconvError::InvalidSvg(err.to_string()))?;
    let size = tree.size();
    let (width, height) = surface_size(size.width(), size.height(), options.scale)?;
    debug!(
        intrinsic_w = size.width(),
        intrinsic_h = size.height(),
        width,
        height,
        "rendering svg"
    );

    let mut pixmap = Pixmap::new(width, height).ok_or(QuickconvError::InvalidScale(options.scale))?;
    if options.background == Background::White {
        pixmap.fill(Color::WHITE);
    }
    // Stretch to the rounded-up surface, as drawing into a canvas does.
    let transform = Transform::from_scale(
        width as f32 / size.width(),
        height as f32 / size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let image = pixmap_to_image(&pixmap)?;
    let bytes = encode(&image, options.target, options.quality)?;
    info!(width, height, len = bytes.len(), "svg rasterised");
    Ok(EncodedArtifact::raster(bytes, options.target, width, height))
}

/// [`rasterize`] for SVG source held as text.
pub fn rasterize_str(svg: &str, options: &RasterizeOptions) -> Result<EncodedArtifact> {
    rasterize(svg.as_bytes(), options)
}

/// tiny-skia stores premultiplied alpha; `image` expects straight alpha.
fn pixmap_to_image(pixmap: &Pixmap) -> Result<DynamicImage> {
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|px| {
            let c = px.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .map(DynamicImage::ImageRgba8)
        .ok_or_else(|| QuickconvError::EncodeFailed("rendered surface has the wrong size".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED_SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10">
        <rect x="0" y="0" width="10" height="10" fill="red"/>
    </svg>"#;

    fn decode(artifact: &EncodedArtifact) -> image::RgbaImage {
        image::load_from_memory(&artifact.bytes).unwrap().to_rgba8()
    }

    #[test]
    fn renders_at_intrinsic_size() {
        let options = RasterizeOptions {
            target: MimeType::Png,
            ..Default::default()
        };
        let out = rasterize_str(RED_SQUARE, &options).unwrap();
        assert_eq!((out.width, out.height), (Some(20), Some(10)));

        let pixels = decode(&out);
        assert_eq!(pixels.get_pixel(2, 5).0, [255, 0, 0, 255]);
        // Uncovered area shows the white background.
        assert_eq!(pixels.get_pixel(17, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn scale_multiplies_and_rounds_up() {
        let options = RasterizeOptions {
            scale: 1.25,
            target: MimeType::Png,
            ..Default::default()
        };
        let out = rasterize_str(RED_SQUARE, &options).unwrap();
        assert_eq!((out.width, out.height), (Some(25), Some(13)));
    }

    #[test]
    fn transparent_background_for_png() {
        let options = RasterizeOptions {
            background: Background::Transparent,
            target: MimeType::Png,
            ..Default::default()
        };
        let out = rasterize_str(RED_SQUARE, &options).unwrap();
        assert_eq!(decode(&out).get_pixel(17, 5).0[3], 0);
    }

    #[test]
    fn jpeg_output_by_default() {
        let out = rasterize_str(RED_SQUARE, &RasterizeOptions::default()).unwrap();
        assert_eq!(out.mime, MimeType::Jpeg);
        assert_eq!(image::guess_format(&out.bytes).unwrap(), image::ImageFormat::Jpeg);
    }

    #[test]
    fn invalid_svg_is_distinct_from_decode_failure() {
        let err = rasterize_str("<svg", &RasterizeOptions::default()).unwrap_err();
        assert!(matches!(err, QuickconvError::InvalidSvg(_)));
    }

    #[test]
    fn scale_must_be_positive() {
        for scale in [0.0, -1.0, f32::NAN] {
            let options = RasterizeOptions {
                scale,
                ..Default::default()
            };
            assert!(matches!(
                rasterize_str(RED_SQUARE, &options),
                Err(QuickconvError::InvalidScale(_))
            ));
        }
    }

    #[test]
    fn quality_is_validated() {
        let options = RasterizeOptions {
            quality: 1.2,
            ..Default::default()
        };
        assert!(matches!(
            rasterize_str(RED_SQUARE, &options),
            Err(QuickconvError::InvalidQuality(_))
        ));
    }

    #[test]
    fn oversized_surface_is_refused() {
        let options = RasterizeOptions {
            scale: 10_000.0,
            ..Default::default()
        };
        assert!(matches!(
            rasterize_str(RED_SQUARE, &options),
            Err(QuickconvError::InvalidScale(_))
        ));
    }
}
