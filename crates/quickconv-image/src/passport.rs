// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Passport / preset crop tool. The user drags a crop box over a scaled
// preview; the box is mapped back to natural pixels and the crop is drawn
// straight into the preset's pixel size.

use quickconv_core::SizePreset;
use quickconv_core::error::Result;
use quickconv_core::geometry::{centered_crop, crop_scale, scale_crop_rect};
use quickconv_core::types::{CropRect, MimeType};
use tracing::{info, instrument};

use crate::artifact::EncodedArtifact;
use crate::image::{ImageAsset, RasterPipeline, TransformSpec};

/// Quality the crop tool always exports at.
pub const PASSPORT_JPEG_QUALITY: f32 = 0.95;

/// The crop box the tool opens with: the largest box of the preset's
/// aspect ratio, centred on the image.
pub fn default_crop(asset: &ImageAsset, preset: &SizePreset) -> Result<CropRect> {
    centered_crop(asset.width(), asset.height(), preset.aspect_ratio)
}

/// Map a crop drawn on a preview shown at `displayed_w` x `displayed_h` onto
/// the natural image.
pub fn crop_from_display(
    asset: &ImageAsset,
    displayed_crop: CropRect,
    displayed_w: f64,
    displayed_h: f64,
) -> Result<CropRect> {
    let (sx, sy) = crop_scale(asset.width(), asset.height(), displayed_w, displayed_h)?;
    Ok(scale_crop_rect(displayed_crop, sx, sy))
}

/// Crop `natural_crop` out of `asset` and draw it at the preset's pixel size
/// as a JPEG.
#[instrument(skip(pipeline, asset, preset), fields(preset = %preset.name))]
pub fn crop_to_preset(
    pipeline: &RasterPipeline,
    asset: &ImageAsset,
    preset: &SizePreset,
    natural_crop: CropRect,
) -> Result<EncodedArtifact> {
    preset.validate()?;
    let (output_width, output_height) = preset.pixel_size();
    let artifact = pipeline.process(
        asset,
        &[
            TransformSpec::CropToAspect {
                aspect_ratio: preset.aspect_ratio,
                crop: natural_crop,
                output_width,
                output_height,
            },
            TransformSpec::EncodeQuality {
                mime: MimeType::Jpeg,
                quality: PASSPORT_JPEG_QUALITY,
            },
        ],
    )?;
    info!(output_width, output_height, "photo cropped to preset");
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use quickconv_core::error::QuickconvError;
    use quickconv_core::preset::{default_preset, preset_by_name};
    use quickconv_core::types::Unit;

    fn asset(width: u32, height: u32) -> ImageAsset {
        ImageAsset::from_image(
            DynamicImage::ImageRgb8(RgbImage::new(width, height)),
            MimeType::Jpeg,
        )
        .unwrap()
    }

    #[test]
    fn default_crop_is_centred_at_preset_ratio() {
        let crop = default_crop(&asset(400, 200), &default_preset()).unwrap();
        assert_eq!(crop, CropRect::new(100.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn display_crop_maps_to_natural_pixels() {
        let crop = crop_from_display(&asset(1000, 800), CropRect::new(10.0, 20.0, 50.0, 40.0), 500.0, 400.0)
            .unwrap();
        assert_eq!(crop, CropRect::new(20.0, 40.0, 100.0, 80.0));
    }

    #[test]
    fn zero_sized_preview_is_refused() {
        assert!(matches!(
            crop_from_display(&asset(10, 10), CropRect::new(0.0, 0.0, 1.0, 1.0), 0.0, 10.0),
            Err(QuickconvError::InvalidDimension(_))
        ));
    }

    #[test]
    fn us_passport_is_600_square_jpeg() {
        let source = asset(900, 1200);
        let preset = default_preset();
        let crop = default_crop(&source, &preset).unwrap();
        let out = crop_to_preset(&RasterPipeline::default(), &source, &preset, crop).unwrap();
        assert_eq!(out.mime, MimeType::Jpeg);
        assert_eq!((out.width, out.height), (Some(600), Some(600)));
    }

    #[test]
    fn schengen_preset_pixel_size() {
        let source = asset(800, 800);
        let preset = preset_by_name("Schengen Visa (35x45 mm)").unwrap();
        let crop = default_crop(&source, &preset).unwrap();
        let out = crop_to_preset(&RasterPipeline::default(), &source, &preset, crop).unwrap();
        assert_eq!((out.width, out.height), (Some(413), Some(531)));
    }

    #[test]
    fn custom_pixel_preset() {
        let preset = SizePreset::new("Banner", 300.0, 100.0, Unit::Px, 72.0).unwrap();
        let source = asset(600, 600);
        let crop = default_crop(&source, &preset).unwrap();
        assert_eq!(crop.width / crop.height, 3.0);
        let out = crop_to_preset(&RasterPipeline::default(), &source, &preset, crop).unwrap();
        assert_eq!((out.width, out.height), (Some(300), Some(100)));
    }
}
