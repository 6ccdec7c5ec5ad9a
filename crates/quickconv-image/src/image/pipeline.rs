// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster pipeline — runs an ordered list of transforms over a decoded image
// and encodes the result.

use std::sync::Arc;

use image::DynamicImage;
use image::imageops::FilterType;
use quickconv_core::AppConfig;
use quickconv_core::error::{QuickconvError, Result};
use quickconv_core::geometry::fit_long_edge;
use quickconv_core::intake::format_bytes;
use quickconv_core::types::{CropRect, MimeType};
use tracing::{debug, info, instrument};

use super::asset::ImageAsset;
use super::encode::encode;
use super::filter::{FilterSettings, apply_filters};
use super::transform::{TransformSpec, validate_ops, validate_quality};
use crate::artifact::EncodedArtifact;

/// Default longest edge after compression.
pub const DEFAULT_COMPRESSION_MAX_EDGE: u32 = 1920;

/// Working bitmap threaded through a run.
///
/// Each transformation consumes the surface and returns a new one; the
/// source asset's pixels are shared until the first step replaces them.
struct Surface {
    image: Arc<DynamicImage>,
}

impl Surface {
    fn new(asset: &ImageAsset) -> Self {
        Self {
            image: asset.shared_pixels(),
        }
    }

    /// Redraw at exactly `width` x `height` with bilinear (triangle) sampling.
    fn resize(self, width: u32, height: u32) -> Self {
        if (self.image.width(), self.image.height()) == (width, height) {
            return self;
        }
        debug!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            width,
            height,
            "resizing"
        );
        let resized = self.image.resize_exact(width, height, FilterType::Triangle);
        Self {
            image: Arc::new(resized),
        }
    }

    fn filter(self, settings: FilterSettings) -> Self {
        if settings.is_identity() {
            return self;
        }
        Self {
            image: Arc::new(apply_filters(&self.image, settings)),
        }
    }

    /// Draw the source rectangle `crop` into a `width` x `height` surface.
    /// The rectangle is clamped to the image first.
    fn crop_into(self, crop: CropRect, width: u32, height: u32) -> Result<Self> {
        let img_w = f64::from(self.image.width());
        let img_h = f64::from(self.image.height());

        let x0 = crop.x.clamp(0.0, img_w);
        let y0 = crop.y.clamp(0.0, img_h);
        let x1 = (crop.x + crop.width).clamp(0.0, img_w);
        let y1 = (crop.y + crop.height).clamp(0.0, img_h);

        let x = x0.round() as u32;
        let y = y0.round() as u32;
        let w = ((x1 - x0).round() as u32).min(self.image.width().saturating_sub(x));
        let h = ((y1 - y0).round() as u32).min(self.image.height().saturating_sub(y));
        if w == 0 || h == 0 {
            return Err(QuickconvError::InvalidDimension(format!(
                "crop rectangle {}x{} at ({}, {}) lies outside the {}x{} image",
                crop.width, crop.height, crop.x, crop.y, img_w, img_h
            )));
        }

        debug!(x, y, w, h, width, height, "cropping");
        let cropped = self.image.crop_imm(x, y, w, h);
        Ok(Self {
            image: Arc::new(cropped.resize_exact(width, height, FilterType::Triangle)),
        })
    }
}

/// Turns decoded images into encoded artifacts.
#[derive(Debug, Clone)]
pub struct RasterPipeline {
    compression_max_edge: u32,
}

impl Default for RasterPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_COMPRESSION_MAX_EDGE)
    }
}

impl RasterPipeline {
    pub fn new(compression_max_edge: u32) -> Self {
        Self {
            compression_max_edge: compression_max_edge.max(1),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.compression_max_edge)
    }

    pub fn compression_max_edge(&self) -> u32 {
        self.compression_max_edge
    }

    /// Apply `ops` left to right. The last op must be an encode step.
    ///
    /// Every op is validated before any pixel is touched, so a bad value
    /// anywhere fails the run without partial work.
    #[instrument(skip(self, asset, ops), fields(
        width = asset.width(),
        height = asset.height(),
        steps = ops.len(),
    ))]
    pub fn process(&self, asset: &ImageAsset, ops: &[TransformSpec]) -> Result<EncodedArtifact> {
        validate_ops(ops)?;

        let mut surface = Surface::new(asset);
        for op in ops {
            surface = match op {
                TransformSpec::Resize { width, height } => surface.resize(*width, *height),
                TransformSpec::FilterAdjust(settings) => surface.filter(*settings),
                TransformSpec::CropToAspect {
                    crop,
                    output_width,
                    output_height,
                    ..
                } => surface.crop_into(*crop, *output_width, *output_height)?,
                TransformSpec::EncodeQuality { mime, quality } => {
                    let bytes = encode(&surface.image, *mime, *quality)?;
                    let artifact = EncodedArtifact::raster(
                        bytes,
                        *mime,
                        surface.image.width(),
                        surface.image.height(),
                    );
                    info!(
                        %mime,
                        width = artifact.width,
                        height = artifact.height,
                        size = %format_bytes(artifact.byte_size() as u64, 2),
                        "pipeline finished"
                    );
                    return Ok(artifact);
                }
            };
        }

        // validate_ops guarantees an encode step ends the run.
        Err(QuickconvError::EncodeFailed(
            "the last step must encode the image".into(),
        ))
    }

    /// Output type used when a tool does not ask: the source type if it can
    /// be written, otherwise JPEG.
    pub fn default_target(asset: &ImageAsset) -> MimeType {
        if asset.source_mime().is_encodable_raster() {
            asset.source_mime()
        } else {
            MimeType::Jpeg
        }
    }

    /// Fit the longest edge to the compression limit (never upscaling) and
    /// re-encode at `quality`.
    #[instrument(skip(self, asset), fields(width = asset.width(), height = asset.height()))]
    pub fn compress(
        &self,
        asset: &ImageAsset,
        quality: f32,
        target: Option<MimeType>,
    ) -> Result<EncodedArtifact> {
        validate_quality(quality)?;
        let mime = target.unwrap_or_else(|| Self::default_target(asset));

        let (width, height) = fit_long_edge(asset.width(), asset.height(), self.compression_max_edge);
        let mut ops = Vec::with_capacity(2);
        if (width, height) != (asset.width(), asset.height()) {
            ops.push(TransformSpec::Resize { width, height });
        }
        ops.push(TransformSpec::EncodeQuality { mime, quality });

        let artifact = self.process(asset, &ops)?;
        info!(
            original = %format_bytes(asset.source_byte_size() as u64, 2),
            compressed = %format_bytes(artifact.byte_size() as u64, 2),
            "compressed"
        );
        Ok(artifact)
    }

    /// Resize to exactly `width` x `height` and encode, the way the resizer
    /// tool does.
    pub fn resize(
        &self,
        asset: &ImageAsset,
        width: u32,
        height: u32,
        mime: MimeType,
        quality: f32,
    ) -> Result<EncodedArtifact> {
        self.process(
            asset,
            &[
                TransformSpec::Resize { width, height },
                TransformSpec::EncodeQuality { mime, quality },
            ],
        )
    }
}
