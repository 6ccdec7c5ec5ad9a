// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline operations and their up-front validation.

use quickconv_core::error::{QuickconvError, Result};
use quickconv_core::geometry::MAX_SURFACE_EDGE;
use quickconv_core::types::{CropRect, MimeType};

use super::filter::FilterSettings;

/// One step of a raster pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformSpec {
    /// Redraw into an exact `width` × `height` surface. Aspect ratio is the
    /// caller's business.
    Resize { width: u32, height: u32 },
    /// CSS-style brightness, contrast and saturation.
    FilterAdjust(FilterSettings),
    /// Draw the `crop` rectangle (source pixels) into an
    /// `output_width` × `output_height` surface.
    CropToAspect {
        aspect_ratio: f64,
        crop: CropRect,
        output_width: u32,
        output_height: u32,
    },
    /// Serialise to `mime` at `quality` (fraction in `0.0..=1.0`).
    EncodeQuality { mime: MimeType, quality: f32 },
}

/// Output surfaces must be non-empty and no wider or taller than
/// [`MAX_SURFACE_EDGE`].
fn validate_surface(what: &str, width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(QuickconvError::InvalidDimension(format!(
            "{what} {width}x{height} must be positive"
        )));
    }
    if width > MAX_SURFACE_EDGE || height > MAX_SURFACE_EDGE {
        return Err(QuickconvError::InvalidDimension(format!(
            "{what} {width}x{height} exceeds {MAX_SURFACE_EDGE} pixels per side"
        )));
    }
    Ok(())
}

/// Quality is a fraction; anything outside `0.0..=1.0` (or NaN) is refused.
pub fn validate_quality(quality: f32) -> Result<()> {
    if (0.0..=1.0).contains(&quality) {
        Ok(())
    } else {
        Err(QuickconvError::InvalidQuality(quality))
    }
}

impl TransformSpec {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Resize { .. } => "resize",
            Self::FilterAdjust(_) => "filter",
            Self::CropToAspect { .. } => "crop",
            Self::EncodeQuality { .. } => "encode",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Resize { width, height } => validate_surface("resize target", *width, *height)?,
            Self::FilterAdjust(settings) => settings.validate()?,
            Self::CropToAspect {
                aspect_ratio,
                crop,
                output_width,
                output_height,
            } => {
                if !aspect_ratio.is_finite() || *aspect_ratio <= 0.0 {
                    return Err(QuickconvError::InvalidAspectRatio(*aspect_ratio));
                }
                validate_surface("crop output", *output_width, *output_height)?;
                let finite = [crop.x, crop.y, crop.width, crop.height]
                    .iter()
                    .all(|v| v.is_finite());
                if !finite || crop.is_empty() {
                    return Err(QuickconvError::InvalidDimension(format!(
                        "crop rectangle {}x{} at ({}, {}) is empty",
                        crop.width, crop.height, crop.x, crop.y
                    )));
                }
            }
            Self::EncodeQuality { quality, .. } => validate_quality(*quality)?,
        }
        Ok(())
    }
}

/// Check a whole run before any pixel work: every step must be valid, the
/// run must end with exactly one encode step, and nothing may follow it.
pub fn validate_ops(ops: &[TransformSpec]) -> Result<()> {
    for op in ops {
        op.validate()?;
    }
    match ops.split_last() {
        Some((TransformSpec::EncodeQuality { .. }, rest)) => {
            if rest
                .iter()
                .any(|op| matches!(op, TransformSpec::EncodeQuality { .. }))
            {
                return Err(QuickconvError::EncodeFailed(
                    "only the last step may encode".into(),
                ));
            }
            Ok(())
        }
        _ => Err(QuickconvError::EncodeFailed(
            "the last step must encode the image".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(quality: f32) -> TransformSpec {
        TransformSpec::EncodeQuality {
            mime: MimeType::Png,
            quality,
        }
    }

    #[test]
    fn quality_bounds() {
        assert!(validate_quality(0.0).is_ok());
        assert!(validate_quality(1.0).is_ok());
        assert!(matches!(validate_quality(1.01), Err(QuickconvError::InvalidQuality(_))));
        assert!(validate_quality(-0.1).is_err());
        assert!(validate_quality(f32::NAN).is_err());
    }

    #[test]
    fn zero_resize_is_rejected() {
        let op = TransformSpec::Resize { width: 0, height: 10 };
        assert!(matches!(op.validate(), Err(QuickconvError::InvalidDimension(_))));
    }

    #[test]
    fn oversized_surfaces_are_rejected() {
        let resize = TransformSpec::Resize {
            width: u32::MAX,
            height: u32::MAX,
        };
        assert!(matches!(resize.validate(), Err(QuickconvError::InvalidDimension(_))));

        let edge = TransformSpec::Resize {
            width: MAX_SURFACE_EDGE,
            height: 1,
        };
        assert!(edge.validate().is_ok());
        let over = TransformSpec::Resize {
            width: 1,
            height: MAX_SURFACE_EDGE + 1,
        };
        assert!(matches!(over.validate(), Err(QuickconvError::InvalidDimension(_))));

        let crop = TransformSpec::CropToAspect {
            aspect_ratio: 1.0,
            crop: CropRect::new(0.0, 0.0, 10.0, 10.0),
            output_width: MAX_SURFACE_EDGE + 1,
            output_height: MAX_SURFACE_EDGE + 1,
        };
        assert!(matches!(crop.validate(), Err(QuickconvError::InvalidDimension(_))));
    }

    #[test]
    fn crop_needs_positive_aspect() {
        let op = TransformSpec::CropToAspect {
            aspect_ratio: f64::INFINITY,
            crop: CropRect::new(0.0, 0.0, 10.0, 10.0),
            output_width: 10,
            output_height: 10,
        };
        assert!(matches!(op.validate(), Err(QuickconvError::InvalidAspectRatio(_))));
    }

    #[test]
    fn run_must_end_with_encode() {
        assert!(validate_ops(&[encode(0.5)]).is_ok());
        assert!(matches!(validate_ops(&[]), Err(QuickconvError::EncodeFailed(_))));
        assert!(matches!(
            validate_ops(&[TransformSpec::Resize { width: 1, height: 1 }]),
            Err(QuickconvError::EncodeFailed(_))
        ));
        assert!(matches!(
            validate_ops(&[encode(0.5), encode(0.5)]),
            Err(QuickconvError::EncodeFailed(_))
        ));
    }

    #[test]
    fn invalid_step_anywhere_fails_the_run() {
        let ops = [TransformSpec::Resize { width: 4, height: 4 }, encode(2.0)];
        assert!(matches!(validate_ops(&ops), Err(QuickconvError::InvalidQuality(_))));
    }
}
