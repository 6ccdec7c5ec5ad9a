// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colour adjustments with CSS filter semantics:
// `brightness(b%) contrast(c%) saturate(s%)`, applied in that order.

use image::{DynamicImage, Rgba};
use imageproc::map::map_colors;
use quickconv_core::error::{QuickconvError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Brightness, contrast and saturation in percent. 100 leaves the image
/// unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    pub brightness_pct: f32,
    pub contrast_pct: f32,
    pub saturation_pct: f32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            brightness_pct: 100.0,
            contrast_pct: 100.0,
            saturation_pct: 100.0,
        }
    }
}

impl FilterSettings {
    pub fn new(brightness_pct: f32, contrast_pct: f32, saturation_pct: f32) -> Self {
        Self {
            brightness_pct,
            contrast_pct,
            saturation_pct,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }

    /// Every percentage must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("brightness", self.brightness_pct),
            ("contrast", self.contrast_pct),
            ("saturation", self.saturation_pct),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(QuickconvError::InvalidFilter(format!("{name} {value}%")));
            }
        }
        Ok(())
    }

    /// CSS filter string equivalent to these settings.
    pub fn to_css(&self) -> String {
        format!(
            "brightness({}%) contrast({}%) saturate({}%)",
            self.brightness_pct, self.contrast_pct, self.saturation_pct
        )
    }
}

/// Per-pixel arithmetic on channels in `0.0..=1.0`. A stage at exactly 100%
/// is skipped so it cannot introduce rounding drift.
fn adjust(rgb: [f32; 3], b: f32, c: f32, s: f32) -> [f32; 3] {
    let clamp = |v: f32| v.clamp(0.0, 1.0);

    let mut px = rgb;
    if b != 1.0 {
        px = px.map(|v| clamp(v * b));
    }
    if c != 1.0 {
        px = px.map(|v| clamp((v - 0.5) * c + 0.5));
    }
    if s == 1.0 {
        return px;
    }

    let [r, g, bl] = px;
    [
        clamp((0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * bl),
        clamp((0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * bl),
        clamp((0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * bl),
    ]
}

/// Apply `settings` to every pixel. Alpha is untouched.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn apply_filters(image: &DynamicImage, settings: FilterSettings) -> DynamicImage {
    if settings.is_identity() {
        return image.clone();
    }
    debug!(css = %settings.to_css(), "applying filters");

    let b = settings.brightness_pct / 100.0;
    let c = settings.contrast_pct / 100.0;
    let s = settings.saturation_pct / 100.0;

    let rgba = image.to_rgba8();
    let filtered = map_colors(&rgba, |Rgba([r, g, bl, a])| {
        let out = adjust(
            [r, g, bl].map(|v| f32::from(v) / 255.0),
            b,
            c,
            s,
        );
        let [r, g, bl] = out.map(|v| (v * 255.0).round() as u8);
        Rgba([r, g, bl, a])
    });
    DynamicImage::ImageRgba8(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    fn single(pixel: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba(pixel)))
    }

    fn first_pixel(image: &DynamicImage) -> [u8; 4] {
        image.to_rgba8().get_pixel(0, 0).0
    }

    #[test]
    fn default_is_identity() {
        let img = single([12, 200, 99, 128]);
        let out = apply_filters(&img, FilterSettings::default());
        assert_eq!(first_pixel(&out), [12, 200, 99, 128]);
    }

    #[test]
    fn brightness_scales_channels() {
        let out = apply_filters(&single([100, 50, 200, 255]), FilterSettings::new(150.0, 100.0, 100.0));
        assert_eq!(first_pixel(&out), [150, 75, 255, 255]);
    }

    #[test]
    fn zero_contrast_is_mid_grey() {
        let out = apply_filters(&single([0, 255, 30, 255]), FilterSettings::new(100.0, 0.0, 100.0));
        assert_eq!(first_pixel(&out), [128, 128, 128, 255]);
    }

    #[test]
    fn zero_saturation_is_grey() {
        let out = apply_filters(&single([255, 0, 0, 255]), FilterSettings::new(100.0, 100.0, 0.0));
        let [r, g, b, _] = first_pixel(&out);
        assert_eq!(r, g);
        assert_eq!(g, b);
        // Luma weight of red in the CSS saturate matrix.
        assert_eq!(r, (0.213f32 * 255.0).round() as u8);
    }

    #[test]
    fn alpha_is_preserved() {
        let out = apply_filters(&single([10, 20, 30, 7]), FilterSettings::new(50.0, 120.0, 180.0));
        assert_eq!(first_pixel(&out)[3], 7);
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(matches!(
            FilterSettings::new(-1.0, 100.0, 100.0).validate(),
            Err(QuickconvError::InvalidFilter(_))
        ));
        assert!(FilterSettings::new(0.0, 300.0, 0.0).validate().is_ok());
        assert!(FilterSettings::new(100.0, f32::NAN, 100.0).validate().is_err());
    }
}
