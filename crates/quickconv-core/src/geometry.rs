// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry helpers — aspect-preserving fit and resize math, unit conversion,
// and crop-rectangle mapping between preview and natural pixel grids.
//
// Everything here is pure arithmetic; no pixels are touched.

use crate::error::{QuickconvError, Result};
use crate::types::{CropRect, Unit};

/// Millimetres per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Longest side of any surface a tool will allocate, in pixels.
pub const MAX_SURFACE_EDGE: u32 = 16_384;

/// Largest `(w, h)` inside `max_w` x `max_h` with the same ratio as the source.
///
/// Sources that already fit are returned unchanged; this never upscales.
pub fn scale_to_fit(src_w: f64, src_h: f64, max_w: f64, max_h: f64) -> (f64, f64) {
    if src_w <= max_w && src_h <= max_h {
        return (src_w, src_h);
    }
    let ratio = src_w / src_h;
    if ratio > max_w / max_h {
        (max_w, max_w / ratio)
    } else {
        (max_h * ratio, max_h)
    }
}

/// Integer-pixel variant of [`scale_to_fit`]. Each side is at least one pixel.
pub fn scale_to_fit_px(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let (w, h) = scale_to_fit(src_w as f64, src_h as f64, max_w as f64, max_h as f64);
    ((w.round() as u32).max(1), (h.round() as u32).max(1))
}

/// Derive the other side of a ratio-locked resize.
///
/// `known_new` is the dimension the user just typed, `known_original` is the
/// original size along that axis and `other_original` the original size along
/// the axis being derived. The result is rounded to the nearest pixel.
pub fn resize_dimension(known_new: u32, other_original: u32, known_original: u32) -> Result<u32> {
    if known_new == 0 || other_original == 0 || known_original == 0 {
        return Err(QuickconvError::InvalidDimension(format!(
            "dimensions must be positive (got {known_new}, {other_original}, {known_original})"
        )));
    }
    let derived = (known_new as f64 * other_original as f64 / known_original as f64).round();
    if derived < 1.0 || derived > u32::MAX as f64 {
        return Err(QuickconvError::InvalidDimension(format!(
            "derived dimension {derived} is out of range"
        )));
    }
    Ok(derived as u32)
}

/// Convert a physical length to pixels at `dpi`.
pub fn unit_to_pixels(value: f64, unit: Unit, dpi: f64) -> f64 {
    match unit {
        Unit::In => value * dpi,
        Unit::Mm => (value / MM_PER_INCH) * dpi,
        Unit::Px => value,
    }
}

/// [`unit_to_pixels`] for a unit given as text (`"in"`, `"mm"`, `"px"`).
pub fn unit_str_to_pixels(value: f64, unit: &str, dpi: f64) -> Result<f64> {
    let unit: Unit = unit.parse()?;
    Ok(unit_to_pixels(value, unit, dpi))
}

/// Scale a crop rectangle componentwise.
pub fn scale_crop_rect(rect: CropRect, scale_x: f64, scale_y: f64) -> CropRect {
    CropRect {
        x: rect.x * scale_x,
        y: rect.y * scale_y,
        width: rect.width * scale_x,
        height: rect.height * scale_y,
    }
}

/// Scale factors that map a crop drawn on a displayed (CSS-scaled) preview
/// onto the natural image.
pub fn crop_scale(
    natural_w: u32,
    natural_h: u32,
    displayed_w: f64,
    displayed_h: f64,
) -> Result<(f64, f64)> {
    if !(displayed_w > 0.0 && displayed_h > 0.0) || natural_w == 0 || natural_h == 0 {
        return Err(QuickconvError::InvalidDimension(format!(
            "cannot map crop from {displayed_w}x{displayed_h} preview onto {natural_w}x{natural_h} image"
        )));
    }
    Ok((
        natural_w as f64 / displayed_w,
        natural_h as f64 / displayed_h,
    ))
}

/// Largest rectangle of the given aspect ratio centred in a `w` x `h` image.
pub fn centered_crop(w: u32, h: u32, aspect_ratio: f64) -> Result<CropRect> {
    if !(aspect_ratio.is_finite() && aspect_ratio > 0.0) {
        return Err(QuickconvError::InvalidAspectRatio(aspect_ratio));
    }
    if w == 0 || h == 0 {
        return Err(QuickconvError::InvalidDimension(format!(
            "cannot crop a {w}x{h} image"
        )));
    }
    let (w, h) = (w as f64, h as f64);
    let (crop_w, crop_h) = if w / h > aspect_ratio {
        (h * aspect_ratio, h)
    } else {
        (w, w / aspect_ratio)
    };
    Ok(CropRect::new((w - crop_w) / 2.0, (h - crop_h) / 2.0, crop_w, crop_h))
}

/// Shrink `(w, h)` so the longer edge is at most `max_edge`. Never upscales.
pub fn fit_long_edge(w: u32, h: u32, max_edge: u32) -> (u32, u32) {
    if w.max(h) <= max_edge {
        return (w, h);
    }
    scale_to_fit_px(w, h, max_edge, max_edge)
}

/// Width/height pair for a resize form with an optional aspect-ratio lock.
///
/// Editing one side while locked recomputes the other from the original
/// ratio; turning the lock on re-derives the height from the current width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioLock {
    original_w: u32,
    original_h: u32,
    width: u32,
    height: u32,
    locked: bool,
}

impl RatioLock {
    pub fn new(original_w: u32, original_h: u32) -> Result<Self> {
        if original_w == 0 || original_h == 0 {
            return Err(QuickconvError::InvalidDimension(format!(
                "original size {original_w}x{original_h} is empty"
            )));
        }
        Ok(Self {
            original_w,
            original_h,
            width: original_w,
            height: original_h,
            locked: true,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn set_width(&mut self, width: u32) -> Result<()> {
        if self.locked {
            self.height = resize_dimension(width, self.original_h, self.original_w)?;
        } else if width == 0 {
            return Err(QuickconvError::InvalidDimension("width must be positive".into()));
        }
        self.width = width;
        Ok(())
    }

    pub fn set_height(&mut self, height: u32) -> Result<()> {
        if self.locked {
            self.width = resize_dimension(height, self.original_w, self.original_h)?;
        } else if height == 0 {
            return Err(QuickconvError::InvalidDimension("height must be positive".into()));
        }
        self.height = height;
        Ok(())
    }

    pub fn set_locked(&mut self, locked: bool) -> Result<()> {
        self.locked = locked;
        if locked {
            self.height = resize_dimension(self.width, self.original_h, self.original_w)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scale_to_fit_downscales_wide_image() {
        assert_eq!(scale_to_fit(4000.0, 2000.0, 1000.0, 1000.0), (1000.0, 500.0));
        assert_eq!(scale_to_fit_px(4000, 2000, 1000, 1000), (1000, 500));
    }

    #[test]
    fn scale_to_fit_never_upscales() {
        assert_eq!(scale_to_fit(100.0, 50.0, 1000.0, 1000.0), (100.0, 50.0));
    }

    #[test]
    fn scale_to_fit_tall_image_is_height_bound() {
        let (w, h) = scale_to_fit(1000.0, 4000.0, 190.0, 277.0);
        assert!((h - 277.0).abs() < 1e-9);
        assert!((w - 69.25).abs() < 1e-9);
    }

    #[test]
    fn inches_and_millimetres_to_pixels() {
        assert_eq!(unit_to_pixels(2.0, Unit::In, 300.0), 600.0);
        assert_eq!(unit_to_pixels(35.0, Unit::Mm, 300.0).round(), 413.0);
        assert_eq!(unit_to_pixels(500.0, Unit::Px, 72.0), 500.0);
    }

    #[test]
    fn unknown_unit_string_fails() {
        assert!(matches!(
            unit_str_to_pixels(1.0, "pt", 300.0),
            Err(QuickconvError::UnsupportedUnit(_))
        ));
        assert_eq!(unit_str_to_pixels(2.0, "in", 300.0).unwrap(), 600.0);
    }

    #[test]
    fn resize_dimension_rejects_zero() {
        assert!(matches!(
            resize_dimension(0, 100, 100),
            Err(QuickconvError::InvalidDimension(_))
        ));
        assert!(resize_dimension(10, 0, 100).is_err());
        assert!(resize_dimension(10, 100, 0).is_err());
    }

    #[test]
    fn resize_dimension_rounds_to_nearest() {
        // 1920x1080 scaled to width 1000 -> 562.5 -> 563
        assert_eq!(resize_dimension(1000, 1080, 1920).unwrap(), 563);
    }

    #[test]
    fn crop_rect_maps_preview_to_natural() {
        let (sx, sy) = crop_scale(4000, 3000, 400.0, 300.0).unwrap();
        let mapped = scale_crop_rect(CropRect::new(10.0, 20.0, 100.0, 150.0), sx, sy);
        assert_eq!(mapped, CropRect::new(100.0, 200.0, 1000.0, 1500.0));
    }

    #[test]
    fn crop_scale_rejects_hidden_preview() {
        assert!(crop_scale(100, 100, 0.0, 50.0).is_err());
    }

    #[test]
    fn centered_crop_of_landscape_is_square_in_middle() {
        let crop = centered_crop(400, 200, 1.0).unwrap();
        assert_eq!(crop, CropRect::new(100.0, 0.0, 200.0, 200.0));
    }

    #[test]
    fn centered_crop_rejects_bad_ratio() {
        assert!(matches!(
            centered_crop(10, 10, 0.0),
            Err(QuickconvError::InvalidAspectRatio(_))
        ));
        assert!(centered_crop(10, 10, f64::NAN).is_err());
    }

    #[test]
    fn fit_long_edge_caps_at_threshold() {
        assert_eq!(fit_long_edge(3840, 2160, 1920), (1920, 1080));
        assert_eq!(fit_long_edge(800, 600, 1920), (800, 600));
    }

    #[test]
    fn ratio_lock_toggle_rederives_height() {
        let mut form = RatioLock::new(1920, 1080).unwrap();
        form.set_locked(false).unwrap();
        form.set_width(960).unwrap();
        assert_eq!(form.height(), 1080);
        form.set_locked(true).unwrap();
        assert_eq!(form.height(), 540);
        form.set_height(270).unwrap();
        assert_eq!(form.width(), 480);
    }

    proptest! {
        #[test]
        fn locked_width_edit_recomputes_height(
            orig_w in 1u32..8000,
            orig_h in 1u32..8000,
            new_w in 1u32..8000,
        ) {
            let expected = (new_w as f64 * orig_h as f64 / orig_w as f64).round();
            prop_assume!(expected >= 1.0);

            let mut form = RatioLock::new(orig_w, orig_h).unwrap();
            form.set_width(new_w).unwrap();
            prop_assert_eq!(form.width(), new_w);
            prop_assert_eq!(form.height() as f64, expected);
        }

        #[test]
        fn locked_height_edit_recomputes_width(
            orig_w in 1u32..8000,
            orig_h in 1u32..8000,
            new_h in 1u32..8000,
        ) {
            let expected = (new_h as f64 * orig_w as f64 / orig_h as f64).round();
            prop_assume!(expected >= 1.0);

            let mut form = RatioLock::new(orig_w, orig_h).unwrap();
            form.set_height(new_h).unwrap();
            prop_assert_eq!(form.width() as f64, expected);
        }

        #[test]
        fn scale_to_fit_stays_in_bounds(
            src_w in 1u32..10_000,
            src_h in 1u32..10_000,
            max_w in 1u32..5_000,
            max_h in 1u32..5_000,
        ) {
            let (w, h) = scale_to_fit(src_w as f64, src_h as f64, max_w as f64, max_h as f64);
            prop_assert!(w <= max_w as f64 + 1e-9 && h <= max_h as f64 + 1e-9);
            prop_assert!(w <= src_w as f64 + 1e-9 && h <= src_h as f64 + 1e-9);
        }
    }
}
