// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colour model — HEX, RGB and HSL conversions, validators, and the
// synchronised three-way colour value edited by the colour converter.
//
// Validators return `bool` and never error: the caller decides whether an
// edit is applied or merely stored.

use serde::{Deserialize, Serialize};

/// An RGB colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS functional notation, e.g. `rgb(255, 128, 0)`.
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// An HSL colour rounded to whole degrees and percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsl {
    /// Hue in degrees, 0..=360.
    pub h: u16,
    /// Saturation in percent, 0..=100.
    pub s: u8,
    /// Lightness in percent, 0..=100.
    pub l: u8,
}

impl Hsl {
    pub const fn new(h: u16, s: u8, l: u8) -> Self {
        Self { h, s, l }
    }

    /// CSS functional notation, e.g. `hsl(30, 100%, 50%)`.
    pub fn to_css(&self) -> String {
        format!("hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

/// `#` followed by exactly 3 or 6 hex digits, any case.
pub fn is_valid_hex(hex: &str) -> bool {
    match hex.strip_prefix('#') {
        Some(digits) => {
            (digits.len() == 3 || digits.len() == 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

pub fn is_valid_rgb(r: i32, g: i32, b: i32) -> bool {
    [r, g, b].iter().all(|c| (0..=255).contains(c))
}

pub fn is_valid_hsl(h: i32, s: i32, l: i32) -> bool {
    (0..=360).contains(&h) && (0..=100).contains(&s) && (0..=100).contains(&l)
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Parse a `#rgb` or `#rrggbb` string. Returns `None` for anything
/// [`is_valid_hex`] rejects.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    if !is_valid_hex(hex) {
        return None;
    }
    let digits = &hex[1..];
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_owned()
    };
    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Lowercase six-digit hex with a leading `#`.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

/// Unrounded RGB → HSL: hue in degrees, saturation and lightness as
/// fractions in 0..=1. Achromatic colours have hue and saturation 0.
pub fn rgb_to_hsl_exact(rgb: Rgb) -> (f64, f64, f64) {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0, s, l)
}

/// RGB → HSL rounded to whole degrees and percentages.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let (h, s, l) = rgb_to_hsl_exact(rgb);
    Hsl::new(
        h.round().clamp(0.0, 360.0) as u16,
        (s * 100.0).round().clamp(0.0, 100.0) as u8,
        (l * 100.0).round().clamp(0.0, 100.0) as u8,
    )
}

/// Unrounded HSL → RGB. `h` in degrees, `s` and `l` as fractions.
pub fn hsl_to_rgb_exact(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    let a = s * l.min(1.0 - l);
    let k = |n: f64| (n + h / 30.0).rem_euclid(12.0);
    let f = |n: f64| {
        let k = k(n);
        l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0)
    };
    (f(0.0) * 255.0, f(8.0) * 255.0, f(4.0) * 255.0)
}

/// HSL → RGB, rounding each channel.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let (r, g, b) = hsl_to_rgb_exact(
        f64::from(hsl.h),
        f64::from(hsl.s) / 100.0,
        f64::from(hsl.l) / 100.0,
    );
    let channel = |v: f64| v.round().clamp(0.0, 255.0) as u8;
    Rgb::new(channel(r), channel(g), channel(b))
}

// ---------------------------------------------------------------------------
// Synchronised colour value
// ---------------------------------------------------------------------------

/// RGB channels exactly as typed, possibly out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbInput {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl RgbInput {
    pub fn validated(&self) -> Option<Rgb> {
        is_valid_rgb(self.r, self.g, self.b)
            .then(|| Rgb::new(self.r as u8, self.g as u8, self.b as u8))
    }
}

impl From<Rgb> for RgbInput {
    fn from(rgb: Rgb) -> Self {
        Self {
            r: i32::from(rgb.r),
            g: i32::from(rgb.g),
            b: i32::from(rgb.b),
        }
    }
}

/// HSL components exactly as typed, possibly out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HslInput {
    pub h: i32,
    pub s: i32,
    pub l: i32,
}

impl HslInput {
    pub fn validated(&self) -> Option<Hsl> {
        is_valid_hsl(self.h, self.s, self.l)
            .then(|| Hsl::new(self.h as u16, self.s as u8, self.l as u8))
    }
}

impl From<Hsl> for HslInput {
    fn from(hsl: Hsl) -> Self {
        Self {
            h: i32::from(hsl.h),
            s: i32::from(hsl.s),
            l: i32::from(hsl.l),
        }
    }
}

/// Which representation the user touched last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorField {
    Hex,
    Rgb,
    Hsl,
}

/// One colour held in three representations.
///
/// A valid edit to any field recomputes the other two. An invalid edit is
/// kept verbatim in its own field and the other two keep their last
/// consistent values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorValue {
    pub hex: String,
    pub rgb: RgbInput,
    pub hsl: HslInput,
    pub last_edited: ColorField,
}

impl Default for ColorValue {
    /// White, as the converter opens.
    fn default() -> Self {
        Self::from_rgb(Rgb::new(255, 255, 255))
    }
}

impl ColorValue {
    pub fn from_rgb(rgb: Rgb) -> Self {
        Self {
            hex: rgb_to_hex(rgb),
            rgb: rgb.into(),
            hsl: rgb_to_hsl(rgb).into(),
            last_edited: ColorField::Rgb,
        }
    }

    /// Returns `true` when the edit was valid and propagated.
    pub fn update_hex(&mut self, input: &str) -> bool {
        let trimmed = input.trim();
        self.hex = if trimmed.is_empty() || trimmed.starts_with('#') {
            trimmed.to_owned()
        } else {
            format!("#{trimmed}")
        };
        self.last_edited = ColorField::Hex;
        match hex_to_rgb(&self.hex) {
            Some(rgb) => {
                self.rgb = rgb.into();
                self.hsl = rgb_to_hsl(rgb).into();
                true
            }
            None => false,
        }
    }

    pub fn update_rgb(&mut self, input: RgbInput) -> bool {
        self.rgb = input;
        self.last_edited = ColorField::Rgb;
        match input.validated() {
            Some(rgb) => {
                self.hex = rgb_to_hex(rgb);
                self.hsl = rgb_to_hsl(rgb).into();
                true
            }
            None => false,
        }
    }

    pub fn update_hsl(&mut self, input: HslInput) -> bool {
        self.hsl = input;
        self.last_edited = ColorField::Hsl;
        match input.validated() {
            Some(hsl) => {
                let rgb = hsl_to_rgb(hsl);
                self.rgb = rgb.into();
                self.hex = rgb_to_hex(rgb);
                true
            }
            None => false,
        }
    }

    /// The current colour, if the last-edited field is valid.
    pub fn rgb(&self) -> Option<Rgb> {
        match self.last_edited {
            ColorField::Hex => hex_to_rgb(&self.hex),
            ColorField::Rgb => self.rgb.validated(),
            ColorField::Hsl => self.hsl.validated().map(hsl_to_rgb),
        }
    }

    pub fn rgb_css(&self) -> String {
        format!("rgb({}, {}, {})", self.rgb.r, self.rgb.g, self.rgb.b)
    }

    pub fn hsl_css(&self) -> String {
        format!("hsl({}, {}%, {}%)", self.hsl.h, self.hsl.s, self.hsl.l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn validates_hex_forms() {
        assert!(is_valid_hex("#fff"));
        assert!(is_valid_hex("#A1b2C3"));
        assert!(!is_valid_hex("fff"));
        assert!(!is_valid_hex("#ffff"));
        assert!(!is_valid_hex("#ggg"));
        assert!(!is_valid_hex("#"));
    }

    #[test]
    fn short_hex_expands() {
        assert_eq!(hex_to_rgb("#f80"), Some(Rgb::new(255, 136, 0)));
        assert_eq!(rgb_to_hex(Rgb::new(255, 136, 0)), "#ff8800");
    }

    #[test]
    fn known_hsl_values() {
        assert_eq!(rgb_to_hsl(Rgb::new(255, 0, 0)), Hsl::new(0, 100, 50));
        assert_eq!(rgb_to_hsl(Rgb::new(0, 0, 255)), Hsl::new(240, 100, 50));
        assert_eq!(hsl_to_rgb(Hsl::new(120, 100, 25)), Rgb::new(0, 128, 0));
        assert_eq!(hsl_to_rgb(Hsl::new(360, 100, 50)), Rgb::new(255, 0, 0));
    }

    #[test]
    fn achromatic_has_zero_hue_and_saturation() {
        let hsl = rgb_to_hsl(Rgb::new(128, 128, 128));
        assert_eq!((hsl.h, hsl.s), (0, 0));
        assert_eq!(hsl.l, 50);
    }

    #[test]
    fn valid_hex_edit_propagates() {
        let mut color = ColorValue::default();
        assert!(color.update_hex("#000"));
        assert_eq!(color.rgb, RgbInput { r: 0, g: 0, b: 0 });
        assert_eq!(color.hsl, HslInput { h: 0, s: 0, l: 0 });
        assert_eq!(color.last_edited, ColorField::Hex);
    }

    #[test]
    fn hex_without_hash_is_normalised() {
        let mut color = ColorValue::default();
        assert!(color.update_hex("00ff00"));
        assert_eq!(color.hex, "#00ff00");
        assert_eq!(color.hsl_css(), "hsl(120, 100%, 50%)");
    }

    #[test]
    fn invalid_edit_is_stored_but_not_propagated() {
        let mut color = ColorValue::default();
        assert!(!color.update_hex("#12"));
        assert_eq!(color.hex, "#12");
        assert_eq!(color.rgb, RgbInput { r: 255, g: 255, b: 255 });

        assert!(!color.update_rgb(RgbInput { r: 300, g: 0, b: 0 }));
        assert_eq!(color.rgb.r, 300);
        assert_eq!(color.hsl, HslInput { h: 0, s: 0, l: 100 });
        assert_eq!(color.rgb(), None);
    }

    #[test]
    fn hsl_edit_updates_rgb_and_hex() {
        let mut color = ColorValue::default();
        assert!(color.update_hsl(HslInput { h: 240, s: 100, l: 50 }));
        assert_eq!(color.hex, "#0000ff");
        assert_eq!(color.rgb_css(), "rgb(0, 0, 255)");
    }

    proptest! {
        #[test]
        fn hex_round_trip(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255, upper in any::<bool>()) {
            let hex = rgb_to_hex(Rgb::new(r, g, b));
            let typed = if upper { hex.to_uppercase() } else { hex.clone() };
            let parsed = hex_to_rgb(&typed).unwrap();
            prop_assert_eq!(rgb_to_hex(parsed), hex);
        }

        #[test]
        fn short_hex_round_trip_normalises(r in 0u8..16, g in 0u8..16, b in 0u8..16) {
            let short = format!("#{r:x}{g:x}{b:x}");
            let long = format!("#{r:x}{r:x}{g:x}{g:x}{b:x}{b:x}");
            prop_assert_eq!(rgb_to_hex(hex_to_rgb(&short).unwrap()), long);
        }

        #[test]
        fn hsl_round_trip_within_one(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let (h, s, l) = rgb_to_hsl_exact(Rgb::new(r, g, b));
            let (r2, g2, b2) = hsl_to_rgb_exact(h, s, l);
            prop_assert!((r2.round() - f64::from(r)).abs() <= 1.0);
            prop_assert!((g2.round() - f64::from(g)).abs() <= 1.0);
            prop_assert!((b2.round() - f64::from(b)).abs() <= 1.0);
        }

        #[test]
        fn rounded_hsl_is_always_valid(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let hsl = rgb_to_hsl(Rgb::new(r, g, b));
            prop_assert!(is_valid_hsl(i32::from(hsl.h), i32::from(hsl.s), i32::from(hsl.l)));
        }
    }
}
