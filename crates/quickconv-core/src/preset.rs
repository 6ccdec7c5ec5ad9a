// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Named target sizes for standardised photo cropping (passport, visa, and
// custom aspect presets).

use serde::{Deserialize, Serialize};

use crate::error::{QuickconvError, Result};
use crate::geometry::unit_to_pixels;
use crate::types::Unit;

/// Aspect-ratio tolerance when validating a preset.
const ASPECT_TOLERANCE: f64 = 1e-6;

/// Name of the preset selected when the tool opens.
pub const DEFAULT_PRESET_NAME: &str = "US Passport (2x2 inch)";

/// A named physical (or pixel) output size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizePreset {
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub unit: Unit,
    pub dpi: f64,
    pub aspect_ratio: f64,
    /// User-facing "custom" presets are pixel-based shapes rather than
    /// official document formats.
    #[serde(default)]
    pub custom: bool,
}

impl SizePreset {
    /// Build a preset, deriving the aspect ratio from the physical size.
    pub fn new(name: impl Into<String>, width: f64, height: f64, unit: Unit, dpi: f64) -> Result<Self> {
        let preset = Self {
            name: name.into(),
            width,
            height,
            unit,
            dpi,
            aspect_ratio: width / height,
            custom: unit == Unit::Px,
        };
        preset.validate()?;
        Ok(preset)
    }

    /// Check the size is positive and the stored ratio matches it.
    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0 && self.dpi > 0.0) {
            return Err(QuickconvError::InvalidDimension(format!(
                "preset '{}' must have a positive size and DPI",
                self.name
            )));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(QuickconvError::InvalidAspectRatio(self.aspect_ratio));
        }
        if (self.aspect_ratio - self.width / self.height).abs() > ASPECT_TOLERANCE {
            return Err(QuickconvError::InvalidAspectRatio(self.aspect_ratio));
        }
        Ok(())
    }

    /// Output size in whole pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let w = unit_to_pixels(self.width, self.unit, self.dpi).round();
        let h = unit_to_pixels(self.height, self.unit, self.dpi).round();
        ((w as u32).max(1), (h as u32).max(1))
    }
}

/// The built-in preset table.
pub fn builtin_presets() -> Vec<SizePreset> {
    let table: [(&str, f64, f64, Unit, f64); 9] = [
        ("US Passport (2x2 inch)", 2.0, 2.0, Unit::In, 300.0),
        ("Schengen Visa (35x45 mm)", 35.0, 45.0, Unit::Mm, 300.0),
        ("UK Passport (35x45 mm)", 35.0, 45.0, Unit::Mm, 300.0),
        ("Canada Passport (50x70 mm)", 50.0, 70.0, Unit::Mm, 300.0),
        ("Indian Passport (2x2 inch)", 2.0, 2.0, Unit::In, 300.0),
        ("Australian Passport (35x45 mm)", 35.0, 45.0, Unit::Mm, 300.0),
        ("Custom Square (1:1)", 500.0, 500.0, Unit::Px, 72.0),
        ("Custom Portrait (3:4)", 375.0, 500.0, Unit::Px, 72.0),
        ("Custom Landscape (4:3)", 500.0, 375.0, Unit::Px, 72.0),
    ];
    table
        .into_iter()
        .map(|(name, width, height, unit, dpi)| SizePreset {
            name: name.to_owned(),
            width,
            height,
            unit,
            dpi,
            aspect_ratio: width / height,
            custom: unit == Unit::Px,
        })
        .collect()
}

/// Look a built-in preset up by its display name.
pub fn preset_by_name(name: &str) -> Option<SizePreset> {
    builtin_presets().into_iter().find(|p| p.name == name)
}

/// The preset the crop tool starts with.
pub fn default_preset() -> SizePreset {
    preset_by_name(DEFAULT_PRESET_NAME).unwrap_or_else(|| builtin_presets().remove(0))
}
