// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text tools: hashing, case conversion and colour conversion.

use quickconv_core::QuickconvError;
use quickconv_core::error::Result;
use quickconv_text::color::{HslInput, RgbInput};
use quickconv_text::{CaseMode, ColorValue, HashAlgorithm, convert, digest, digest_text};

use super::{CommandResult, parse_numbers};
use crate::cli::{CaseArgs, ColorArgs, HashArgs};

pub fn hash(args: HashArgs) -> CommandResult {
    let algorithm: HashAlgorithm = args.algorithm.parse()?;
    let hex = match (&args.file, &args.text) {
        (Some(path), _) => digest(&std::fs::read(path).map_err(QuickconvError::from)?, algorithm),
        (None, Some(text)) => digest_text(text, algorithm),
        (None, None) => String::new(),
    };
    println!("{algorithm}: {hex}");
    Ok(())
}

pub fn case(args: CaseArgs) -> CommandResult {
    let mode: CaseMode = args.mode.parse()?;
    println!("{}", convert(&args.text, mode));
    Ok(())
}

/// Three integers from `r,g,b` or `h,s,l`; fractions are refused.
fn parse_triple(input: &str, what: &str) -> Result<[i32; 3]> {
    let values = parse_numbers::<3>(input, what)?;
    let mut out = [0; 3];
    for (slot, value) in out.iter_mut().zip(values) {
        if value.fract() != 0.0 || value.abs() > f64::from(i32::MAX) {
            return Err(QuickconvError::InvalidDimension(format!(
                "{what} takes whole numbers, got '{input}'"
            )));
        }
        *slot = value as i32;
    }
    Ok(out)
}

/// Apply whichever field the user gave to a fresh colour.
fn parse_color(args: &ColorArgs) -> Result<ColorValue> {
    let mut color = ColorValue::default();
    let (valid, shown) = if let Some(hex) = &args.hex {
        (color.update_hex(hex), hex.clone())
    } else if let Some(rgb) = &args.rgb {
        let [r, g, b] = parse_triple(rgb, "--rgb")?;
        (color.update_rgb(RgbInput { r, g, b }), format!("rgb({rgb})"))
    } else if let Some(hsl) = &args.hsl {
        let [h, s, l] = parse_triple(hsl, "--hsl")?;
        (color.update_hsl(HslInput { h, s, l }), format!("hsl({hsl})"))
    } else {
        (false, String::new())
    };

    if !valid {
        return Err(QuickconvError::UnsupportedFormat(format!(
            "{shown} is not a valid colour"
        )));
    }
    Ok(color)
}

pub fn color(args: ColorArgs) -> CommandResult {
    let color = parse_color(&args)?;
    if args.json {
        let json = serde_json::to_string_pretty(&color).map_err(QuickconvError::from)?;
        println!("{json}");
    } else {
        println!("HEX  {}", color.hex);
        println!("RGB  {}", color.rgb_css());
        println!("HSL  {}", color.hsl_css());
    }
    Ok(())
}
