// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image tools: resize, compress, enhance, passport crop, SVG in both
// directions, data URLs and background removal.

use quickconv_core::QuickconvError;
use quickconv_core::error::Result;
use quickconv_core::geometry::{MAX_SURFACE_EDGE, RatioLock, unit_to_pixels};
use quickconv_core::intake::format_bytes;
use quickconv_core::preset::{SizePreset, builtin_presets, default_preset, preset_by_name};
use quickconv_core::types::{CropRect, MimeType, Unit};
use quickconv_image::enhance::EnhancementProvider;
use quickconv_image::svg::{rasterize, wrap_raster_in_svg};
use quickconv_image::{
    Background, FilterSettings, ImageAsset, LocalFilterProvider, RasterPipeline, RasterizeOptions,
    passport, to_data_url,
};
use tracing::{info, warn};

use super::{CommandResult, describe, parse_numbers, parse_raster_target, run_tool};
use crate::cli::{
    CompressArgs, EnhanceArgs, ImageToUrlArgs, InputArgs, PassportArgs, ResizeArgs,
    SvgToImageArgs,
};
use crate::services::app_services::AppServices;

/// Convert a length typed in `unit` to whole pixels.
fn to_pixels(value: f64, unit: Unit, dpi: f64) -> Result<u32> {
    let px = unit_to_pixels(value, unit, dpi).round();
    if !(px >= 1.0 && px <= f64::from(MAX_SURFACE_EDGE)) {
        return Err(QuickconvError::InvalidDimension(format!(
            "{value}{unit} at {dpi} DPI is not a usable pixel size"
        )));
    }
    Ok(px as u32)
}

/// Work out the output size the way the resizer form does: with the ratio
/// locked, the side the user typed drives the other one.
fn target_size(
    original: (u32, u32),
    width: Option<u32>,
    height: Option<u32>,
    keep_ratio: bool,
) -> Result<(u32, u32)> {
    let mut lock = RatioLock::new(original.0, original.1)?;
    lock.set_locked(keep_ratio)?;
    match (width, height, keep_ratio) {
        (Some(w), Some(h), false) => {
            lock.set_width(w)?;
            lock.set_height(h)?;
        }
        (Some(w), Some(_), true) => {
            warn!("ratio is locked; height follows the width");
            lock.set_width(w)?;
        }
        (Some(w), None, _) => lock.set_width(w)?,
        (None, Some(h), _) => lock.set_height(h)?,
        (None, None, _) => {
            return Err(QuickconvError::InvalidDimension(
                "give a width, a height, or both".into(),
            ));
        }
    }
    Ok((lock.width(), lock.height()))
}

pub async fn resize(svc: &AppServices, args: ResizeArgs) -> CommandResult {
    let source = svc.intake(&args.input, &svc.raster_policy())?;
    let asset = ImageAsset::decode(&source.bytes, source.declared_mime)?;
    let unit: Unit = args.unit.parse()?;
    let width = args.width.map(|w| to_pixels(w, unit, args.dpi)).transpose()?;
    let height = args.height.map(|h| to_pixels(h, unit, args.dpi)).transpose()?;
    let (width, height) = target_size(
        (asset.width(), asset.height()),
        width,
        height,
        !args.no_keep_ratio,
    )?;

    let mime = parse_raster_target(args.format.as_deref())?
        .unwrap_or_else(|| RasterPipeline::default_target(&asset));
    let quality = args.quality.unwrap_or(svc.config().default_quality);
    let pipeline = svc.pipeline();

    let (location, artifact) = run_tool(svc, "resize", source, &args.output, "resized", move |_| {
        pipeline.resize(&asset, width, height, mime, quality)
    })
    .await?;
    println!("{}", describe(&location, &artifact));
    Ok(())
}

pub async fn compress(svc: &AppServices, args: CompressArgs) -> CommandResult {
    let source = svc.intake(&args.input, &svc.raster_policy())?;
    let original_size = source.byte_size();
    let target = parse_raster_target(args.format.as_deref())?;
    let quality = args.quality;
    let pipeline = svc.pipeline();

    let (location, artifact) = run_tool(svc, "compress", source, &args.output, "compressed", move |source| {
        let asset = ImageAsset::decode(&source.bytes, source.declared_mime)?;
        pipeline.compress(&asset, quality, target)
    })
    .await?;

    println!("{}", describe(&location, &artifact));
    println!(
        "Original {} -> compressed {}",
        format_bytes(original_size as u64, 2),
        format_bytes(artifact.byte_size() as u64, 2)
    );
    Ok(())
}

pub async fn enhance(svc: &AppServices, args: EnhanceArgs) -> CommandResult {
    let source = svc.intake(&args.input, &svc.raster_policy())?;
    let settings = FilterSettings::new(args.brightness, args.contrast, args.saturation);
    settings.validate()?;
    let provider =
        LocalFilterProvider::new(settings, args.quality.unwrap_or(svc.config().default_quality));
    info!(filter = %settings.to_css(), "enhancing");

    let (location, artifact) = run_tool(svc, "enhance", source, &args.output, "enhanced", move |source| {
        let asset = ImageAsset::decode(&source.bytes, source.declared_mime)?;
        provider.enhance(&asset, &mut |_| {})
    })
    .await?;
    println!("{}", describe(&location, &artifact));
    Ok(())
}

fn print_presets() {
    for preset in builtin_presets() {
        let (w, h) = preset.pixel_size();
        println!(
            "{:<32} {}x{} {} @ {} DPI -> {w}x{h} px",
            preset.name, preset.width, preset.height, preset.unit, preset.dpi
        );
    }
}

fn resolve_preset(name: Option<&str>) -> Result<SizePreset> {
    match name {
        None => Ok(default_preset()),
        Some(name) => preset_by_name(name).ok_or_else(|| {
            QuickconvError::UnsupportedFormat(format!(
                "no preset called '{name}'; run with --list to see them"
            ))
        }),
    }
}

pub async fn passport(svc: &AppServices, args: PassportArgs) -> CommandResult {
    if args.list {
        print_presets();
        return Ok(());
    }
    let Some(input) = args.input.as_deref() else {
        return Err(QuickconvError::RejectedFile("no photo given".into()).into());
    };

    let source = svc.intake(input, &svc.raster_policy())?;
    let asset = ImageAsset::decode(&source.bytes, source.declared_mime)?;
    let preset = resolve_preset(args.preset.as_deref())?;

    let crop = match args.crop.as_deref() {
        None => passport::default_crop(&asset, &preset)?,
        Some(raw) => {
            let [x, y, w, h] = parse_numbers::<4>(raw, "--crop")?;
            let drawn = CropRect::new(x, y, w, h);
            match args.preview.as_deref() {
                Some(preview) => {
                    let [pw, ph] = parse_numbers::<2>(preview, "--preview")?;
                    passport::crop_from_display(&asset, drawn, pw, ph)?
                }
                None => drawn,
            }
        }
    };
    info!(preset = %preset.name, ?crop, "cropping to preset");

    let pipeline = svc.pipeline();
    let (location, artifact) = run_tool(svc, "passport", source, &args.output, "passport", move |_| {
        passport::crop_to_preset(&pipeline, &asset, &preset, crop)
    })
    .await?;
    println!("{}", describe(&location, &artifact));
    Ok(())
}

pub async fn svg_to_image(svc: &AppServices, args: SvgToImageArgs) -> CommandResult {
    let source = svc.intake(&args.input, &svc.svg_policy())?;
    let target = parse_raster_target(Some(&args.format))?.unwrap_or(MimeType::Jpeg);
    if args.transparent && !target.supports_alpha() {
        warn!(%target, "format has no alpha channel; background will be white");
    }
    let options = RasterizeOptions {
        scale: args.scale.unwrap_or(svc.config().default_svg_scale),
        background: if args.transparent {
            Background::Transparent
        } else {
            Background::White
        },
        target,
        quality: args.quality,
    };

    let (location, artifact) = run_tool(svc, "svg-to-image", source, &args.output, "converted", move |source| {
        rasterize(&source.bytes, &options)
    })
    .await?;
    println!("{}", describe(&location, &artifact));
    Ok(())
}

pub async fn image_to_svg(svc: &AppServices, args: InputArgs) -> CommandResult {
    let source = svc.intake(&args.input, &svc.raster_policy())?;
    let (location, artifact) = run_tool(svc, "image-to-svg", source, &args.output, "wrapped", |source| {
        let asset = ImageAsset::decode(&source.bytes, source.declared_mime)?;
        wrap_raster_in_svg(&source.bytes, asset.source_mime())
    })
    .await?;
    println!("{}", describe(&location, &artifact));
    Ok(())
}

pub fn image_to_url(svc: &AppServices, args: ImageToUrlArgs) -> CommandResult {
    let source = svc.intake(&args.input, &svc.raster_policy())?;
    let asset = ImageAsset::decode(&source.bytes, source.declared_mime)?;
    println!("{}", to_data_url(&source.bytes, asset.source_mime()));
    Ok(())
}

pub async fn remove_bg(svc: &AppServices, args: InputArgs) -> CommandResult {
    let source = svc.intake(&args.input, &svc.raster_policy())?;
    let provider = svc.background_remover();
    if !provider.has_api_key() {
        return Err(QuickconvError::MissingApiKey.into());
    }

    let (location, artifact) = run_tool(svc, "remove-bg", source, &args.output, "no-bg", move |source| {
        let asset = ImageAsset::decode(&source.bytes, source.declared_mime)?;
        provider.enhance(&asset, &mut |progress| {
            info!(stage = %progress.stage, percent = progress.percent(), "background removal");
        })
    })
    .await?;
    println!("{}", describe(&location, &artifact));
    Ok(())
}
