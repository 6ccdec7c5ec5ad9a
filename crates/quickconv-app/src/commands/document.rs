// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF tools: images → PDF and PDF → images.

use quickconv_core::QuickconvError;
use quickconv_core::intake::format_bytes;
use quickconv_core::types::{MimeType, Orientation, PageSize, SourceFile};
use quickconv_image::pdf::render_all_pages;
use quickconv_image::EncodedArtifact;
use tracing::{info, warn};

use super::{CommandError, CommandResult, describe, output_stem};
use crate::cli::{ImagesToPdfArgs, PdfToImagesArgs};
use crate::services::app_services::AppServices;

/// Run blocking work on tokio's blocking pool.
async fn blocking<T, F>(job: F) -> Result<T, CommandError>
where
    T: Send + 'static,
    F: FnOnce() -> quickconv_core::error::Result<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(outcome) => outcome.map_err(CommandError::from),
        Err(err) => Err(QuickconvError::DocumentBuildFailed(format!("worker stopped: {err}")).into()),
    }
}

pub async fn images_to_pdf(svc: &AppServices, args: ImagesToPdfArgs) -> CommandResult {
    let limit = svc.config().max_pdf_items;
    if args.inputs.len() > limit {
        return Err(QuickconvError::RejectedFile(format!(
            "{} images chosen; the limit is {limit}",
            args.inputs.len()
        ))
        .into());
    }

    let policy = svc.raster_policy();
    let mut sources: Vec<SourceFile> = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        match svc.intake(path, &policy) {
            Ok(source) => sources.push(source),
            Err(err) => warn!(path = %path.display(), error = %err, "not adding file"),
        }
    }
    if sources.is_empty() {
        return Err(QuickconvError::EmptyDocument.into());
    }

    let mut assembler = svc.assembler();
    if let Some(raw) = args.page_size.as_deref() {
        assembler.set_page_size(raw.parse::<PageSize>()?);
    }
    if args.landscape {
        assembler.set_orientation(Orientation::Landscape);
    }
    if let Some(margin) = args.margin {
        assembler.set_margin_mm(margin);
    }
    let stem = output_stem(&args.output, &sources[0], "images");
    assembler.set_title(stem.clone());
    info!(images = sources.len(), title = assembler.title(), "building PDF");

    let document = blocking(move || assembler.assemble(&sources)).await?;
    for skipped in &document.skipped {
        println!("Skipped {}: {}", skipped.name, skipped.reason);
    }

    let artifact = EncodedArtifact::new(document.bytes, MimeType::Pdf);
    let location = svc.save(&args.output.out_dir, &stem, &artifact)?;
    println!(
        "Saved {location} ({} pages, {})",
        document.page_count,
        format_bytes(artifact.byte_size() as u64, 2)
    );
    Ok(())
}

pub async fn pdf_to_images(svc: &AppServices, args: PdfToImagesArgs) -> CommandResult {
    let source = svc.intake(&args.input, &svc.pdf_policy())?;
    let pages = quickconv_image::pdf::page_count(&source.bytes)?;
    info!(pages, "exporting PDF pages");

    let stem = output_stem(&args.output, &source, "page");
    let worker = svc.clone();
    let (scale, quality) = (args.scale, args.quality);
    let artifacts = blocking(move || render_all_pages(worker.bridge(), &source.bytes, scale, quality)).await?;

    for (index, artifact) in artifacts.iter().enumerate() {
        let location = svc.save(&args.output.out_dir, &format!("{stem}-{}", index + 1), artifact)?;
        println!("{}", describe(&location, artifact));
    }
    Ok(())
}
