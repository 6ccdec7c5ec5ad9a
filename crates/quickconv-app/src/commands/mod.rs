// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command implementations, plus the plumbing they share: argument parsing
// helpers, running a tool session, and saving its result.

pub mod document;
pub mod image;
pub mod text;

use std::fmt;

use quickconv_core::error::Result;
use quickconv_core::human_errors::{HumanError, humanize_error};
use quickconv_core::intake::format_bytes;
use quickconv_core::types::{MimeType, SourceFile};
use quickconv_core::QuickconvError;
use quickconv_image::EncodedArtifact;

use crate::cli::{Commands, OutputArgs};
use crate::services::app_services::AppServices;
use crate::session::{ToolEvent, ToolState};

/// A failed command, already phrased for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandError(pub HumanError);

impl From<QuickconvError> for CommandError {
    fn from(err: QuickconvError) -> Self {
        tracing::debug!(error = %err, "command failed");
        Self(humanize_error(&err))
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.0.message, self.0.suggestion)
    }
}

pub type CommandResult = std::result::Result<(), CommandError>;

/// Dispatch one parsed command.
pub async fn run(svc: &AppServices, command: Commands) -> CommandResult {
    match command {
        Commands::Resize(args) => image::resize(svc, args).await,
        Commands::Compress(args) => image::compress(svc, args).await,
        Commands::Enhance(args) => image::enhance(svc, args).await,
        Commands::Passport(args) => image::passport(svc, args).await,
        Commands::SvgToImage(args) => image::svg_to_image(svc, args).await,
        Commands::ImageToSvg(args) => image::image_to_svg(svc, args).await,
        Commands::ImageToUrl(args) => image::image_to_url(svc, args),
        Commands::RemoveBg(args) => image::remove_bg(svc, args).await,
        Commands::ImagesToPdf(args) => document::images_to_pdf(svc, args).await,
        Commands::PdfToImages(args) => document::pdf_to_images(svc, args).await,
        Commands::Hash(args) => text::hash(args),
        Commands::Case(args) => text::case(args),
        Commands::Color(args) => text::color(args),
    }
}

/// Run `job` over `source` in a fresh tool session, save the result, and
/// return the artifact's saved location.
pub(crate) async fn run_tool<F>(
    svc: &AppServices,
    tool: &'static str,
    source: SourceFile,
    output: &OutputArgs,
    suffix: &str,
    job: F,
) -> std::result::Result<(String, EncodedArtifact), CommandError>
where
    F: FnOnce(SourceFile) -> Result<EncodedArtifact> + Send + 'static,
{
    let stem = output_stem(output, &source, suffix);
    let mut session = svc.session(tool);
    session.apply(ToolEvent::FileChosen(source));

    match session.run(job).await {
        ToolState::Ready => {}
        ToolState::Failed(human) => return Err(CommandError(human.clone())),
        other => {
            return Err(QuickconvError::EncodeFailed(format!(
                "{tool} stopped in state {}",
                other.name()
            ))
            .into());
        }
    }

    let artifact = match session.display() {
        Some(display) => display.artifact().clone(),
        None => return Err(QuickconvError::EncodeFailed(format!("{tool} produced no result")).into()),
    };
    let location = svc.save(&output.out_dir, &stem, &artifact)?;

    // Saved; release the display handle.
    session.apply(ToolEvent::Reset);
    tracing::debug!(tool, state = session.state().name(), "session closed");
    Ok((location, artifact))
}

/// `--name` if given, otherwise `<input stem>-<suffix>`.
pub(crate) fn output_stem(output: &OutputArgs, source: &SourceFile, suffix: &str) -> String {
    match &output.name {
        Some(name) if !name.trim().is_empty() => name.trim().to_owned(),
        _ => format!("{}-{suffix}", source.stem()),
    }
}

/// Parse an optional output format, which must be one the encoders write.
pub(crate) fn parse_raster_target(format: Option<&str>) -> Result<Option<MimeType>> {
    let Some(format) = format else {
        return Ok(None);
    };
    let mime: MimeType = format.parse()?;
    if !mime.is_encodable_raster() {
        return Err(QuickconvError::UnsupportedFormat(format!(
            "{format} cannot be written; choose jpeg, png or webp"
        )));
    }
    Ok(Some(mime))
}

/// Parse exactly `N` comma-separated numbers.
pub(crate) fn parse_numbers<const N: usize>(input: &str, what: &str) -> Result<[f64; N]> {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    let invalid = || {
        QuickconvError::InvalidDimension(format!(
            "{what} must be {N} comma-separated numbers, got '{input}'"
        ))
    };
    if parts.len() != N {
        return Err(invalid());
    }
    let mut values = [0.0; N];
    for (slot, part) in values.iter_mut().zip(parts) {
        *slot = part.parse::<f64>().map_err(|_| invalid())?;
    }
    Ok(values)
}

/// One-line summary printed after a tool saves its result.
pub(crate) fn describe(location: &str, artifact: &EncodedArtifact) -> String {
    let size = format_bytes(artifact.byte_size() as u64, 2);
    match (artifact.width, artifact.height) {
        (Some(w), Some(h)) => format!("Saved {location} ({w}x{h}, {size})"),
        _ => format!("Saved {location} ({size})"),
    }
}
