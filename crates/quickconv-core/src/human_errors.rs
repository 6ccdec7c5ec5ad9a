// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to a specific plain-English message with a
// clear suggestion, so a failed tool never shows a generic "error occurred".

use crate::error::QuickconvError;
use crate::types::ErrorClass;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user typed something out of range; correcting it fixes the problem.
    FixInput,
    /// The chosen file cannot be used; pick another one.
    ChooseAnotherFile,
    /// The operation failed; starting it again is the only option.
    Failed,
    /// A service outside this app failed.
    ServiceProblem,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

impl HumanError {
    fn new(message: impl Into<String>, suggestion: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            severity,
        }
    }
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Place an error in the four-way taxonomy.
pub fn classify_error(err: &QuickconvError) -> ErrorClass {
    match err {
        QuickconvError::InvalidDimension(_)
        | QuickconvError::UnsupportedUnit(_)
        | QuickconvError::InvalidQuality(_)
        | QuickconvError::InvalidScale(_)
        | QuickconvError::InvalidAspectRatio(_)
        | QuickconvError::InvalidFilter(_)
        | QuickconvError::UnsupportedAlgorithm(_)
        | QuickconvError::UnsupportedFormat(_)
        | QuickconvError::RejectedFile(_)
        | QuickconvError::MissingApiKey
        | QuickconvError::EmptyDocument => ErrorClass::InvalidInput,

        QuickconvError::DecodeFailed(_)
        | QuickconvError::InvalidSvg(_)
        | QuickconvError::ImageDecodeFailed { .. } => ErrorClass::Unreadable,

        QuickconvError::EncodeFailed(_)
        | QuickconvError::DocumentBuildFailed(_)
        | QuickconvError::Io(_)
        | QuickconvError::Serialization(_) => ErrorClass::Fatal,

        QuickconvError::BackgroundRemovalFailed(_)
        | QuickconvError::PdfRenderFailed(_)
        | QuickconvError::PlatformUnavailable => ErrorClass::External,
    }
}

/// Convert a `QuickconvError` into a `HumanError`.
pub fn humanize_error(err: &QuickconvError) -> HumanError {
    match err {
        // -- Input errors --
        QuickconvError::InvalidDimension(detail) => HumanError::new(
            "Those dimensions don't work.",
            format!("Enter positive whole numbers for width and height. ({detail})"),
            Severity::FixInput,
        ),

        QuickconvError::UnsupportedUnit(unit) => HumanError::new(
            format!("\"{unit}\" isn't a unit we understand."),
            "Use inches (in), millimetres (mm), or pixels (px).",
            Severity::FixInput,
        ),

        QuickconvError::InvalidQuality(q) => HumanError::new(
            format!("A quality of {q} is out of range."),
            "Pick a quality between 0 and 1 (0% to 100%).",
            Severity::FixInput,
        ),

        QuickconvError::InvalidScale(s) => HumanError::new(
            format!("A scale of {s} can't be used."),
            "The scale must be a positive number, for example 1 or 2.",
            Severity::FixInput,
        ),

        QuickconvError::InvalidAspectRatio(r) => HumanError::new(
            format!("An aspect ratio of {r} can't be used."),
            "Choose one of the size presets or enter a positive width and height.",
            Severity::FixInput,
        ),

        QuickconvError::InvalidFilter(detail) => HumanError::new(
            "That adjustment can't be applied.",
            format!("Brightness, contrast and saturation must be zero or more percent. ({detail})"),
            Severity::FixInput,
        ),

        QuickconvError::UnsupportedAlgorithm(name) => HumanError::new(
            format!("\"{name}\" isn't a supported hash type."),
            "Choose SHA-1, SHA-256, or SHA-512.",
            Severity::FixInput,
        ),

        QuickconvError::UnsupportedFormat(detail) => HumanError::new(
            "That output format isn't supported.",
            format!("Choose JPEG, PNG, or WebP. ({detail})"),
            Severity::FixInput,
        ),

        QuickconvError::RejectedFile(detail) => HumanError::new(
            "This file can't be used with this tool.",
            detail.clone(),
            Severity::ChooseAnotherFile,
        ),

        QuickconvError::MissingApiKey => HumanError::new(
            "Background removal isn't set up.",
            "Provide an API key for the background-removal service in the settings or the QUICKCONV_BG_REMOVAL_API_KEY environment variable.",
            Severity::FixInput,
        ),

        QuickconvError::EmptyDocument => HumanError::new(
            "There are no images to put in the PDF.",
            "Add at least one image, then try again.",
            Severity::FixInput,
        ),

        // -- Unreadable sources --
        QuickconvError::DecodeFailed(_) => HumanError::new(
            "We couldn't read this image.",
            "The file may be damaged or in an unusual format. Try a JPEG, PNG, or WebP file.",
            Severity::ChooseAnotherFile,
        ),

        QuickconvError::InvalidSvg(_) => HumanError::new(
            "This SVG file couldn't be processed.",
            "Please make sure it's a valid SVG file.",
            Severity::ChooseAnotherFile,
        ),

        QuickconvError::ImageDecodeFailed { name, .. } => HumanError::new(
            format!("We couldn't read {name}."),
            "It was left out. Remove it or replace it with a different copy.",
            Severity::ChooseAnotherFile,
        ),

        // -- Fatal --
        QuickconvError::EncodeFailed(_) => HumanError::new(
            "We couldn't create the output image.",
            "Try a different output format or a smaller image.",
            Severity::Failed,
        ),

        QuickconvError::DocumentBuildFailed(_) => HumanError::new(
            "We couldn't create the PDF.",
            "Check the images can be opened, then try again.",
            Severity::Failed,
        ),

        QuickconvError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError::new(
                    "The file couldn't be found.",
                    "It may have been moved or deleted. Try choosing the file again.",
                    Severity::ChooseAnotherFile,
                )
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError::new(
                    "The app doesn't have permission to use that file.",
                    "Check the file permissions, or choose a different location.",
                    Severity::ChooseAnotherFile,
                )
            } else {
                HumanError::new(
                    "There was a problem reading or writing a file.",
                    "Try again. If this keeps happening, your device's storage may be full.",
                    Severity::Failed,
                )
            }
        }

        QuickconvError::Serialization(_) => HumanError::new(
            "The settings file couldn't be read.",
            "Fix or delete config.json in the data directory to restore defaults.",
            Severity::Failed,
        ),

        // -- External services --
        QuickconvError::BackgroundRemovalFailed(cause) => HumanError::new(
            "Background removal failed.",
            cause.clone(),
            Severity::ServiceProblem,
        ),

        QuickconvError::PdfRenderFailed(detail) => HumanError::new(
            "The PDF pages couldn't be rendered.",
            format!("The file may be damaged or password protected. ({detail})"),
            Severity::ServiceProblem,
        ),

        QuickconvError::PlatformUnavailable => HumanError::new(
            "This feature isn't available here.",
            "The service it needs isn't installed or configured on this device.",
            Severity::ServiceProblem,
        ),
    }
}

/// Turn a raw background-removal failure into a specific cause.
///
/// This is a best-effort classification by known substrings; anything
/// unrecognised is passed through verbatim.
pub fn describe_background_removal_failure(detail: &str) -> String {
    let lower = detail.to_ascii_lowercase();

    if lower.contains("url.startswith is not a function") {
        "Configuration error in the background-removal service. Check the model paths are correct.".into()
    } else if lower.contains("fetch") && (lower.contains("401") || lower.contains("unauthorized")) {
        "Authentication failed. Check your API key; it may be invalid or expired.".into()
    } else if lower.contains("blob") || lower.contains("did not return a valid") {
        "The image data couldn't be processed. The format may be unsupported or the file corrupted.".into()
    } else if lower.contains("networkerror") || lower.contains("failed to fetch") {
        "Network error. Check your internet connection; the AI models may be temporarily unavailable.".into()
    } else if lower.contains("model") {
        "The AI model couldn't be loaded. Try again; the model files may be inaccessible.".into()
    } else {
        format!("Error: {detail}.")
    }
}
