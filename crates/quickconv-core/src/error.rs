// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Quick Converter.

use thiserror::Error;

/// Top-level error type for all Quick Converter operations.
#[derive(Debug, Error)]
pub enum QuickconvError {
    // -- Input errors (caller can fix the input) --
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("unsupported unit: {0}")]
    UnsupportedUnit(String),

    #[error("invalid quality {0}: must be between 0 and 1")]
    InvalidQuality(f32),

    #[error("invalid scale {0}: must be a positive number")]
    InvalidScale(f32),

    #[error("invalid aspect ratio {0}: must be a positive number")]
    InvalidAspectRatio(f64),

    #[error("invalid filter setting: {0}")]
    InvalidFilter(String),

    #[error("unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("file rejected: {0}")]
    RejectedFile(String),

    #[error("background removal API key is not configured")]
    MissingApiKey,

    #[error("document has no pages")]
    EmptyDocument,

    // -- Unreadable source --
    #[error("image decoding failed: {0}")]
    DecodeFailed(String),

    #[error("invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("failed to decode image {name}: {reason}")]
    ImageDecodeFailed { name: String, reason: String },

    // -- Fatal for the current operation --
    #[error("image encoding failed: {0}")]
    EncodeFailed(String),

    #[error("document build failed: {0}")]
    DocumentBuildFailed(String),

    // -- External collaborators --
    #[error("background removal failed: {0}")]
    BackgroundRemovalFailed(String),

    #[error("PDF rendering failed: {0}")]
    PdfRenderFailed(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, QuickconvError>;
