// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File intake — accepted-type and size checks applied before a file reaches
// any tool, plus human-readable byte sizes for the UI.

use tracing::{debug, warn};

use crate::error::{QuickconvError, Result};
use crate::types::{MimeType, SourceFile};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// What a tool accepts from the file picker.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakePolicy {
    /// Accepted media types. Empty means "anything".
    pub accepted: Vec<MimeType>,
    /// Maximum file size in megabytes.
    pub max_size_mb: u64,
}

impl IntakePolicy {
    pub fn new(accepted: Vec<MimeType>, max_size_mb: u64) -> Self {
        Self {
            accepted,
            max_size_mb,
        }
    }

    /// JPEG, PNG, WebP, GIF and BMP.
    pub fn raster_images(max_size_mb: u64) -> Self {
        Self::new(
            vec![
                MimeType::Jpeg,
                MimeType::Png,
                MimeType::Webp,
                MimeType::Gif,
                MimeType::Bmp,
            ],
            max_size_mb,
        )
    }

    pub fn svg(max_size_mb: u64) -> Self {
        Self::new(vec![MimeType::Svg], max_size_mb)
    }

    /// Validate a picked file. Type is judged by the declared MIME type, falling
    /// back to the file extension.
    pub fn admit(&self, file: SourceFile) -> Result<SourceFile> {
        let kind = file
            .declared_mime
            .or_else(|| MimeType::from_file_name(&file.name));

        if !self.accepted.is_empty() && !kind.is_some_and(|k| self.accepted.contains(&k)) {
            warn!(name = %file.name, "rejected file with unaccepted type");
            let accepted: Vec<&str> = self.accepted.iter().map(|m| m.extension()).collect();
            return Err(QuickconvError::RejectedFile(format!(
                "{} is not an accepted file type (accepted: {})",
                file.name,
                accepted.join(", ")
            )));
        }

        let limit = self.max_size_mb.saturating_mul(BYTES_PER_MB);
        if file.byte_size() as u64 > limit {
            warn!(name = %file.name, size = file.byte_size(), "rejected oversized file");
            return Err(QuickconvError::RejectedFile(format!(
                "{} is {:.2}MB; the limit is {}MB",
                file.name,
                file.byte_size() as f64 / BYTES_PER_MB as f64,
                self.max_size_mb
            )));
        }

        debug!(name = %file.name, size = file.byte_size(), "file admitted");
        Ok(file)
    }
}

/// Human-readable byte count (`1.5 KB`, `2 MB`, ...).
///
/// Trailing zeros are trimmed, so `2048` with two decimals is `2 KB`.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    const SIZES: [&str; 9] = ["Bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
    if bytes == 0 {
        return "0 Bytes".to_owned();
    }
    let mut value = bytes as f64;
    let mut i = 0;
    while value >= 1024.0 && i < SIZES.len() - 1 {
        value /= 1024.0;
        i += 1;
    }
    let rendered = format!("{value:.decimals$}");
    let trimmed = if rendered.contains('.') {
        rendered.trim_end_matches('0').trim_end_matches('.')
    } else {
        rendered.as_str()
    };
    format!("{trimmed} {}", SIZES[i])
}
