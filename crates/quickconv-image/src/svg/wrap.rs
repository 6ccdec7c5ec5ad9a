// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster → SVG container. The bitmap is embedded as a data URL inside a
// single `<image>` element; nothing is traced into vector paths.

use quickconv_core::error::{QuickconvError, Result};
use quickconv_core::types::MimeType;
use tracing::debug;

use crate::artifact::{EncodedArtifact, to_data_url};

/// Wrap encoded raster `bytes` of type `mime` in an SVG document that scales
/// the picture into a 100×100 viewBox, preserving its aspect ratio.
pub fn wrap_raster_in_svg(bytes: &[u8], mime: MimeType) -> Result<EncodedArtifact> {
    if matches!(mime, MimeType::Svg | MimeType::Pdf) {
        return Err(QuickconvError::UnsupportedFormat(format!(
            "{mime} is not a raster image"
        )));
    }

    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" "#,
            r#"width="100%" height="100%" viewBox="0 0 100 100" preserveAspectRatio="xMidYMid meet">"#,
            r#"<image xlink:href="{}" width="100" height="100"/>"#,
            "</svg>"
        ),
        to_data_url(bytes, mime)
    );
    debug!(source_len = bytes.len(), svg_len = svg.len(), "raster wrapped in svg");
    Ok(EncodedArtifact::new(svg.into_bytes(), MimeType::Svg))
}
