// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Decoded source images.

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, ImageReader};
use quickconv_core::error::{QuickconvError, Result};
use quickconv_core::types::MimeType;
use tracing::{debug, instrument};

/// A decoded image ready for pixel operations.
///
/// The bitmap is immutable and shared; transforms build new assets rather
/// than editing this one, and the pixels are freed with the last clone.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pixels: Arc<DynamicImage>,
    source_mime: MimeType,
    source_byte_size: usize,
}

fn mime_for_format(format: ImageFormat) -> Option<MimeType> {
    match format {
        ImageFormat::Jpeg => Some(MimeType::Jpeg),
        ImageFormat::Png => Some(MimeType::Png),
        ImageFormat::WebP => Some(MimeType::Webp),
        ImageFormat::Gif => Some(MimeType::Gif),
        ImageFormat::Bmp => Some(MimeType::Bmp),
        _ => None,
    }
}

impl ImageAsset {
    /// Decode encoded bytes. The container format is sniffed from the content;
    /// `declared_mime` only fills in the source type when sniffing finds a
    /// format with no MIME mapping of its own.
    #[instrument(skip(bytes), fields(len = bytes.len(), declared = ?declared_mime))]
    pub fn decode(bytes: &[u8], declared_mime: Option<MimeType>) -> Result<Self> {
        if declared_mime == Some(MimeType::Svg) {
            return Err(QuickconvError::DecodeFailed(
                "SVG is vector content and must be rasterised first".into(),
            ));
        }

        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|err| QuickconvError::DecodeFailed(err.to_string()))?;
        let format = reader
            .format()
            .ok_or_else(|| QuickconvError::DecodeFailed("unrecognised image format".into()))?;
        let image = reader
            .decode()
            .map_err(|err| QuickconvError::DecodeFailed(err.to_string()))?;

        let source_mime = mime_for_format(format)
            .or(declared_mime)
            .unwrap_or(MimeType::Png);
        debug!(
            width = image.width(),
            height = image.height(),
            %source_mime,
            "image decoded"
        );

        let mut asset = Self::from_image(image, source_mime)?;
        asset.source_byte_size = bytes.len();
        Ok(asset)
    }

    /// Wrap an already-decoded bitmap.
    pub fn from_image(image: DynamicImage, source_mime: MimeType) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(QuickconvError::DecodeFailed(format!(
                "image has no pixels ({}x{})",
                image.width(),
                image.height()
            )));
        }
        Ok(Self {
            pixels: Arc::new(image),
            source_mime,
            source_byte_size: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    pub(crate) fn shared_pixels(&self) -> Arc<DynamicImage> {
        Arc::clone(&self.pixels)
    }

    pub fn source_mime(&self) -> MimeType {
        self.source_mime
    }

    /// Size of the encoded input, 0 for assets built from bitmaps.
    pub fn source_byte_size(&self) -> usize {
        self.source_byte_size
    }
}
