// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF → images. Rendering belongs to the platform's `PdfRenderService`; this
// module drives it page by page and encodes each page.

use image::{DynamicImage, RgbaImage};
use lopdf::Document;
use quickconv_bridge::PdfRenderService;
use quickconv_core::error::{QuickconvError, Result};
use quickconv_core::types::MimeType;
use tracing::{debug, info, instrument};

use crate::artifact::EncodedArtifact;
use crate::image::encode::encode;
use crate::image::transform::validate_quality;

/// Count pages without a renderer, by reading the page tree.
pub fn page_count(pdf: &[u8]) -> Result<usize> {
    let document = Document::load_mem(pdf)
        .map_err(|err| QuickconvError::PdfRenderFailed(format!("failed to load PDF: {err}")))?;
    Ok(document.get_pages().len())
}

/// Render every page of `pdf` at `scale` and encode each as JPEG at
/// `quality`. Pages are requested in increasing order and returned in that
/// order; the first failure stops the run.
#[instrument(skip(renderer, pdf), fields(len = pdf.len()))]
pub fn render_all_pages<R: PdfRenderService + ?Sized>(
    renderer: &R,
    pdf: &[u8],
    scale: f32,
    quality: f32,
) -> Result<Vec<EncodedArtifact>> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(QuickconvError::InvalidScale(scale));
    }
    validate_quality(quality)?;

    let count = renderer.page_count(pdf)?;
    info!(pages = count, "rendering PDF pages");

    let mut artifacts = Vec::with_capacity(count as usize);
    for index in 0..count {
        let page = renderer.render_page(pdf, index, scale)?;
        let (width, height) = (page.width, page.height);
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(4));
        let pixels = match expected {
            Some(len) if len == page.rgba.len() => RgbaImage::from_raw(width, height, page.rgba),
            _ => None,
        }
        .ok_or_else(|| {
            QuickconvError::PdfRenderFailed(format!(
                "page {} came back with a buffer that does not match {width}x{height}",
                index + 1
            ))
        })?;
        let bytes = encode(&DynamicImage::ImageRgba8(pixels), MimeType::Jpeg, quality)?;
        debug!(page = index + 1, width, height, len = bytes.len(), "page encoded");
        artifacts.push(EncodedArtifact::raster(bytes, MimeType::Jpeg, width, height));
    }
    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageAsset;
    use crate::pdf::DocumentAssembler;
    use quickconv_bridge::RenderedPage;
    use std::cell::RefCell;

    /// Renders page `i` as a solid (i+1)x1 strip and records the call order.
    struct FakeRenderer {
        pages: u32,
        calls: RefCell<Vec<u32>>,
    }

    impl PdfRenderService for FakeRenderer {
        fn page_count(&self, _pdf: &[u8]) -> Result<u32> {
            Ok(self.pages)
        }

        fn render_page(&self, _pdf: &[u8], index: u32, _scale: f32) -> Result<RenderedPage> {
            self.calls.borrow_mut().push(index);
            let width = index + 1;
            Ok(RenderedPage {
                width,
                height: 1,
                rgba: vec![255; (width * 4) as usize],
            })
        }
    }

    /// Claims `width` x `height` but hands back `len` bytes.
    struct BrokenRenderer {
        width: u32,
        height: u32,
        len: usize,
    }

    impl PdfRenderService for BrokenRenderer {
        fn page_count(&self, _pdf: &[u8]) -> Result<u32> {
            Ok(2)
        }

        fn render_page(&self, _pdf: &[u8], _index: u32, _scale: f32) -> Result<RenderedPage> {
            Ok(RenderedPage {
                width: self.width,
                height: self.height,
                rgba: vec![0; self.len],
            })
        }
    }

    #[test]
    fn pages_are_rendered_in_order() {
        let renderer = FakeRenderer {
            pages: 4,
            calls: RefCell::new(Vec::new()),
        };
        let out = render_all_pages(&renderer, b"%PDF", 1.5, 0.9).unwrap();
        assert_eq!(*renderer.calls.borrow(), vec![0, 1, 2, 3]);
        let widths: Vec<_> = out.iter().map(|a| a.width.unwrap()).collect();
        assert_eq!(widths, vec![1, 2, 3, 4]);
        assert!(out.iter().all(|a| a.mime == MimeType::Jpeg));
    }

    #[test]
    fn zero_page_documents_give_no_images() {
        let renderer = FakeRenderer {
            pages: 0,
            calls: RefCell::new(Vec::new()),
        };
        assert!(render_all_pages(&renderer, b"%PDF", 1.0, 0.9).unwrap().is_empty());
    }

    #[test]
    fn mismatched_buffers_fail() {
        let short = BrokenRenderer {
            width: 10,
            height: 10,
            len: 3,
        };
        let long = BrokenRenderer {
            width: 2,
            height: 2,
            len: 1000,
        };
        let huge = BrokenRenderer {
            width: u32::MAX,
            height: u32::MAX,
            len: 16,
        };
        for renderer in [short, long, huge] {
            assert!(matches!(
                render_all_pages(&renderer, b"%PDF", 1.0, 0.9),
                Err(QuickconvError::PdfRenderFailed(_))
            ));
        }
    }

    #[test]
    fn scale_is_checked_before_rendering() {
        let renderer = FakeRenderer {
            pages: 1,
            calls: RefCell::new(Vec::new()),
        };
        assert!(matches!(
            render_all_pages(&renderer, b"%PDF", 0.0, 0.9),
            Err(QuickconvError::InvalidScale(_))
        ));
        assert!(renderer.calls.borrow().is_empty());
    }

    #[test]
    fn page_count_reads_generated_documents() {
        let assembler = DocumentAssembler::default();
        let mut document = assembler.new_document();
        for _ in 0..2 {
            let img = DynamicImage::ImageRgb8(image::RgbImage::new(3, 3));
            document.push("page", ImageAsset::from_image(img, MimeType::Png).unwrap());
        }
        let bytes = assembler.render(&document).unwrap();
        assert_eq!(page_count(&bytes).unwrap(), 2);
    }

    #[test]
    fn page_count_rejects_garbage() {
        assert!(matches!(
            page_count(b"definitely not a pdf"),
            Err(QuickconvError::PdfRenderFailed(_))
        ));
    }
}
