// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Images → PDF, one image per page, using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.
//
// Layout treats one image pixel as one millimetre: an image is shown at that
// size when it fits inside the margins, and is scaled down (never up) when it
// does not.

use image::imageops::FilterType;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use quickconv_core::AppConfig;
use quickconv_core::error::{QuickconvError, Result};
use quickconv_core::geometry::{MM_PER_INCH, scale_to_fit, scale_to_fit_px};
use quickconv_core::types::{Orientation, PageSize, SourceFile};
use tracing::{debug, info, instrument, warn};

use crate::image::ImageAsset;
use crate::image::encode::flatten_onto_white;

/// Embedded bitmaps are downsampled to at most this resolution of their
/// placed size.
pub const EMBED_MAX_DPI: f64 = 150.0;

/// Default page margin in millimetres.
pub const DEFAULT_MARGIN_MM: f32 = 10.0;

/// One page's worth of content.
#[derive(Debug, Clone)]
pub struct PageItem {
    pub name: String,
    pub asset: ImageAsset,
}

/// An ordered, editable list of images plus the page layout they will be
/// printed with.
#[derive(Debug, Clone)]
pub struct PagedDocument {
    items: Vec<PageItem>,
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub margin_mm: f32,
}

impl PagedDocument {
    pub fn new(page_size: PageSize, orientation: Orientation, margin_mm: f32) -> Self {
        Self {
            items: Vec::new(),
            page_size,
            orientation,
            margin_mm,
        }
    }

    pub fn push(&mut self, name: impl Into<String>, asset: ImageAsset) {
        self.items.push(PageItem {
            name: name.into(),
            asset,
        });
    }

    /// Remove and return the item at `index`, if there is one.
    pub fn remove(&mut self, index: usize) -> Option<PageItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Move the item at `from` so it ends up at `to`. Returns `false` when
    /// either index is out of range.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if from >= self.items.len() || to >= self.items.len() {
            return false;
        }
        let item = self.items.remove(from);
        self.items.insert(to, item);
        true
    }

    pub fn items(&self) -> &[PageItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Page width and height in millimetres.
    pub fn page_mm(&self) -> (f32, f32) {
        self.page_size.oriented_mm(self.orientation)
    }
}

/// Where an image lands on its page, in millimetres from the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// Fit an `img_w` x `img_h` pixel image inside the page margins and centre it.
pub fn place_image(img_w: u32, img_h: u32, page_w: f64, page_h: f64, margin: f64) -> Placement {
    let usable_w = (page_w - 2.0 * margin).max(1.0);
    let usable_h = (page_h - 2.0 * margin).max(1.0);
    let (width_mm, height_mm) = scale_to_fit(f64::from(img_w), f64::from(img_h), usable_w, usable_h);
    Placement {
        x_mm: (page_w - width_mm) / 2.0,
        y_mm: (page_h - height_mm) / 2.0,
        width_mm,
        height_mm,
    }
}

/// A file that could not be placed in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub name: String,
    pub reason: String,
}

/// A serialised PDF and what went into it.
#[derive(Debug, Clone)]
pub struct AssembledDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub skipped: Vec<SkippedItem>,
}

/// Builds PDFs from images.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    page_size: PageSize,
    orientation: Orientation,
    margin_mm: f32,
    title: String,
}

impl Default for DocumentAssembler {
    /// A4 portrait, 10 mm margins.
    fn default() -> Self {
        Self::new(PageSize::A4, Orientation::Portrait, DEFAULT_MARGIN_MM)
    }
}

impl DocumentAssembler {
    pub fn new(page_size: PageSize, orientation: Orientation, margin_mm: f32) -> Self {
        Self {
            page_size,
            orientation,
            margin_mm: margin_mm.max(0.0),
            title: "Quick Converter Images".to_owned(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.default_page_size, Orientation::Portrait, config.page_margin_mm)
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Negative margins are treated as zero.
    pub fn set_margin_mm(&mut self, margin_mm: f32) {
        self.margin_mm = margin_mm.max(0.0);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// An empty document with this assembler's layout.
    pub fn new_document(&self) -> PagedDocument {
        PagedDocument::new(self.page_size, self.orientation, self.margin_mm)
    }

    /// Decode every source in order and build one page per image.
    ///
    /// Sources that fail to decode are skipped with a warning; if none
    /// decode, the build fails.
    #[instrument(skip(self, sources), fields(count = sources.len()))]
    pub fn assemble(&self, sources: &[SourceFile]) -> Result<AssembledDocument> {
        let mut document = self.new_document();
        let mut skipped = Vec::new();

        for source in sources {
            match ImageAsset::decode(&source.bytes, source.declared_mime) {
                Ok(asset) => document.push(source.name.clone(), asset),
                Err(err) => {
                    let err = QuickconvError::ImageDecodeFailed {
                        name: source.name.clone(),
                        reason: err.to_string(),
                    };
                    warn!(error = %err, "skipping image");
                    skipped.push(SkippedItem {
                        name: source.name.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        if document.is_empty() {
            return Err(QuickconvError::DocumentBuildFailed(format!(
                "none of the {} images could be read",
                sources.len()
            )));
        }

        let bytes = self.render(&document)?;
        Ok(AssembledDocument {
            bytes,
            page_count: document.len(),
            skipped,
        })
    }

    /// Serialise `document`, one page per item in order.
    #[instrument(skip(self, document), fields(pages = document.len()))]
    pub fn render(&self, document: &PagedDocument) -> Result<Vec<u8>> {
        if document.is_empty() {
            return Err(QuickconvError::EmptyDocument);
        }

        let (page_w, page_h) = document.page_mm();
        info!(
            paper = ?document.page_size,
            orientation = ?document.orientation,
            margin_mm = document.margin_mm,
            "creating image PDF"
        );

        let mut doc = PdfDocument::new(&self.title);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(document.len());

        for item in document.items() {
            let placement = place_image(
                item.asset.width(),
                item.asset.height(),
                f64::from(page_w),
                f64::from(page_h),
                f64::from(document.margin_mm),
            );

            let rgb = embed_bitmap(&item.asset, &placement);
            let (px_w, px_h) = rgb.dimensions();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: px_w as usize,
                height: px_h as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // At 72 DPI one bitmap pixel is one point, so the scale factors
            // map pixels straight onto the placed size.
            let target_w_pt = Mm(placement.width_mm as f32).into_pt().0;
            let target_h_pt = Mm(placement.height_mm as f32).into_pt().0;
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Mm(placement.x_mm as f32).into_pt()),
                    translate_y: Some(Mm(placement.y_mm as f32).into_pt()),
                    scale_x: Some(target_w_pt / px_w as f32),
                    scale_y: Some(target_h_pt / px_h as f32),
                    dpi: Some(72.0),
                    rotate: None,
                },
            }];

            debug!(
                name = %item.name,
                px_w,
                px_h,
                width_mm = placement.width_mm,
                height_mm = placement.height_mm,
                "image placed on page"
            );
            pages.push(PdfPage::new(Mm(page_w), Mm(page_h), ops));
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if output.is_empty() {
            return Err(QuickconvError::DocumentBuildFailed(
                "PDF serialisation produced no output".into(),
            ));
        }
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "PDF serialiser reported warnings");
        }

        info!(pages = document.len(), len = output.len(), "PDF assembled");
        Ok(output)
    }
}

/// Opaque RGB bitmap to embed, downsampled to [`EMBED_MAX_DPI`] of the
/// placed size when the source is larger.
fn embed_bitmap(asset: &ImageAsset, placement: &Placement) -> image::RgbImage {
    let max_w = (placement.width_mm / MM_PER_INCH * EMBED_MAX_DPI).ceil().max(1.0) as u32;
    let max_h = (placement.height_mm / MM_PER_INCH * EMBED_MAX_DPI).ceil().max(1.0) as u32;
    let (w, h) = scale_to_fit_px(asset.width(), asset.height(), max_w, max_h);

    if (w, h) == (asset.width(), asset.height()) {
        flatten_onto_white(asset.pixels())
    } else {
        let resized = asset.pixels().resize_exact(w, h, FilterType::Triangle);
        flatten_onto_white(&resized)
    }
}
