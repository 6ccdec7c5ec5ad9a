// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// quickconv-image — Image processing for Quick Converter.
//
// Provides the raster pipeline (decode, resize, filter, crop, encode), SVG
// rasterisation and SVG wrapping, images-to-PDF assembly, PDF page export,
// the passport crop tool, and enhancement providers.

pub mod artifact;
pub mod enhance;
pub mod image;
pub mod passport;
pub mod pdf;
pub mod svg;

// Re-export the primary types so callers can use `quickconv_image::RasterPipeline` etc.
pub use artifact::{ArtifactStore, DisplayUrl, EncodedArtifact, to_data_url};
pub use enhance::{EnhancementProvider, LocalFilterProvider, RemoteAiProvider};
pub use image::{FilterSettings, ImageAsset, RasterPipeline, TransformSpec};
pub use pdf::{AssembledDocument, DocumentAssembler, PagedDocument};
pub use svg::{Background, RasterizeOptions};
