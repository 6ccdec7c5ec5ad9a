// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SVG module — rasterising vector documents and wrapping rasters in SVG.

pub mod rasterize;
pub mod wrap;

pub use rasterize::{Background, RasterizeOptions, rasterize, rasterize_str};
pub use wrap::wrap_raster_in_svg;
