// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decode, transform (resize, filter, crop), and encode.

pub mod asset;
pub mod encode;
pub mod filter;
pub mod pipeline;
pub mod transform;

pub use asset::ImageAsset;
pub use encode::encode;
pub use filter::FilterSettings;
pub use pipeline::RasterPipeline;
pub use transform::TransformSpec;
