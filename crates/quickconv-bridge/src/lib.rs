// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// quickconv-bridge — interfaces to the collaborators the tools depend on but
// do not implement: AI background removal, PDF page rendering, and the
// place downloads land.

pub mod download;
pub mod stub;
pub mod traits;

pub use download::FsDownloadTarget;
pub use traits::{
    BackgroundRemovalService, DownloadTarget, PdfRenderService, PlatformBridge, RemovalProgress,
    RenderedPage,
};

/// The collaborator bridge for this build.
///
/// No background-removal or PDF-rendering engine ships with the desktop
/// build, so every call fails with `PlatformUnavailable` until one is wired
/// in.
pub fn platform_bridge() -> Box<dyn PlatformBridge> {
    Box::new(stub::StubBridge)
}

/// The background-removal half of [`platform_bridge`].
pub fn background_removal_service() -> Box<dyn BackgroundRemovalService + Send + Sync> {
    Box::new(stub::StubBridge)
}
