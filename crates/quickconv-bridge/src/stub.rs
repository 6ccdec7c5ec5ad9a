// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for builds without a background-removal or PDF-rendering
// engine.
//
// Every trait method returns `PlatformUnavailable`.

use quickconv_core::error::{QuickconvError, Result};

use crate::traits::*;

/// Bridge with no collaborators attached.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }
}

impl BackgroundRemovalService for StubBridge {
    fn remove_background(
        &self,
        _image: &[u8],
        _api_key: &str,
        _progress: &mut dyn FnMut(RemovalProgress),
    ) -> Result<Vec<u8>> {
        tracing::warn!("BackgroundRemovalService::remove_background called on stub bridge");
        Err(QuickconvError::PlatformUnavailable)
    }
}

impl PdfRenderService for StubBridge {
    fn page_count(&self, _pdf: &[u8]) -> Result<u32> {
        tracing::warn!("PdfRenderService::page_count called on stub bridge");
        Err(QuickconvError::PlatformUnavailable)
    }

    fn render_page(&self, _pdf: &[u8], _index: u32, _scale: f32) -> Result<RenderedPage> {
        Err(QuickconvError::PlatformUnavailable)
    }
}
