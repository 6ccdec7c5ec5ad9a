// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Trait definitions for external collaborators.
//
// The tools treat these as black boxes: bytes in, bytes out. Implementations
// report failures as `QuickconvError` variants from the External group.

use quickconv_core::error::Result;

/// Grouping of every black-box capability the app can call.
pub trait PlatformBridge: BackgroundRemovalService + PdfRenderService + Send + Sync {
    /// Human-readable name of the implementation (e.g. "Desktop (stub)").
    fn platform_name(&self) -> &str;
}

/// Progress notification from a background-removal run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalProgress {
    /// What the service is doing (e.g. "fetch:model", "compute:inference").
    pub stage: String,
    pub current: u64,
    pub total: u64,
}

impl RemovalProgress {
    /// Completion in percent, 0 when the total is unknown.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let current = u128::from(self.current.min(self.total));
        ((current * 100) / u128::from(self.total)) as u8
    }
}

/// AI background removal.
pub trait BackgroundRemovalService {
    /// Remove the background from an encoded image and return the result
    /// (PNG with alpha). `progress` may be called any number of times.
    ///
    /// Failures other than a missing key or platform support should come
    /// back as `BackgroundRemovalFailed` carrying the service's raw message;
    /// callers turn it into a specific cause.
    fn remove_background(
        &self,
        image: &[u8],
        api_key: &str,
        progress: &mut dyn FnMut(RemovalProgress),
    ) -> Result<Vec<u8>>;
}

/// A rendered PDF page as straight (non-premultiplied) RGBA8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// PDF page rasterisation.
pub trait PdfRenderService {
    /// Number of pages in `pdf`.
    fn page_count(&self, pdf: &[u8]) -> Result<u32>;

    /// Render page `index` (zero-based) at `scale` × its natural size.
    fn render_page(&self, pdf: &[u8], index: u32, scale: f32) -> Result<RenderedPage>;
}

/// Where finished artifacts are handed to the user.
pub trait DownloadTarget {
    /// Store `bytes` under a name derived from `suggested_name`, returning the
    /// location actually used. Existing files are never overwritten.
    fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_percent() {
        let progress = RemovalProgress {
            stage: "fetch:model".into(),
            current: 25,
            total: 50,
        };
        assert_eq!(progress.percent(), 50);
    }

    #[test]
    fn progress_with_unknown_total() {
        let progress = RemovalProgress {
            stage: "compute".into(),
            current: 3,
            total: 0,
        };
        assert_eq!(progress.percent(), 0);
    }

    #[test]
    fn progress_with_large_byte_counts() {
        let done = RemovalProgress {
            stage: "fetch:model".into(),
            current: u64::MAX / 10,
            total: u64::MAX / 10,
        };
        assert_eq!(done.percent(), 100);

        let half = RemovalProgress {
            stage: "fetch:model".into(),
            current: u64::MAX / 2,
            total: u64::MAX,
        };
        assert_eq!(half.percent(), 49);
    }
}
