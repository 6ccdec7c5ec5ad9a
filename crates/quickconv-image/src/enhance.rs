// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Enhancement providers. The photo enhancer runs the local filter pipeline;
// background removal is delegated to an external AI service.

use image::ImageFormat;
use quickconv_bridge::{BackgroundRemovalService, RemovalProgress};
use quickconv_core::error::{QuickconvError, Result};
use quickconv_core::human_errors::describe_background_removal_failure;
use quickconv_core::types::MimeType;
use tracing::{info, instrument, warn};

use crate::artifact::EncodedArtifact;
use crate::image::{FilterSettings, ImageAsset, RasterPipeline, TransformSpec, encode};

/// Something that turns one image into an improved one.
pub trait EnhancementProvider {
    /// Short name for logs and the UI.
    fn name(&self) -> &str;

    /// Produce the enhanced image. `progress` may be called any number of
    /// times; providers without progress never call it.
    fn enhance(
        &self,
        asset: &ImageAsset,
        progress: &mut dyn FnMut(RemovalProgress),
    ) -> Result<EncodedArtifact>;
}

/// Brightness / contrast / saturation sliders applied locally.
#[derive(Debug, Clone)]
pub struct LocalFilterProvider {
    pipeline: RasterPipeline,
    settings: FilterSettings,
    target: Option<MimeType>,
    quality: f32,
}

impl LocalFilterProvider {
    /// Output keeps the source type when it can be written, otherwise JPEG.
    pub fn new(settings: FilterSettings, quality: f32) -> Self {
        Self {
            pipeline: RasterPipeline::default(),
            settings,
            target: None,
            quality,
        }
    }

    pub fn with_target(mut self, target: MimeType) -> Self {
        self.target = Some(target);
        self
    }

    pub fn settings(&self) -> FilterSettings {
        self.settings
    }
}

impl EnhancementProvider for LocalFilterProvider {
    fn name(&self) -> &str {
        "filters"
    }

    #[instrument(skip_all, fields(filter = %self.settings.to_css()))]
    fn enhance(
        &self,
        asset: &ImageAsset,
        _progress: &mut dyn FnMut(RemovalProgress),
    ) -> Result<EncodedArtifact> {
        let mime = self
            .target
            .unwrap_or_else(|| RasterPipeline::default_target(asset));
        self.pipeline.process(
            asset,
            &[
                TransformSpec::FilterAdjust(self.settings),
                TransformSpec::EncodeQuality {
                    mime,
                    quality: self.quality,
                },
            ],
        )
    }
}

/// AI background removal through a [`BackgroundRemovalService`].
pub struct RemoteAiProvider {
    service: Box<dyn BackgroundRemovalService + Send + Sync>,
    api_key: Option<String>,
}

impl RemoteAiProvider {
    pub fn new(
        service: Box<dyn BackgroundRemovalService + Send + Sync>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            service,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl EnhancementProvider for RemoteAiProvider {
    fn name(&self) -> &str {
        "background-removal"
    }

    /// The source is sent as PNG and the service's PNG answer is checked
    /// before it is returned.
    #[instrument(skip_all, fields(width = asset.width(), height = asset.height()))]
    fn enhance(
        &self,
        asset: &ImageAsset,
        progress: &mut dyn FnMut(RemovalProgress),
    ) -> Result<EncodedArtifact> {
        let api_key = self.api_key.as_deref().ok_or(QuickconvError::MissingApiKey)?;
        let upload = encode(asset.pixels(), MimeType::Png, 1.0)?;

        let bytes = self
            .service
            .remove_background(&upload, api_key, progress)
            .map_err(|err| {
                let detail = match err {
                    QuickconvError::PlatformUnavailable | QuickconvError::MissingApiKey => {
                        return err;
                    }
                    QuickconvError::BackgroundRemovalFailed(detail) => detail,
                    other => other.to_string(),
                };
                let cause = describe_background_removal_failure(&detail);
                warn!(%detail, %cause, "background removal failed");
                QuickconvError::BackgroundRemovalFailed(cause)
            })?;

        let result = image::load_from_memory_with_format(&bytes, ImageFormat::Png).map_err(|err| {
            QuickconvError::BackgroundRemovalFailed(describe_background_removal_failure(&format!(
                "service did not return a valid PNG: {err}"
            )))
        })?;

        info!(len = bytes.len(), "background removed");
        Ok(EncodedArtifact::raster(
            bytes,
            MimeType::Png,
            result.width(),
            result.height(),
        ))
    }
}
