// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — loads configuration and hands out the backend
// components each tool needs.
//
// All fields are cheaply cloneable (Arc-wrapped or small) so the struct can
// be moved into blocking jobs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quickconv_bridge::{
    DownloadTarget, FsDownloadTarget, PlatformBridge, background_removal_service, platform_bridge,
};
use quickconv_core::error::Result;
use quickconv_core::intake::IntakePolicy;
use quickconv_core::types::{MimeType, SourceFile};
use quickconv_core::AppConfig;
use quickconv_image::{ArtifactStore, DocumentAssembler, EncodedArtifact, RasterPipeline, RemoteAiProvider};
use tracing::{debug, info};

use super::data_dir;
use crate::session::ToolSession;

#[derive(Clone)]
pub struct AppServices {
    config: Arc<AppConfig>,
    data_dir: PathBuf,
    store: ArtifactStore,
    bridge: Arc<dyn PlatformBridge>,
}

impl AppServices {
    /// Initialise from the data directory. Call once at startup.
    pub fn init() -> Result<Self> {
        Self::with_data_dir(data_dir::data_dir())
    }

    /// Initialise from an explicit directory holding `config.json`.
    pub fn with_data_dir(dir: PathBuf) -> Result<Self> {
        info!(
            path = %dir.display(),
            has_config = data_dir::has_config(&dir),
            "initialising app services"
        );
        let config = AppConfig::load(&dir)?;
        Ok(Self::from_config(config, dir))
    }

    /// Defaults plus environment overrides, for when the settings file is
    /// unreadable.
    pub fn fallback() -> Self {
        Self::from_config(AppConfig::default().with_env_overrides(), std::env::temp_dir())
    }

    pub fn from_config(config: AppConfig, data_dir: PathBuf) -> Self {
        let bridge: Arc<dyn PlatformBridge> = Arc::from(platform_bridge());
        debug!(platform = bridge.platform_name(), "platform bridge attached");
        Self {
            config: Arc::new(config),
            data_dir,
            store: ArtifactStore::new(),
            bridge,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn bridge(&self) -> &dyn PlatformBridge {
        self.bridge.as_ref()
    }

    // -- Tools ---------------------------------------------------------------

    pub fn pipeline(&self) -> RasterPipeline {
        RasterPipeline::from_config(&self.config)
    }

    pub fn assembler(&self) -> DocumentAssembler {
        DocumentAssembler::from_config(&self.config)
    }

    /// Background removal with the configured key.
    pub fn background_remover(&self) -> RemoteAiProvider {
        RemoteAiProvider::new(
            background_removal_service(),
            self.config.bg_removal_api_key.clone(),
        )
    }

    /// A fresh session for `tool`, sharing this app's display store.
    pub fn session(&self, tool: &'static str) -> ToolSession {
        ToolSession::new(tool, self.store.clone())
    }

    // -- Files ---------------------------------------------------------------

    /// Read `path` and pass it through `policy`.
    pub fn intake(&self, path: &Path, policy: &IntakePolicy) -> Result<SourceFile> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        policy.admit(SourceFile::new(name, bytes))
    }

    pub fn raster_policy(&self) -> IntakePolicy {
        IntakePolicy::raster_images(self.config.max_upload_mb)
    }

    pub fn svg_policy(&self) -> IntakePolicy {
        IntakePolicy::svg(self.config.max_upload_mb)
    }

    pub fn pdf_policy(&self) -> IntakePolicy {
        IntakePolicy::new(vec![MimeType::Pdf], self.config.max_upload_mb)
    }

    /// Hand `artifact` to the download target for `dir` under `stem`.
    pub fn save(&self, dir: &Path, stem: &str, artifact: &EncodedArtifact) -> Result<String> {
        let target = FsDownloadTarget::new(dir);
        let location = target.save(&artifact.bytes, &artifact.file_name(stem))?;
        info!(%location, mime = %artifact.mime, "saved");
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = AppServices::with_data_dir(tmp.path().to_path_buf()).unwrap();
        assert_eq!(svc.config().compression_max_edge, 1920);
        assert_eq!(svc.pipeline().compression_max_edge(), 1920);
    }

    #[test]
    fn config_file_is_honoured() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig {
            compression_max_edge: 800,
            ..AppConfig::default()
        };
        config.save(tmp.path()).unwrap();
        let svc = AppServices::with_data_dir(tmp.path().to_path_buf()).unwrap();
        assert_eq!(svc.pipeline().compression_max_edge(), 800);
    }

    #[test]
    fn intake_applies_policy() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = AppServices::from_config(AppConfig::default(), tmp.path().to_path_buf());
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();
        assert!(svc.intake(&path, &svc.raster_policy()).is_err());

        let path = tmp.path().join("pic.png");
        std::fs::write(&path, b"\x89PNG").unwrap();
        let file = svc.intake(&path, &svc.raster_policy()).unwrap();
        assert_eq!(file.name, "pic.png");
        assert_eq!(file.declared_mime, Some(MimeType::Png));
    }

    #[test]
    fn save_never_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let svc = AppServices::from_config(AppConfig::default(), tmp.path().to_path_buf());
        let artifact = EncodedArtifact::new(b"<svg/>".to_vec(), MimeType::Svg);
        let first = svc.save(tmp.path(), "logo", &artifact).unwrap();
        let second = svc.save(tmp.path(), "logo", &artifact).unwrap();
        assert_ne!(first, second);
    }
}
