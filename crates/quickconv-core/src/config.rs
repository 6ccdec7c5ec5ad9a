// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;

/// Environment variable carrying the background-removal service key.
pub const BG_REMOVAL_KEY_ENV: &str = "QUICKCONV_BG_REMOVAL_API_KEY";

/// Name of the settings file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Page size for images-to-PDF.
    pub default_page_size: crate::PageSize,
    /// Page margin in millimetres for images-to-PDF.
    pub page_margin_mm: f32,
    /// Longest edge after compression; smaller images keep their size.
    pub compression_max_edge: u32,
    /// Quality fraction used when a tool does not ask the user.
    pub default_quality: f32,
    /// Scale factor for SVG rasterisation.
    pub default_svg_scale: f32,
    /// Largest file accepted by intake, in megabytes.
    pub max_upload_mb: u64,
    /// Largest number of images accepted by images-to-PDF.
    pub max_pdf_items: usize,
    /// Background-removal service key. Injected from the environment, never
    /// written back to disk.
    #[serde(skip_serializing)]
    pub bg_removal_api_key: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_page_size: crate::PageSize::A4,
            page_margin_mm: 10.0,
            compression_max_edge: 1920,
            default_quality: 0.92,
            default_svg_scale: 1.0,
            max_upload_mb: 50,
            max_pdf_items: 50,
            bg_removal_api_key: None,
        }
    }
}

impl AppConfig {
    /// Load `config.json` from `dir` (defaults if missing), then apply
    /// environment overrides.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        let config = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let parsed: Self = serde_json::from_str(&raw)?;
            info!(path = %path.display(), "loaded configuration");
            parsed
        } else {
            debug!(path = %path.display(), "no configuration file, using defaults");
            Self::default()
        };
        Ok(config.with_env_overrides())
    }

    /// Persist settings to `config.json` in `dir`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(CONFIG_FILE_NAME), json)?;
        Ok(())
    }

    /// Pick up secrets from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_api_key_from(std::env::var(BG_REMOVAL_KEY_ENV).ok())
    }

    fn with_api_key_from(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.map(|k| k.trim().to_owned()).filter(|k| !k.is_empty()) {
            self.bg_removal_api_key = Some(key);
        }
        self
    }
}
