// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encoded outputs and the display handles that expose them.
//
// A `DisplayUrl` is issued by an `ArtifactStore` and revoked when dropped,
// so a superseded result cannot leak its handle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use quickconv_core::types::MimeType;
use tracing::debug;
use uuid::Uuid;

/// The encoded result of a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedArtifact {
    pub bytes: Vec<u8>,
    pub mime: MimeType,
    /// Pixel size for raster outputs.
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl EncodedArtifact {
    /// A non-raster artifact (SVG text, PDF).
    pub fn new(bytes: Vec<u8>, mime: MimeType) -> Self {
        Self {
            bytes,
            mime,
            width: None,
            height: None,
            created_at: Utc::now(),
        }
    }

    pub fn raster(bytes: Vec<u8>, mime: MimeType, width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::new(bytes, mime)
        }
    }

    /// Always the length of `bytes`.
    pub fn byte_size(&self) -> usize {
        self.bytes.len()
    }

    /// `<stem>.<ext>` for the artifact's type.
    pub fn file_name(&self, stem: &str) -> String {
        format!("{stem}.{}", self.mime.extension())
    }
}

/// `data:<mime>;base64,<payload>`.
pub fn to_data_url(bytes: &[u8], mime: MimeType) -> String {
    format!("data:{};base64,{}", mime.as_str(), STANDARD.encode(bytes))
}

type Registry = HashMap<Uuid, Arc<EncodedArtifact>>;

/// Issues display handles for artifacts and resolves them while they live.
///
/// Cloning the store shares the registry.
#[derive(Debug, Clone, Default)]
pub struct ArtifactStore {
    live: Arc<Mutex<Registry>>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        // The registry holds no invariants a panicking holder could break.
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register `artifact` and hand back its handle.
    pub fn publish(&self, artifact: EncodedArtifact) -> DisplayUrl {
        let id = Uuid::new_v4();
        let artifact = Arc::new(artifact);
        self.registry().insert(id, Arc::clone(&artifact));
        debug!(%id, mime = %artifact.mime, "display url issued");
        DisplayUrl {
            id,
            url: format!("blob:quickconv/{id}"),
            artifact,
            store: self.clone(),
        }
    }

    /// The artifact behind `url`, if its handle is still alive.
    pub fn resolve(&self, url: &str) -> Option<Arc<EncodedArtifact>> {
        let id = url.strip_prefix("blob:quickconv/")?.parse::<Uuid>().ok()?;
        self.registry().get(&id).cloned()
    }

    /// Number of handles not yet revoked.
    pub fn live_count(&self) -> usize {
        self.registry().len()
    }

    fn revoke(&self, id: &Uuid) {
        if self.registry().remove(id).is_some() {
            debug!(%id, "display url revoked");
        }
    }
}

/// Owned handle to a published artifact. Dropping it revokes the URL.
#[derive(Debug)]
pub struct DisplayUrl {
    id: Uuid,
    url: String,
    artifact: Arc<EncodedArtifact>,
    store: ArtifactStore,
}

impl DisplayUrl {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn artifact(&self) -> &EncodedArtifact {
        &self.artifact
    }
}

impl Drop for DisplayUrl {
    fn drop(&mut self) {
        self.store.revoke(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_size_matches_bytes() {
        let artifact = EncodedArtifact::raster(vec![1, 2, 3], MimeType::Png, 1, 1);
        assert_eq!(artifact.byte_size(), 3);
        assert_eq!(artifact.file_name("photo"), "photo.png");
    }

    #[test]
    fn data_url_format() {
        assert_eq!(to_data_url(b"hi", MimeType::Png), "data:image/png;base64,aGk=");
    }

    #[test]
    fn handle_resolves_until_dropped() {
        let store = ArtifactStore::new();
        let handle = store.publish(EncodedArtifact::new(b"<svg/>".to_vec(), MimeType::Svg));
        let url = handle.url().to_owned();

        assert_eq!(store.live_count(), 1);
        assert_eq!(store.resolve(&url).unwrap().bytes, b"<svg/>");

        drop(handle);
        assert_eq!(store.live_count(), 0);
        assert!(store.resolve(&url).is_none());
    }

    #[test]
    fn replacing_a_handle_revokes_the_old_one() {
        let store = ArtifactStore::new();
        let mut current = Some(store.publish(EncodedArtifact::new(vec![1], MimeType::Png)));
        let first_url = current.as_ref().unwrap().url().to_owned();

        current = Some(store.publish(EncodedArtifact::new(vec![2], MimeType::Png)));

        assert_eq!(store.live_count(), 1);
        assert!(store.resolve(&first_url).is_none());
        assert_eq!(current.unwrap().artifact().bytes, vec![2]);
    }

    #[test]
    fn unknown_urls_do_not_resolve() {
        let store = ArtifactStore::new();
        assert!(store.resolve("blob:elsewhere/123").is_none());
        assert!(store.resolve("blob:quickconv/not-a-uuid").is_none());
    }
}
