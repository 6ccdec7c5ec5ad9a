// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Filesystem download target: writes artifacts into a directory, picking a
// fresh name instead of overwriting.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use quickconv_core::error::{QuickconvError, Result};
use tracing::{debug, info, instrument, warn};

use crate::traits::DownloadTarget;

/// Give up looking for a free name after this many attempts.
const MAX_NAME_ATTEMPTS: u32 = 10_000;

/// Saves downloads into a fixed directory.
#[derive(Debug, Clone)]
pub struct FsDownloadTarget {
    dir: PathBuf,
}

impl FsDownloadTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Reduce a suggested name to a bare file name, dropping any directories.
fn sanitize_name(suggested: &str) -> String {
    let base = suggested
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() || base == "." || base == ".." {
        "download".to_owned()
    } else {
        base.to_owned()
    }
}

/// `name (n).ext` for the n-th collision.
fn numbered_name(name: &str, n: u32) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem} ({n}).{ext}"),
        _ => format!("{name} ({n})"),
    }
}

/// Write `bytes` into the freshly created `path`, removing it again if the
/// write fails so no truncated file is left behind.
fn write_or_remove(mut file: impl Write, path: &Path, bytes: &[u8]) -> Result<()> {
    if let Err(err) = file.write_all(bytes).and_then(|()| file.flush()) {
        if let Err(cleanup) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %cleanup, "could not remove partial download");
        }
        return Err(err.into());
    }
    Ok(())
}

impl DownloadTarget for FsDownloadTarget {
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<String> {
        std::fs::create_dir_all(&self.dir)?;
        let name = sanitize_name(suggested_name);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = if attempt == 0 {
                name.clone()
            } else {
                numbered_name(&name, attempt)
            };
            let path = self.dir.join(&candidate);
            // create_new makes the existence check and the create one step.
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    write_or_remove(file, &path, bytes)?;
                    info!(path = %path.display(), "download saved");
                    return Ok(path.display().to_string());
                }
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
                    debug!(candidate, "name taken, trying next");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(QuickconvError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("no free file name for {name}"),
        )))
    }
}
