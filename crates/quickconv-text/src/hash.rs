// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Message digests for the hash generator: SHA-1, SHA-256 and SHA-512 as
// lowercase hex.

use std::fmt;
use std::str::FromStr;

use quickconv_core::error::{QuickconvError, Result};
use sha2::{Digest, Sha256, Sha512};
use tracing::{debug, instrument};

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HashAlgorithm {
    Sha1,
    #[default]
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 3] = [Self::Sha1, Self::Sha256, Self::Sha512];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "SHA-1",
            Self::Sha256 => "SHA-256",
            Self::Sha512 => "SHA-512",
        }
    }

    /// Length of the hex digest in characters.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Sha1 => 40,
            Self::Sha256 => 64,
            Self::Sha512 => 128,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = QuickconvError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            _ => Err(QuickconvError::UnsupportedAlgorithm(s.to_owned())),
        }
    }
}

/// Hash `data` with `algorithm` and return the digest as lowercase hex.
#[instrument(skip(data), fields(len = data.len()))]
pub fn digest(data: &[u8], algorithm: HashAlgorithm) -> String {
    let hex = match algorithm {
        // ring only ships SHA-1 for legacy interop, which is all this is.
        HashAlgorithm::Sha1 => {
            hex::encode(ring::digest::digest(&ring::digest::SHA1_FOR_LEGACY_USE_ONLY, data))
        }
        HashAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
        HashAlgorithm::Sha512 => hex::encode(Sha512::digest(data)),
    };
    debug!(%algorithm, "digest computed");
    hex
}

/// Hash the UTF-8 bytes of `text`.
pub fn digest_text(text: &str, algorithm: HashAlgorithm) -> String {
    digest(text.as_bytes(), algorithm)
}
