// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// quickconv-text — the text-only tools: colour conversion (HEX/RGB/HSL),
// case conversion, and message digests.

pub mod case;
pub mod color;
pub mod hash;

pub use case::{CaseMode, convert};
pub use color::{ColorValue, Hsl, Rgb};
pub use hash::{HashAlgorithm, digest, digest_text};
