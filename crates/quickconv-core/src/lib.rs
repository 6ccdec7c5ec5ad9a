// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quick Converter — core types, geometry, configuration, and error
// definitions shared across all crates.

pub mod config;
pub mod error;
pub mod geometry;
pub mod human_errors;
pub mod intake;
pub mod preset;
pub mod types;

pub use config::AppConfig;
pub use error::QuickconvError;
pub use preset::SizePreset;
pub use types::*;
