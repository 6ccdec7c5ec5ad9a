// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — building image PDFs and turning PDF pages back into images.

pub mod assembler;
pub mod pages;

pub use assembler::{AssembledDocument, DocumentAssembler, PagedDocument, PageItem, SkippedItem};
pub use pages::{page_count, render_all_pages};
