// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — reading, page copying, splitting, merging, and header/footer
// stamping.

pub mod copier;
pub mod merger;
pub mod overlay;
pub mod reader;
pub mod splitter;

pub use copier::PageCopier;
pub use merger::PdfMerger;
pub use overlay::HeaderFooter;
pub use reader::PdfReader;
pub use splitter::PdfSplitter;

use blattwerk_core::error::BlattwerkError;
use lopdf::Document;

/// Serialise a document to bytes.
pub(crate) fn save_to_bytes(document: &mut Document) -> Result<Vec<u8>, BlattwerkError> {
    let mut output = Vec::new();
    document
        .save_to(&mut output)
        .map_err(|err| BlattwerkError::PdfError(format!("failed to serialise PDF: {}", err)))?;
    Ok(output)
}
