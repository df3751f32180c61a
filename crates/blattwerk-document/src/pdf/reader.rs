// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open and inspect existing PDF documents using the `lopdf` crate,
// and pull page segments out of them.

use std::path::Path;

use blattwerk_core::Segment;
use blattwerk_core::error::BlattwerkError;
use lopdf::Document;
use tracing::{debug, info, instrument};

use super::copier::PageCopier;

/// Reads existing PDF files.
///
/// Wraps `lopdf::Document`; the splitter and merger read pages through it.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BlattwerkError> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            BlattwerkError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, BlattwerkError> {
        let document = Document::load_mem(data).map_err(|err| {
            BlattwerkError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Return the source path if the reader was created via [`PdfReader::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    /// Borrow the underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    // -- Extraction -----------------------------------------------------------

    /// Copy the pages of `segment` (zero-based, half-open) into a new
    /// standalone document.
    #[instrument(skip(self), fields(segment = %segment))]
    pub fn extract_segment(&self, segment: Segment) -> Result<Document, BlattwerkError> {
        let total = self.page_count();
        if segment.is_empty() || segment.end > total {
            return Err(BlattwerkError::PdfError(format!(
                "segment {} invalid for {} page document",
                segment, total
            )));
        }

        let mut copier = PageCopier::new(&self.document.version);
        let copied = copier.copy_pages(&self.document, segment.page_numbers())?;
        debug!(copied, "Segment extracted");
        Ok(copier.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::{page_text, sample_pdf};
    use crate::pdf::save_to_bytes;

    #[test]
    fn counts_pages() {
        let reader = PdfReader::from_bytes(&sample_pdf(7)).unwrap();
        assert_eq!(reader.page_count(), 7);
        assert!(reader.source_path().is_none());
    }

    #[test]
    fn opens_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("five.pdf");
        std::fs::write(&path, sample_pdf(5)).unwrap();

        let reader = PdfReader::open(&path).unwrap();
        assert_eq!(reader.page_count(), 5);
        assert!(reader.source_path().unwrap().ends_with("five.pdf"));
        assert_eq!(reader.document().get_pages().len(), 5);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            PdfReader::from_bytes(b"not a pdf at all"),
            Err(BlattwerkError::PdfError(_))
        ));
    }

    #[test]
    fn extracts_requested_pages_in_order() {
        let reader = PdfReader::from_bytes(&sample_pdf(6)).unwrap();
        let mut doc = reader.extract_segment(Segment::new(2, 5)).unwrap();
        let reloaded = Document::load_mem(&save_to_bytes(&mut doc).unwrap()).unwrap();

        assert_eq!(reloaded.get_pages().len(), 3);
        assert!(page_text(&reloaded, 1).contains("Page 3"));
        assert!(page_text(&reloaded, 3).contains("Page 5"));
    }

    #[test]
    fn rejects_out_of_range_segment() {
        let reader = PdfReader::from_bytes(&sample_pdf(3)).unwrap();
        assert!(reader.extract_segment(Segment::new(1, 4)).is_err());
        assert!(reader.extract_segment(Segment::new(2, 2)).is_err());
    }
}
