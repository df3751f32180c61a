// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF splitter — plans split points for a document and extracts each segment
// into its own PDF, optionally stamping header/footer images on every page.

use blattwerk_core::error::BlattwerkError;
use blattwerk_core::{Segment, SplitMode, SplitPlan, planner};
use tracing::{debug, info, instrument};

use super::overlay::HeaderFooter;
use super::reader::PdfReader;
use super::save_to_bytes;

/// What to split and how.
#[derive(Debug, Clone)]
pub struct SplitRequest {
    pub mode: SplitMode,
    /// Raw user input for the mode: a page number, a chunk size, or a range list.
    pub specification: String,
    /// Header/footer stamped on every output page, if any.
    pub overlay: Option<HeaderFooter>,
}

impl SplitRequest {
    pub fn new(mode: SplitMode, specification: impl Into<String>) -> Self {
        Self {
            mode,
            specification: specification.into(),
            overlay: None,
        }
    }

    pub fn with_overlay(mut self, overlay: HeaderFooter) -> Self {
        self.overlay = Some(overlay);
        self
    }
}

/// One output of a split.
#[derive(Debug, Clone)]
pub struct SplitDocument {
    /// 1-based position in the output sequence.
    pub index: usize,
    pub segment: Segment,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SplitOutcome {
    pub plan: SplitPlan,
    pub documents: Vec<SplitDocument>,
}

/// Stateless splitter.
pub struct PdfSplitter;

impl PdfSplitter {
    #[instrument(skip_all, fields(mode = %request.mode, spec = %request.specification))]
    pub fn split(
        reader: &PdfReader,
        request: &SplitRequest,
    ) -> Result<SplitOutcome, BlattwerkError> {
        let page_count = reader.page_count();
        if page_count == 0 {
            return Err(BlattwerkError::PdfError("document has no pages".to_string()));
        }

        let plan = planner::plan(page_count, request.mode, &request.specification);
        info!(
            page_count,
            boundaries = ?plan.boundaries.as_slice(),
            segments = plan.segments.len(),
            "Split planned"
        );

        let overlay = request.overlay.as_ref().filter(|overlay| !overlay.is_empty());

        let mut documents = Vec::with_capacity(plan.segments.len());
        for (position, segment) in plan.segments.iter().enumerate() {
            let index = position + 1;
            let mut document = reader.extract_segment(*segment)?;
            if let Some(overlay) = overlay {
                overlay.apply(&mut document)?;
            }
            let bytes = save_to_bytes(&mut document)?;
            debug!(index, %segment, size = bytes.len(), "Segment written");

            documents.push(SplitDocument {
                index,
                segment: *segment,
                file_name: output_file_name(index),
                bytes,
            });
        }

        info!(outputs = documents.len(), "Split complete");
        Ok(SplitOutcome { plan, documents })
    }
}

/// File name of the `index`-th (1-based) split output.
pub fn output_file_name(index: usize) -> String {
    format!("split_document_{index}.pdf")
}
