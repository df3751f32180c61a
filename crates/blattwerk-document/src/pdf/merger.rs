// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF merger — concatenates the pages of several PDFs into one document.

use blattwerk_core::error::BlattwerkError;
use lopdf::Document;
use tracing::{debug, info, instrument, warn};

use super::copier::PageCopier;
use super::save_to_bytes;

/// File name used for merge output.
pub const MERGED_FILE_NAME: &str = "merged.pdf";

/// Minimum number of inputs a merge accepts.
const MIN_INPUTS: usize = 2;

/// PDF version written when no input declares one.
const FALLBACK_VERSION: &str = "1.7";

#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Names of the inputs that contributed pages, in order.
    pub merged: Vec<String>,
    /// Names of the inputs that could not be read.
    pub skipped: Vec<String>,
}

/// Stateless merger.
pub struct PdfMerger;

impl PdfMerger {
    /// Merge `(name, bytes)` inputs in order. Unreadable inputs are skipped.
    #[instrument(skip_all, fields(inputs = inputs.len()))]
    pub fn merge<N: AsRef<str>, B: AsRef<[u8]>>(
        inputs: &[(N, B)],
    ) -> Result<MergeOutcome, BlattwerkError> {
        if inputs.len() < MIN_INPUTS {
            return Err(BlattwerkError::NotEnoughInputs {
                required: MIN_INPUTS,
                provided: inputs.len(),
            });
        }

        let mut loaded = Vec::with_capacity(inputs.len());
        let mut skipped = Vec::new();
        for (name, bytes) in inputs {
            let name = name.as_ref();
            match Document::load_mem(bytes.as_ref()) {
                Ok(document) => loaded.push((name.to_string(), document)),
                Err(err) => {
                    warn!(name, %err, "Skipping unreadable PDF");
                    skipped.push(name.to_string());
                }
            }
        }

        let version = loaded
            .iter()
            .map(|(_, document)| document.version.as_str())
            .max()
            .unwrap_or(FALLBACK_VERSION)
            .to_string();
        let mut copier = PageCopier::new(&version);
        let mut merged = Vec::new();

        for (name, document) in &loaded {
            let page_numbers: Vec<u32> = document.get_pages().keys().copied().collect();
            if page_numbers.is_empty() {
                warn!(name = name.as_str(), "PDF has no pages");
                skipped.push(name.clone());
                continue;
            }
            let copied = copier.copy_pages(document, page_numbers)?;
            debug!(name = name.as_str(), copied, "Input merged");
            merged.push(name.clone());
        }

        let page_count = copier.page_count();
        if page_count == 0 {
            return Err(BlattwerkError::NothingToMerge);
        }

        let mut document = copier.finish();
        let bytes = save_to_bytes(&mut document)?;
        info!(
            page_count,
            merged = merged.len(),
            skipped = skipped.len(),
            size = bytes.len(),
            "Merge complete"
        );

        Ok(MergeOutcome {
            bytes,
            page_count,
            merged,
            skipped,
        })
    }
}
