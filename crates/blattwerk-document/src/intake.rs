// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intake validation — checks uploaded files before any processing starts.

use blattwerk_core::ToolkitConfig;
use blattwerk_core::config::DEFAULT_MAX_UPLOAD_BYTES;
use blattwerk_core::error::BlattwerkError;
use blattwerk_core::types::DocumentKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Size limits applied to incoming files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeLimits {
    pub max_upload_bytes: u64,
}

impl Default for IntakeLimits {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl From<&ToolkitConfig> for IntakeLimits {
    fn from(config: &ToolkitConfig) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Accept `data` only if it is a PDF within the size limit.
pub fn validate_pdf(name: &str, data: &[u8], limits: &IntakeLimits) -> Result<(), BlattwerkError> {
    let kind = DocumentKind::detect(name, data);
    if kind != DocumentKind::Pdf {
        return Err(rejected(name, kind, "a PDF"));
    }
    validate_size(name, data, limits)
}

/// Accept `data` only if it is a recognised raster image within the size limit.
pub fn validate_image(
    name: &str,
    data: &[u8],
    limits: &IntakeLimits,
) -> Result<DocumentKind, BlattwerkError> {
    let kind = DocumentKind::detect(name, data);
    if !kind.is_image() {
        return Err(rejected(name, kind, "an image"));
    }
    validate_size(name, data, limits)?;
    Ok(kind)
}

/// Header/footer files may be either an image or a PDF.
pub fn validate_overlay(name: &str, data: &[u8]) -> Result<DocumentKind, BlattwerkError> {
    let kind = DocumentKind::detect(name, data);
    if kind.is_image() || kind == DocumentKind::Pdf {
        debug!(name, kind = ?kind, "Overlay accepted");
        Ok(kind)
    } else {
        Err(rejected(name, kind, "an image or PDF header/footer"))
    }
}

fn rejected(name: &str, kind: DocumentKind, expected: &str) -> BlattwerkError {
    let detail = if kind == DocumentKind::Word {
        format!("{name}: Word documents are not supported, expected {expected}")
    } else {
        format!("{name}: expected {expected}, got {}", kind.mime_type())
    };
    BlattwerkError::UnsupportedDocument(detail)
}

/// Accept any file within the size limit.
pub fn validate_size(name: &str, data: &[u8], limits: &IntakeLimits) -> Result<(), BlattwerkError> {
    let size = data.len() as u64;
    if size > limits.max_upload_bytes {
        return Err(BlattwerkError::FileTooLarge {
            size,
            limit: limits.max_upload_bytes,
        });
    }
    debug!(name, size, "Intake check passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::{sample_pdf, sample_png};
    use blattwerk_core::human_errors::humanize_error;

    #[test]
    fn accepts_pdf_and_rejects_image_as_pdf() {
        let limits = IntakeLimits::default();
        assert!(validate_pdf("a.pdf", &sample_pdf(1), &limits).is_ok());

        let err = validate_pdf("a.png", &sample_png(4, 4), &limits).unwrap_err();
        assert!(matches!(err, BlattwerkError::UnsupportedDocument(_)));
        assert_eq!(humanize_error(&err).message, "Please upload a valid PDF file.");
    }

    #[test]
    fn image_intake_reports_kind() {
        let limits = IntakeLimits::default();
        assert_eq!(
            validate_image("a.png", &sample_png(4, 4), &limits).unwrap(),
            DocumentKind::Png
        );

        let err = validate_image("a.pdf", &sample_pdf(1), &limits).unwrap_err();
        assert_eq!(
            humanize_error(&err).message,
            "Please upload a valid image file (JPEG, PNG, etc.)."
        );
    }

    #[test]
    fn word_documents_are_named_in_the_rejection() {
        let limits = IntakeLimits::default();
        let err = validate_pdf("minutes.docx", b"PK\x03\x04word/", &limits).unwrap_err();
        assert_eq!(humanize_error(&err).message, "Word documents are not supported.");

        let err = validate_image("old.doc", &[0xD0, 0xCF, 0x11, 0xE0, 0, 0], &limits).unwrap_err();
        assert!(err.to_string().contains("Word documents"));
    }

    #[test]
    fn oversized_files_are_rejected() {
        let limits = IntakeLimits {
            max_upload_bytes: 16,
        };
        assert!(matches!(
            validate_pdf("big.pdf", &sample_pdf(1), &limits),
            Err(BlattwerkError::FileTooLarge { limit: 16, .. })
        ));
    }

    #[test]
    fn overlays_accept_images_and_pdfs_only() {
        assert_eq!(
            validate_overlay("h.pdf", &sample_pdf(1)).unwrap(),
            DocumentKind::Pdf
        );
        assert!(validate_overlay("h.png", &sample_png(2, 2)).is_ok());
        assert!(validate_overlay("h.txt", b"hello").is_err());
    }

    #[test]
    fn limits_follow_config() {
        let config = ToolkitConfig {
            max_upload_bytes: 1234,
            ..ToolkitConfig::default()
        };
        assert_eq!(IntakeLimits::from(&config).max_upload_bytes, 1234);
    }
}
