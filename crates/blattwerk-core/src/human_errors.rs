// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the alert line shown after each tool runs.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::BlattwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Disk hiccup or similar — trying again may work.
    Transient,
    /// User must do something (pick another file, change an option).
    ActionRequired,
    /// Cannot be fixed by retrying — damaged file, wrong format.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown first).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether running the same command again might succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `BlattwerkError` into a `HumanError`.
pub fn humanize_error(err: &BlattwerkError) -> HumanError {
    match err {
        BlattwerkError::UnsupportedDocument(detail) => {
            let lower = detail.to_ascii_lowercase();
            if lower.contains("word document") {
                HumanError {
                    message: "Word documents are not supported.".into(),
                    suggestion: format!("Save or export the document as PDF first. ({detail})"),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if lower.contains("expected a pdf") {
                HumanError {
                    message: "Please upload a valid PDF file.".into(),
                    suggestion: format!("The file doesn't look like a PDF. ({detail})"),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if lower.contains("expected an image") {
                HumanError {
                    message: "Please upload a valid image file (JPEG, PNG, etc.).".into(),
                    suggestion: format!("The file doesn't look like an image. ({detail})"),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "Invalid file format.".into(),
                    suggestion: format!("Pick a PDF or an image file instead. ({detail})"),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            }
        }

        BlattwerkError::FileTooLarge { limit, .. } => HumanError {
            message: format!("File size exceeds the limit of {} MB.", limit / (1024 * 1024)),
            suggestion: "Try a smaller file, or raise max_upload_bytes in the config file.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BlattwerkError::InvalidOption(detail) => HumanError {
            message: "One of the options isn't valid.".into(),
            suggestion: format!("Check the command line and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BlattwerkError::PdfError(_) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged or encrypted. Try opening it in a PDF viewer first to check it works.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        BlattwerkError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        BlattwerkError::NotEnoughInputs { required, .. } => HumanError {
            message: format!("Please select at least {required} PDF files to merge."),
            suggestion: "Add more PDF files to the command.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BlattwerkError::NothingToMerge => HumanError {
            message: "No valid PDFs could be merged.".into(),
            suggestion: "Every file was skipped as invalid or encrypted. Check the files open in a PDF viewer.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        BlattwerkError::IntegrityMismatch { .. } => HumanError {
            message: "An output file did not match what was written.".into(),
            suggestion: "Check the disk has free space, then run the tool again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        BlattwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission denied while reading or writing a file.".into(),
                    suggestion: "Check the file permissions, or choose a different output directory.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        BlattwerkError::Serialization(_) => HumanError {
            message: "The tool had an internal data problem.".into(),
            suggestion: "Check the config file is valid JSON, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
