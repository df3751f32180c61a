// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Blattwerk.

use thiserror::Error;

/// Top-level error type for all Blattwerk operations.
///
/// The split-point planner never produces one of these: malformed split
/// specifications are recovered inside the planner.
#[derive(Debug, Error)]
pub enum BlattwerkError {
    // -- Intake errors --
    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("file is {size} bytes, limit is {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("invalid option: {0}")]
    InvalidOption(String),

    // -- Document errors --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("merge needs at least {required} documents, got {provided}")]
    NotEnoughInputs { required: usize, provided: usize },

    #[error("no valid PDF pages could be merged")]
    NothingToMerge,

    // -- Integrity --
    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlattwerkError>;
