// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// blattwerk-document — Document processing for the Blattwerk tools.
//
// Provides PDF operations (read, split by plan, merge, header/footer stamping),
// image processing (resize, re-encode, compress to a target size), intake
// validation, and output fingerprints.

pub mod image;
pub mod intake;
pub mod integrity;
pub mod pdf;

// Re-export the primary structs so callers can use `blattwerk_document::PdfReader` etc.
pub use self::image::compressor::{CompressedImage, CompressionOptions, ImageCompressor};
pub use self::image::processor::ImageProcessor;
pub use intake::IntakeLimits;
pub use pdf::merger::{MERGED_FILE_NAME, MergeOutcome, PdfMerger};
pub use pdf::overlay::{HeaderFooter, OverlayImage};
pub use pdf::reader::PdfReader;
pub use pdf::splitter::{PdfSplitter, SplitDocument, SplitOutcome, SplitRequest};
