// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Blattwerk document tools.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BlattwerkError;

/// Strategy used to derive split boundaries from the user's input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitMode {
    /// Split once, after a specific page.
    #[default]
    #[serde(rename = "single")]
    AfterPage,
    /// Split every N pages.
    #[serde(rename = "multiple")]
    EveryN,
    /// Split at an explicit list of pages and page ranges, e.g. `1-3,5,7-9`.
    #[serde(rename = "range")]
    Ranges,
}

impl SplitMode {
    /// Keyword used by the mode selector (`single`, `multiple`, `range`).
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::AfterPage => "single",
            Self::EveryN => "multiple",
            Self::Ranges => "range",
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for SplitMode {
    type Err = BlattwerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "after-page" | "after" => Ok(Self::AfterPage),
            "multiple" | "every-n" | "every" => Ok(Self::EveryN),
            "range" | "ranges" => Ok(Self::Ranges),
            other => Err(BlattwerkError::InvalidOption(format!(
                "unknown split mode '{other}' (expected single, multiple or range)"
            ))),
        }
    }
}

/// Half-open, zero-based page range `[start, end)` making up one output
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub start: u32,
    pub end: u32,
}

impl Segment {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Number of pages in the segment.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Zero-based page indices `start..end`.
    pub fn page_indices(&self) -> std::ops::Range<u32> {
        self.start..self.end
    }

    /// One-based page numbers, as keyed by lopdf's page tree.
    pub fn page_numbers(&self) -> std::ops::RangeInclusive<u32> {
        (self.start + 1)..=self.end
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Ordered cut points, each strictly between 0 and the page count.
///
/// Sorted ascending with no duplicates. Only the planner and
/// [`Boundaries::from_points`] can build one, so the invariant always holds.
/// Deserialised lists are checked; the upper bound is checked by [`SplitPlan`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<u32>", try_from = "Vec<u32>")]
pub struct Boundaries(Vec<u32>);

impl Boundaries {
    /// Build a boundary list from arbitrary points, dropping anything that is
    /// not strictly inside `(0, page_count)` and removing duplicates.
    pub fn from_points(page_count: u32, points: impl IntoIterator<Item = u32>) -> Self {
        let mut cuts: Vec<u32> = points
            .into_iter()
            .filter(|&p| p > 0 && p < page_count)
            .collect();
        cuts.sort_unstable();
        cuts.dedup();
        Self(cuts)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

}

impl AsRef<[u32]> for Boundaries {
    fn as_ref(&self) -> &[u32] {
        &self.0
    }
}

impl From<Boundaries> for Vec<u32> {
    fn from(boundaries: Boundaries) -> Self {
        boundaries.0
    }
}

impl TryFrom<Vec<u32>> for Boundaries {
    type Error = BlattwerkError;

    fn try_from(cuts: Vec<u32>) -> Result<Self, Self::Error> {
        if cuts.first() == Some(&0) || cuts.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(BlattwerkError::InvalidOption(format!(
                "boundaries {cuts:?} must be strictly increasing and above 0"
            )));
        }
        Ok(Self(cuts))
    }
}

/// The complete result of one planning call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SplitPlanFields")]
pub struct SplitPlan {
    pub page_count: u32,
    pub mode: SplitMode,
    pub boundaries: Boundaries,
    pub segments: Vec<Segment>,
}

/// Unchecked wire form of [`SplitPlan`].
#[derive(Deserialize)]
struct SplitPlanFields {
    page_count: u32,
    mode: SplitMode,
    boundaries: Boundaries,
    segments: Vec<Segment>,
}

impl TryFrom<SplitPlanFields> for SplitPlan {
    type Error = BlattwerkError;

    fn try_from(fields: SplitPlanFields) -> Result<Self, Self::Error> {
        if fields.boundaries.as_slice().last().is_some_and(|&last| last >= fields.page_count) {
            return Err(BlattwerkError::InvalidOption(format!(
                "boundary past the end of a {} page plan",
                fields.page_count
            )));
        }
        let expected = crate::planner::derive_segments(fields.page_count, fields.boundaries.as_slice());
        if expected != fields.segments {
            return Err(BlattwerkError::InvalidOption(
                "plan segments do not match its boundaries".to_string(),
            ));
        }
        Ok(Self {
            page_count: fields.page_count,
            mode: fields.mode,
            boundaries: fields.boundaries,
            segments: fields.segments,
        })
    }
}

/// Kinds of file the tools recognise at intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Jpeg,
    Png,
    Webp,
    Gif,
    Bmp,
    Tiff,
    /// Word documents are recognised so they can be rejected with a clear message.
    Word,
    Unknown,
}

impl DocumentKind {
    /// MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
            Self::Word => "application/msword",
            Self::Unknown => "application/octet-stream",
        }
    }

    /// Infer the kind from a file extension.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "jpg" | "jpeg" => Self::Jpeg,
            "png" => Self::Png,
            "webp" => Self::Webp,
            "gif" => Self::Gif,
            "bmp" => Self::Bmp,
            "tif" | "tiff" => Self::Tiff,
            "doc" | "docx" => Self::Word,
            _ => Self::Unknown,
        }
    }

    /// Identify the kind from leading magic bytes.
    pub fn sniff(data: &[u8]) -> Self {
        if data.starts_with(b"%PDF-") {
            Self::Pdf
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Self::Jpeg
        } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Self::Png
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Self::Webp
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Self::Gif
        } else if data.starts_with(b"BM") {
            Self::Bmp
        } else if data.starts_with(b"II*\0") || data.starts_with(b"MM\0*") {
            Self::Tiff
        } else if data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0]) {
            // OLE2 compound file (legacy .doc)
            Self::Word
        } else {
            Self::Unknown
        }
    }

    /// Sniff `data`, falling back to the file name for Word documents.
    /// `.docx` files are zip containers with no magic of their own.
    pub fn detect(file_name: &str, data: &[u8]) -> Self {
        match Self::sniff(data) {
            Self::Unknown => {
                let by_name = file_name
                    .rsplit_once('.')
                    .map(|(_, ext)| Self::from_extension(ext))
                    .unwrap_or(Self::Unknown);
                if by_name == Self::Word {
                    Self::Word
                } else {
                    Self::Unknown
                }
            }
            kind => kind,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(
            self,
            Self::Jpeg | Self::Png | Self::Webp | Self::Gif | Self::Bmp | Self::Tiff
        )
    }
}

/// Output format for the image compressor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormatChoice {
    #[default]
    Jpeg,
    Png,
    Webp,
}

impl ImageFormatChoice {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
        }
    }
}

impl FromStr for ImageFormatChoice {
    type Err = BlattwerkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" | "image/jpeg" => Ok(Self::Jpeg),
            "png" | "image/png" => Ok(Self::Png),
            "webp" | "image/webp" => Ok(Self::Webp),
            other => Err(BlattwerkError::InvalidOption(format!(
                "unknown image format '{other}' (expected jpeg, png or webp)"
            ))),
        }
    }
}

/// Where an overlay image is stamped on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayPlacement {
    Header,
    Footer,
}
