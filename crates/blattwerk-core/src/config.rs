// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Toolkit configuration.

use serde::{Deserialize, Serialize};

use crate::types::{ImageFormatChoice, SplitMode};

/// Upload size limit applied at intake (50 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Persistent toolkit settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Split mode used when none is given on the command line.
    pub default_split_mode: SplitMode,
    /// Stamp header/footer images on split output when they are supplied.
    pub add_header_footer: bool,
    /// Largest input file accepted, in bytes.
    pub max_upload_bytes: u64,
    /// Target size for compressed images, in KiB.
    pub image_target_kb: u32,
    /// Longest edge for compressed images, in pixels.
    pub image_max_dimension: u32,
    /// Output format for compressed images.
    pub image_format: ImageFormatChoice,
    /// Lowest JPEG quality the compressor will try.
    pub jpeg_min_quality: u8,
    /// Write a `manifest.json` next to the outputs.
    pub write_manifest: bool,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            default_split_mode: SplitMode::AfterPage,
            add_header_footer: true,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            image_target_kb: 500,
            image_max_dimension: 1920,
            image_format: ImageFormatChoice::Jpeg,
            jpeg_min_quality: 10,
            write_manifest: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: ToolkitConfig =
            serde_json::from_str(r#"{ "image_target_kb": 200, "image_format": "webp" }"#).unwrap();
        assert_eq!(config.image_target_kb, 200);
        assert_eq!(config.image_format, ImageFormatChoice::Webp);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(config.add_header_footer);
    }
}
