// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image compressor — best-effort re-encoding of an image under a target file
// size, trading JPEG quality first and pixel dimensions second.

use blattwerk_core::error::BlattwerkError;
use blattwerk_core::types::ImageFormatChoice;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::processor::ImageProcessor;

const START_QUALITY: u8 = 90;
const QUALITY_STEP: u8 = 10;
const MAX_SHRINK_ROUNDS: u32 = 10;
/// Neither side is shrunk below this many pixels.
const MIN_SIDE: u32 = 16;

/// Knobs for [`ImageCompressor::compress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressionOptions {
    /// Size budget in KiB. Must be non-zero.
    pub target_kb: u32,
    /// Longest allowed side before any size search starts.
    pub max_dimension: u32,
    pub format: ImageFormatChoice,
    /// Lowest JPEG quality the search will try.
    pub min_quality: u8,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            target_kb: 500,
            max_dimension: 1920,
            format: ImageFormatChoice::Jpeg,
            min_quality: 10,
        }
    }
}

/// Result of a compression run.
#[derive(Debug, Clone)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: ImageFormatChoice,
    /// JPEG quality used; `None` for lossless formats.
    pub quality: Option<u8>,
}

impl CompressedImage {
    pub fn size_kb(&self) -> f64 {
        self.bytes.len() as f64 / 1024.0
    }
}

/// Stateless compressor.
pub struct ImageCompressor;

impl ImageCompressor {
    /// Re-encode `data` as `options.format`, aiming for at most
    /// `options.target_kb` KiB.
    ///
    /// Returns the smallest encoding found, which may still exceed the target
    /// when the image cannot be squeezed further.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn compress(
        data: &[u8],
        options: &CompressionOptions,
    ) -> Result<CompressedImage, BlattwerkError> {
        if options.target_kb == 0 {
            return Err(BlattwerkError::InvalidOption(
                "target size must be at least 1 KB".to_string(),
            ));
        }
        let target_bytes = options.target_kb as usize * 1024;
        let qualities = quality_ladder(options.format, options.min_quality);

        let mut processor = ImageProcessor::from_bytes(data)?.fit_within(options.max_dimension);
        let mut best: Option<CompressedImage> = None;

        for round in 0..=MAX_SHRINK_ROUNDS {
            for &quality in &qualities {
                let bytes = processor.encode(options.format, quality.unwrap_or(START_QUALITY))?;
                let size = bytes.len();
                debug!(
                    round,
                    ?quality,
                    width = processor.width(),
                    height = processor.height(),
                    size,
                    "Encoded candidate"
                );

                if best.as_ref().is_none_or(|current| size < current.bytes.len()) {
                    best = Some(CompressedImage {
                        bytes,
                        width: processor.width(),
                        height: processor.height(),
                        format: options.format,
                        quality,
                    });
                }
                if size <= target_bytes {
                    break;
                }
            }

            let within_target = best
                .as_ref()
                .is_some_and(|current| current.bytes.len() <= target_bytes);
            if within_target || round == MAX_SHRINK_ROUNDS {
                break;
            }

            let width = processor.width() * 9 / 10;
            let height = processor.height() * 9 / 10;
            if width < MIN_SIDE || height < MIN_SIDE {
                break;
            }
            processor = processor.resize_exact(width, height);
        }

        let result = best.ok_or_else(|| {
            BlattwerkError::ImageError("no encoding was produced".to_string())
        })?;

        if result.bytes.len() > target_bytes {
            warn!(
                size = result.bytes.len(),
                target_bytes, "Could not reach target size, returning smallest result"
            );
        } else {
            info!(
                size = result.bytes.len(),
                width = result.width,
                height = result.height,
                quality = ?result.quality,
                "Image compressed"
            );
        }
        Ok(result)
    }
}

/// JPEG qualities to try, highest first; lossless formats get a single pass.
fn quality_ladder(format: ImageFormatChoice, min_quality: u8) -> Vec<Option<u8>> {
    if format != ImageFormatChoice::Jpeg {
        return vec![None];
    }
    let floor = min_quality.clamp(1, START_QUALITY);
    let mut ladder = vec![Some(START_QUALITY)];
    let mut quality = START_QUALITY;
    while quality > floor {
        quality = quality.saturating_sub(QUALITY_STEP).max(floor);
        ladder.push(Some(quality));
    }
    ladder
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::sample_png;

    /// Deterministic high-entropy PNG that JPEG cannot shrink much.
    fn noisy_png(size: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(size, size, |x, y| {
            let v = x.wrapping_mul(2_654_435_761) ^ y.wrapping_mul(40_503) ^ (x * y);
            image::Rgb([v as u8, (v >> 8) as u8, (v >> 16) as u8])
        });
        let mut buffer = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn quality_ladder_steps_down_to_floor() {
        assert_eq!(
            quality_ladder(ImageFormatChoice::Jpeg, 10),
            [90, 80, 70, 60, 50, 40, 30, 20, 10].map(Some).to_vec()
        );
        assert_eq!(
            quality_ladder(ImageFormatChoice::Jpeg, 65),
            [90, 80, 70, 65].map(Some).to_vec()
        );
        assert_eq!(quality_ladder(ImageFormatChoice::Png, 10), vec![None]);
    }

    #[test]
    fn generous_target_keeps_first_quality() {
        let options = CompressionOptions {
            target_kb: 10_000,
            ..CompressionOptions::default()
        };
        let result = ImageCompressor::compress(&sample_png(64, 48), &options).unwrap();
        assert_eq!(result.quality, Some(90));
        assert_eq!((result.width, result.height), (64, 48));
        assert_eq!(&result.bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn downscales_to_max_dimension_first() {
        let options = CompressionOptions {
            target_kb: 10_000,
            max_dimension: 50,
            ..CompressionOptions::default()
        };
        let result = ImageCompressor::compress(&sample_png(200, 100), &options).unwrap();
        assert_eq!((result.width, result.height), (50, 25));
    }

    #[test]
    fn tight_target_shrinks_dimensions() {
        let options = CompressionOptions {
            target_kb: 2,
            ..CompressionOptions::default()
        };
        let result = ImageCompressor::compress(&noisy_png(512), &options).unwrap();
        assert!(result.width < 512);
        assert!(result.width >= MIN_SIDE && result.height >= MIN_SIDE);
        assert!(result.quality.is_some());
    }

    #[test]
    fn lossless_formats_report_no_quality() {
        let options = CompressionOptions {
            target_kb: 10_000,
            format: ImageFormatChoice::Png,
            ..CompressionOptions::default()
        };
        let result = ImageCompressor::compress(&sample_png(32, 32), &options).unwrap();
        assert_eq!(result.quality, None);
        assert_eq!(&result.bytes[..4], b"\x89PNG");
    }

    #[test]
    fn zero_target_is_rejected() {
        let options = CompressionOptions {
            target_kb: 0,
            ..CompressionOptions::default()
        };
        assert!(matches!(
            ImageCompressor::compress(&sample_png(8, 8), &options),
            Err(BlattwerkError::InvalidOption(_))
        ));
    }
}
