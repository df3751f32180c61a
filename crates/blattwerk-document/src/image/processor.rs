// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode, resize, and re-encode in-memory images using the
// `image` crate.

use blattwerk_core::error::BlattwerkError;
use blattwerk_core::types::ImageFormatChoice;
use image::{DynamicImage, ImageFormat};
use image::imageops::FilterType;
use tracing::{debug, info, instrument};

/// Image processing pipeline operating on a single in-memory image.
///
/// Transformations consume `self` and return a new `ImageProcessor`, so calls
/// chain:
///
/// ```ignore
/// let jpeg = ImageProcessor::open("photo.png")?
///     .fit_within(1920)
///     .to_jpeg_bytes(80)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, BlattwerkError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            BlattwerkError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, BlattwerkError> {
        let img = image::load_from_memory(data).map_err(|err| {
            BlattwerkError::ImageError(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    // -- Transformations ------------------------------------------------------

    /// Shrink the image so neither side exceeds `max_dimension`, keeping the
    /// aspect ratio. Images already small enough are returned untouched.
    #[instrument(skip(self))]
    pub fn fit_within(self, max_dimension: u32) -> Self {
        let (width, height) = (self.image.width(), self.image.height());
        if max_dimension == 0 || (width <= max_dimension && height <= max_dimension) {
            return self;
        }
        let resized = self
            .image
            .resize(max_dimension, max_dimension, FilterType::Lanczos3);
        debug!(
            from_w = width,
            from_h = height,
            new_w = resized.width(),
            new_h = resized.height(),
            "Downscaled to fit"
        );
        Self { image: resized }
    }

    /// Resize the image to exactly `width` x `height`, ignoring aspect ratio.
    pub fn resize_exact(self, width: u32, height: u32) -> Self {
        let resized = self
            .image
            .resize_exact(width, height, FilterType::Lanczos3);
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, BlattwerkError> {
        encode_to_format(&self.image, ImageFormat::Png)
    }

    /// Encode the current image as baseline RGB JPEG bytes with the given
    /// quality (1-100). Transparent pixels are flattened onto white.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, BlattwerkError> {
        let mut buffer = Vec::new();
        let rgb = if self.image.color().has_alpha() {
            flatten_on_white(&self.image.to_rgba8())
        } else {
            self.image.to_rgb8()
        };
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        rgb.write_with_encoder(encoder)
            .map_err(|err| BlattwerkError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Encode the current image as lossless WebP bytes.
    pub fn to_webp_bytes(&self) -> Result<Vec<u8>, BlattwerkError> {
        let rgba = DynamicImage::ImageRgba8(self.image.to_rgba8());
        encode_to_format(&rgba, ImageFormat::WebP)
    }

    /// Encode in the requested output format. `quality` only applies to JPEG.
    pub fn encode(&self, format: ImageFormatChoice, quality: u8) -> Result<Vec<u8>, BlattwerkError> {
        match format {
            ImageFormatChoice::Jpeg => self.to_jpeg_bytes(quality),
            ImageFormatChoice::Png => self.to_png_bytes(),
            ImageFormatChoice::Webp => self.to_webp_bytes(),
        }
    }
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, BlattwerkError> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| BlattwerkError::ImageError(format!("image encoding failed: {}", err)))?;
    Ok(buffer)
}

fn flatten_on_white(rgba: &image::RgbaImage) -> image::RgbImage {
    image::RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |c: u8| ((c as u32 * a as u32 + 255 * (255 - a as u32)) / 255) as u8;
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}
