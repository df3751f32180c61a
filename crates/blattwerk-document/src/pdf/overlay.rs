// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Header/footer stamping — draws an image across the top and/or bottom edge of
// every page in a document.
//
// The image is embedded once per document as an RGB JPEG XObject. Each page
// gets the XObject in its resources plus one extra content stream; the page's
// existing content is bracketed with q/Q so its graphics state cannot leak
// into the stamp.

use blattwerk_core::OverlayPlacement;
use blattwerk_core::error::BlattwerkError;
use blattwerk_core::types::DocumentKind;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info, instrument, warn};

use crate::image::processor::ImageProcessor;

/// JPEG quality used when embedding stamp images.
const STAMP_JPEG_QUALITY: u8 = 90;

/// Page size assumed when no /MediaBox can be found (US Letter).
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

const MAX_TREE_DEPTH: usize = 64;

/// A decoded stamp image, ready to embed.
#[derive(Debug, Clone)]
pub struct OverlayImage {
    /// Baseline RGB JPEG encoding of the image.
    jpeg: Vec<u8>,
    width: u32,
    height: u32,
}

impl OverlayImage {
    /// Decode any supported raster image and re-encode it for embedding.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BlattwerkError> {
        let processor = ImageProcessor::from_bytes(data)?;
        let (width, height) = (processor.width(), processor.height());
        if width == 0 || height == 0 {
            return Err(BlattwerkError::ImageError(
                "stamp image has no pixels".to_string(),
            ));
        }
        let jpeg = processor.to_jpeg_bytes(STAMP_JPEG_QUALITY)?;
        Ok(Self {
            jpeg,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Placement rectangle `(x, y, w, h)` in points on a page of the given size.
    ///
    /// Pixels count as points. The image is shrunk to the page width if wider,
    /// keeping its aspect ratio; headers sit flush with the top edge, footers
    /// with the bottom.
    pub fn placement(
        &self,
        placement: OverlayPlacement,
        page_width: f32,
        page_height: f32,
    ) -> (f32, f32, f32, f32) {
        let image_width = self.width as f32;
        let draw_width = page_width.min(image_width);
        let draw_height = self.height as f32 * (draw_width / image_width);
        let y = match placement {
            OverlayPlacement::Header => page_height - draw_height,
            OverlayPlacement::Footer => 0.0,
        };
        (0.0, y, draw_width, draw_height)
    }

    fn to_xobject(&self) -> Stream {
        let dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
            ("Width", Object::Integer(i64::from(self.width))),
            ("Height", Object::Integer(i64::from(self.height))),
            ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
            ("BitsPerComponent", Object::Integer(8)),
            ("Filter", Object::Name(b"DCTDecode".to_vec())),
        ]);
        Stream::new(dict, self.jpeg.clone())
    }
}

/// Optional header and footer images applied to every page.
#[derive(Debug, Clone, Default)]
pub struct HeaderFooter {
    pub header: Option<OverlayImage>,
    pub footer: Option<OverlayImage>,
}

impl HeaderFooter {
    /// Build from raw header/footer file bytes.
    ///
    /// PDF headers and footers are accepted at intake but cannot be drawn as a
    /// stamp; they are skipped with a warning.
    pub fn load(header: Option<&[u8]>, footer: Option<&[u8]>) -> Result<Self, BlattwerkError> {
        Ok(Self {
            header: load_stamp(OverlayPlacement::Header, header)?,
            footer: load_stamp(OverlayPlacement::Footer, footer)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.footer.is_none()
    }

    /// Stamp every page of `document`. Returns the number of pages touched.
    #[instrument(skip_all, fields(header = self.header.is_some(), footer = self.footer.is_some()))]
    pub fn apply(&self, document: &mut Document) -> Result<usize, BlattwerkError> {
        if self.is_empty() {
            return Ok(0);
        }

        let mut stamps: Vec<(OverlayPlacement, &'static str, &OverlayImage, ObjectId)> = Vec::new();
        if let Some(image) = &self.header {
            let id = document.add_object(image.to_xobject());
            stamps.push((OverlayPlacement::Header, "BwHeader", image, id));
        }
        if let Some(image) = &self.footer {
            let id = document.add_object(image.to_xobject());
            stamps.push((OverlayPlacement::Footer, "BwFooter", image, id));
        }

        let pages: Vec<ObjectId> = document.get_pages().into_values().collect();
        for &page_id in &pages {
            let [llx, lly, urx, ury] = effective_media_box(document, page_id);
            let (page_width, page_height) = (urx - llx, ury - lly);

            let mut operators = String::from("Q\n");
            for (placement, name, image, _) in &stamps {
                let (x, y, w, h) = image.placement(*placement, page_width, page_height);
                operators.push_str(&format!(
                    "q {w:.3} 0 0 {h:.3} {:.3} {:.3} cm /{name} Do Q\n",
                    x + llx,
                    y + lly
                ));
            }

            let mut resources = effective_resources(document, page_id);
            let mut xobjects = resources
                .get(b"XObject")
                .ok()
                .and_then(|obj| resolve_dictionary(document, obj))
                .cloned()
                .unwrap_or_else(Dictionary::new);
            for (_, name, _, xobject_id) in &stamps {
                xobjects.set(*name, Object::Reference(*xobject_id));
            }
            resources.set("XObject", Object::Dictionary(xobjects));

            let existing = match document
                .get_dictionary(page_id)
                .ok()
                .and_then(|page| page.get(b"Contents").ok())
            {
                Some(Object::Reference(id)) => vec![Object::Reference(*id)],
                Some(Object::Array(items)) => items.clone(),
                _ => Vec::new(),
            };

            let open_id = document.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
            let stamp_id =
                document.add_object(Stream::new(Dictionary::new(), operators.into_bytes()));

            let mut contents = Vec::with_capacity(existing.len() + 2);
            contents.push(Object::Reference(open_id));
            contents.extend(existing);
            contents.push(Object::Reference(stamp_id));

            let page = document.get_dictionary_mut(page_id).map_err(|err| {
                BlattwerkError::PdfError(format!("cannot update page {:?}: {}", page_id, err))
            })?;
            page.set("Resources", Object::Dictionary(resources));
            page.set("Contents", Object::Array(contents));

            debug!(?page_id, page_width, page_height, "Page stamped");
        }

        info!(pages = pages.len(), stamps = stamps.len(), "Header/footer applied");
        Ok(pages.len())
    }
}

fn load_stamp(
    placement: OverlayPlacement,
    data: Option<&[u8]>,
) -> Result<Option<OverlayImage>, BlattwerkError> {
    let Some(data) = data else {
        return Ok(None);
    };
    match DocumentKind::sniff(data) {
        DocumentKind::Pdf => {
            warn!(?placement, "PDF stamps are not drawn; skipping");
            Ok(None)
        }
        _ => OverlayImage::from_bytes(data).map(Some),
    }
}

fn resolve_dictionary<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match object {
        Object::Dictionary(dict) => Some(dict),
        Object::Reference(id) => document.get_dictionary(*id).ok(),
        _ => None,
    }
}

/// Walk from the page up through its ancestors, returning the first value
/// stored under `key`.
fn inherited<'a>(document: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = Some(page_id);
    let mut depth = 0;
    while let Some(id) = node {
        if depth >= MAX_TREE_DEPTH {
            break;
        }
        let dict = document.get_dictionary(id).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value);
        }
        node = dict.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }
    None
}

/// A copy of the page's resource dictionary, resolving references and
/// inheritance, so it can be stored inline on the page.
fn effective_resources(document: &Document, page_id: ObjectId) -> Dictionary {
    inherited(document, page_id, b"Resources")
        .and_then(|obj| resolve_dictionary(document, obj))
        .cloned()
        .unwrap_or_else(Dictionary::new)
}

fn effective_media_box(document: &Document, page_id: ObjectId) -> [f32; 4] {
    let values = match inherited(document, page_id, b"MediaBox") {
        Some(Object::Array(items)) => items.clone(),
        Some(Object::Reference(id)) => match document.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    let numbers: Vec<f32> = values.iter().filter_map(number).collect();
    match numbers.as_slice() {
        [llx, lly, urx, ury] => [*llx, *lly, *urx, *ury],
        _ => DEFAULT_MEDIA_BOX,
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::{page_text, sample_pdf, sample_png};
    use crate::pdf::save_to_bytes;

    #[test]
    fn header_is_flush_with_top_and_scaled_to_page() {
        let image = OverlayImage::from_bytes(&sample_png(1224, 100)).unwrap();
        let (x, y, w, h) = image.placement(OverlayPlacement::Header, 612.0, 792.0);
        assert_eq!((x, w), (0.0, 612.0));
        assert!((h - 50.0).abs() < 0.01);
        assert!((y - 742.0).abs() < 0.01);

        let (_, y, w, h) = image.placement(OverlayPlacement::Footer, 612.0, 792.0);
        assert_eq!(y, 0.0);
        assert_eq!(w, 612.0);
        assert!((h - 50.0).abs() < 0.01);
    }

    #[test]
    fn narrow_image_keeps_native_size() {
        let image = OverlayImage::from_bytes(&sample_png(200, 40)).unwrap();
        let (_, y, w, h) = image.placement(OverlayPlacement::Header, 612.0, 792.0);
        assert_eq!((w, h), (200.0, 40.0));
        assert_eq!(y, 752.0);
    }

    #[test]
    fn stamps_every_page() {
        let mut doc = Document::load_mem(&sample_pdf(3)).unwrap();
        let overlay = HeaderFooter::load(Some(&sample_png(64, 16)), Some(&sample_png(64, 8)))
            .unwrap();
        assert_eq!(overlay.apply(&mut doc).unwrap(), 3);

        let reloaded = Document::load_mem(&save_to_bytes(&mut doc).unwrap()).unwrap();
        for (number, page_id) in reloaded.get_pages() {
            let page = reloaded.get_dictionary(page_id).unwrap();
            let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
            let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
            assert!(xobjects.has(b"BwHeader"));
            assert!(xobjects.has(b"BwFooter"));
            // Inherited font survived the move to inline resources.
            assert!(resources.has(b"Font"));

            let text = page_text(&reloaded, number);
            assert!(text.contains("/BwHeader Do"));
            assert!(text.contains("/BwFooter Do"));
            assert!(text.contains(&format!("Page {number}")));
        }
    }

    #[test]
    fn pdf_stamps_are_skipped() {
        let overlay = HeaderFooter::load(Some(&sample_pdf(1)), None).unwrap();
        assert!(overlay.is_empty());

        let mut doc = Document::load_mem(&sample_pdf(2)).unwrap();
        assert_eq!(overlay.apply(&mut doc).unwrap(), 0);
    }

    #[test]
    fn garbage_stamp_is_an_image_error() {
        assert!(matches!(
            HeaderFooter::load(Some(b"definitely not an image"), None),
            Err(BlattwerkError::ImageError(_))
        ));
    }
}
