// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page copier — builds a fresh document out of pages taken from one or more
// source documents.
//
// Each copied page drags along everything it references (content streams,
// fonts, images, annotations). Cloning is memoised per source document, so a
// resource shared by several pages is copied once and reference cycles
// terminate.

use std::collections::HashMap;

use blattwerk_core::error::BlattwerkError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, warn};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against malformed, cyclic /Parent chains.
const MAX_TREE_DEPTH: usize = 64;

/// Accumulates copied pages into a new document.
///
/// ```ignore
/// let mut copier = PageCopier::new("1.7");
/// copier.copy_pages(&source, 1..=3)?;
/// let mut document = copier.finish();
/// ```
pub struct PageCopier {
    target: Document,
    /// Object id reserved for the target's /Pages root; written by `finish`.
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl PageCopier {
    /// Start an empty target document with the given PDF version.
    pub fn new(version: &str) -> Self {
        let mut target = Document::with_version(version);
        let pages_id = target.new_object_id();
        Self {
            target,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Number of pages copied so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Append the given 1-indexed pages of `source`, in iteration order.
    ///
    /// Returns how many pages were copied.
    pub fn copy_pages(
        &mut self,
        source: &Document,
        page_numbers: impl IntoIterator<Item = u32>,
    ) -> Result<usize, BlattwerkError> {
        let pages = source.get_pages();
        let selected = page_numbers
            .into_iter()
            .map(|number| {
                pages.get(&number).copied().ok_or_else(|| {
                    BlattwerkError::PdfError(format!(
                        "page {} not found (document has {} pages)",
                        number,
                        pages.len()
                    ))
                })
            })
            .collect::<Result<Vec<ObjectId>, _>>()?;

        // Reserve ids for every selected page up front so references between
        // them (link annotations, /P back-pointers) resolve to the copies.
        let mut mapping: HashMap<ObjectId, ObjectId> = HashMap::new();
        for &page_id in &selected {
            let new_id = self.target.new_object_id();
            mapping.insert(page_id, new_id);
        }

        for &page_id in &selected {
            let mut page = source
                .get_dictionary(page_id)
                .map_err(|err| {
                    BlattwerkError::PdfError(format!(
                        "cannot read page object {:?}: {}",
                        page_id, err
                    ))
                })?
                .clone();
            inherit_attributes(source, &mut page);
            page.remove(b"Parent");

            let mut cloned = self.clone_dictionary(source, &page, &mut mapping)?;
            cloned.set("Parent", Object::Reference(self.pages_id));

            let new_id = mapping[&page_id];
            self.target.objects.insert(new_id, Object::Dictionary(cloned));
            self.kids.push(new_id);
        }

        debug!(
            copied = selected.len(),
            objects = mapping.len(),
            "Pages copied"
        );
        Ok(selected.len())
    }

    /// Write the page tree and catalog and hand back the finished document.
    pub fn finish(mut self) -> Document {
        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(self.kids.len() as i64)),
            (
                "Kids",
                Object::Array(self.kids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
        ]);
        self.target
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.target.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.target.trailer.set("Root", Object::Reference(catalog_id));

        self.target
    }

    // -- Graph cloning --------------------------------------------------------

    fn clone_object(
        &mut self,
        source: &Document,
        object: &Object,
        mapping: &mut HashMap<ObjectId, ObjectId>,
    ) -> Result<Object, BlattwerkError> {
        match object {
            Object::Reference(id) => self.import_reference(source, *id, mapping),
            Object::Dictionary(dict) => Ok(Object::Dictionary(
                self.clone_dictionary(source, dict, mapping)?,
            )),
            Object::Array(items) => {
                let mut cloned = Vec::with_capacity(items.len());
                for item in items {
                    cloned.push(self.clone_object(source, item, mapping)?);
                }
                Ok(Object::Array(cloned))
            }
            Object::Stream(stream) => {
                let mut cloned = stream.clone();
                cloned.dict = self.clone_dictionary(source, &stream.dict, mapping)?;
                Ok(Object::Stream(cloned))
            }
            other => Ok(other.clone()),
        }
    }

    fn clone_dictionary(
        &mut self,
        source: &Document,
        dict: &Dictionary,
        mapping: &mut HashMap<ObjectId, ObjectId>,
    ) -> Result<Dictionary, BlattwerkError> {
        let mut cloned = Dictionary::new();
        for (key, value) in dict.iter() {
            let value = self.clone_object(source, value, mapping)?;
            cloned.set(key.clone(), value);
        }
        Ok(cloned)
    }

    /// Copy a referenced object into the target, returning the new reference.
    ///
    /// Page-tree nodes that are not part of the copy become `null`.
    fn import_reference(
        &mut self,
        source: &Document,
        id: ObjectId,
        mapping: &mut HashMap<ObjectId, ObjectId>,
    ) -> Result<Object, BlattwerkError> {
        if let Some(&mapped) = mapping.get(&id) {
            return Ok(Object::Reference(mapped));
        }

        let object = match source.get_object(id) {
            Ok(object) => object,
            Err(err) => {
                warn!(?id, %err, "Cannot resolve reference, using Null");
                return Ok(Object::Null);
            }
        };
        if is_page_tree_node(object) {
            return Ok(Object::Null);
        }

        let new_id = self.target.new_object_id();
        mapping.insert(id, new_id);
        let cloned = self.clone_object(source, object, mapping)?;
        self.target.objects.insert(new_id, cloned);
        Ok(Object::Reference(new_id))
    }
}

/// Copy inheritable attributes down from the page's ancestors when the page
/// does not set them itself.
fn inherit_attributes(source: &Document, page: &mut Dictionary) {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if depth >= MAX_TREE_DEPTH {
            warn!("Page tree deeper than {MAX_TREE_DEPTH} levels, stopping inheritance walk");
            break;
        }
        let Ok(node) = source.get_dictionary(node_id) else {
            break;
        };
        for key in INHERITABLE_KEYS {
            if !page.has(key) {
                if let Ok(value) = node.get(key) {
                    page.set(key.to_vec(), value.clone());
                }
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }
}

fn is_page_tree_node(object: &Object) -> bool {
    let Object::Dictionary(dict) = object else {
        return false;
    };
    dict.get(b"Type")
        .and_then(Object::as_name)
        .map(|name| name == b"Page" || name == b"Pages")
        .unwrap_or(false)
}
