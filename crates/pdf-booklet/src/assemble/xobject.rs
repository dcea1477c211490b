//! Source pages as Form XObjects
//!
//! Each source page is copied into the output once, as a Form XObject that
//! the sheet renderer can draw with any transform. Objects reachable from a
//! page's resources are copied on demand and shared between pages.

use crate::constants::DEFAULT_PAGE_DIMENSIONS;
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

/// Page tree depth beyond which inherited attributes are no longer searched
const MAX_INHERITANCE_DEPTH: usize = 32;

/// A source page copied into the output document
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PageForm {
    pub id: ObjectId,
    /// Page box as the form draws it, after any page rotation:
    /// `[x0, y0, x1, y1]`
    pub bbox: [f32; 4],
}

impl PageForm {
    pub fn width(&self) -> f32 {
        self.bbox[2] - self.bbox[0]
    }

    pub fn height(&self) -> f32 {
        self.bbox[3] - self.bbox[1]
    }
}

/// Source-to-output object id mapping, kept for a whole assembly run so
/// shared fonts and images are copied once.
#[derive(Debug, Default)]
pub(crate) struct FormCache {
    copied: HashMap<ObjectId, ObjectId>,
    forms: HashMap<ObjectId, PageForm>,
}

impl FormCache {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Get the Form XObject for a source page, creating it on first use
pub(crate) fn page_form(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    cache: &mut FormCache,
) -> Result<PageForm> {
    if let Some(form) = cache.forms.get(&page_id) {
        log::debug!("Reusing form {:?} for source page {:?}", form.id, page_id);
        return Ok(*form);
    }

    let page_dict = source.get_dictionary(page_id)?;
    let bbox = page_box(source, page_id);
    let rotation = page_rotation(source, page_id);
    let content = page_content(source, page_dict)?;

    let mut form_dict = Dictionary::new();
    form_dict.set("Type", Object::Name(b"XObject".to_vec()));
    form_dict.set("Subtype", Object::Name(b"Form".to_vec()));
    form_dict.set("FormType", Object::Integer(1));
    form_dict.set(
        "BBox",
        Object::Array(bbox.iter().map(|&v| Object::Real(v)).collect()),
    );
    if let Some(matrix) = rotation_matrix(bbox, rotation) {
        form_dict.set(
            "Matrix",
            Object::Array(matrix.iter().map(|&v| Object::Real(v)).collect()),
        );
    }
    for (key, value) in content.encoding {
        form_dict.set(key, value);
    }

    if let Some(resources) = inherited(source, page_id, b"Resources") {
        let resources = resources.clone();
        form_dict.set(
            "Resources",
            copy_deep(output, source, &resources, &mut cache.copied)?,
        );
    }

    let form = PageForm {
        id: output.add_object(Stream::new(form_dict, content.data)),
        bbox: displayed_box(bbox, rotation),
    };
    cache.forms.insert(page_id, form);
    Ok(form)
}

/// Visible page box, falling back to US Letter when none is declared.
///
/// `CropBox` wins over `MediaBox`; both may be inherited from the page tree.
pub(crate) fn page_box(doc: &Document, page_id: ObjectId) -> [f32; 4] {
    [b"CropBox".as_slice(), b"MediaBox".as_slice()]
        .iter()
        .filter_map(|key| inherited(doc, page_id, key))
        .filter_map(|obj| rectangle(doc, obj))
        .next()
        .unwrap_or([
            0.0,
            0.0,
            DEFAULT_PAGE_DIMENSIONS.0,
            DEFAULT_PAGE_DIMENSIONS.1,
        ])
}

/// Look up a page attribute, walking up the `Parent` chain of the page tree
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Normalised `[x0, y0, x1, y1]` from a rectangle array (or a reference to one)
fn rectangle(doc: &Document, obj: &Object) -> Option<[f32; 4]> {
    let values: Vec<f32> = resolve(doc, obj)
        .as_array()
        .ok()?
        .iter()
        .filter_map(|v| number(resolve(doc, v)))
        .collect();
    let [x0, y0, x1, y1] = <[f32; 4]>::try_from(values).ok()?;
    let rect = [x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)];
    (rect[2] > rect[0] && rect[3] > rect[1]).then_some(rect)
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Follow a single reference, returning the object itself otherwise
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Content of a page ready to become a form stream
struct PageContent {
    data: Vec<u8>,
    /// `Filter`/`DecodeParms` entries for content kept in its encoded form
    encoding: Vec<(&'static str, Object)>,
}

/// Page content, with multiple content streams decoded and joined by
/// newlines. A page without content yields an empty stream.
///
/// A single stream in a filter lopdf cannot decode is passed through still
/// encoded, with its filter carried over. Undecodable streams in a page made
/// of several streams cannot be joined and are an error.
fn page_content(doc: &Document, page_dict: &Dictionary) -> Result<PageContent> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(PageContent {
            data: Vec::new(),
            encoding: Vec::new(),
        });
    };

    let streams: Vec<&Stream> = match resolve(doc, contents) {
        Object::Array(parts) => parts.iter().map(|part| resolve(doc, part)).collect(),
        single => vec![single],
    }
    .into_iter()
    .filter_map(|obj| obj.as_stream().ok())
    .collect();

    if let [stream] = streams.as_slice() {
        if stream.dict.has(b"Filter") {
            if let Err(e) = stream.decompressed_content() {
                log::debug!("Keeping page content encoded: {}", e);
                let keys: [(&'static str, &[u8]); 2] =
                    [("Filter", b"Filter"), ("DecodeParms", b"DecodeParms")];
                let encoding = keys
                    .into_iter()
                    .filter_map(|(name, key)| {
                        let value = stream.dict.get(key).ok()?;
                        Some((name, resolve(doc, value).clone()))
                    })
                    .collect();
                return Ok(PageContent {
                    data: stream.content.clone(),
                    encoding,
                });
            }
        }
    }

    let mut data = Vec::new();
    for stream in streams {
        let decoded = if stream.dict.has(b"Filter") {
            stream.decompressed_content()?
        } else {
            stream.content.clone()
        };
        if !data.is_empty() {
            data.push(b'\n');
        }
        data.extend_from_slice(&decoded);
    }
    Ok(PageContent {
        data,
        encoding: Vec::new(),
    })
}

/// Page `/Rotate` in clockwise degrees, normalised to 0, 90, 180 or 270
pub(crate) fn page_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    let Some(degrees) = inherited(doc, page_id, b"Rotate")
        .and_then(|obj| resolve(doc, obj).as_i64().ok())
    else {
        return 0;
    };
    let normalised = degrees.rem_euclid(360);
    if normalised % 90 != 0 {
        log::warn!("Ignoring /Rotate {} that is not a multiple of 90", degrees);
        return 0;
    }
    normalised
}

/// Form `/Matrix` that turns `bbox` clockwise by `rotation` degrees and moves
/// the result to the origin. `None` for an upright page.
fn rotation_matrix(bbox: [f32; 4], rotation: i64) -> Option<[f32; 6]> {
    let [x0, y0, x1, y1] = bbox;
    match rotation {
        90 => Some([0.0, -1.0, 1.0, 0.0, -y0, x1]),
        180 => Some([-1.0, 0.0, 0.0, -1.0, x1, y1]),
        270 => Some([0.0, 1.0, -1.0, 0.0, y1, -x0]),
        _ => None,
    }
}

/// The box a form with [`rotation_matrix`] applied occupies
fn displayed_box(bbox: [f32; 4], rotation: i64) -> [f32; 4] {
    let [x0, y0, x1, y1] = bbox;
    match rotation {
        90 | 270 => [0.0, 0.0, y1 - y0, x1 - x0],
        180 => [0.0, 0.0, x1 - x0, y1 - y0],
        _ => bbox,
    }
}

/// Copy an object from `source` into `output`, following references.
///
/// Referenced objects are allocated an id before their contents are copied,
/// so reference cycles terminate.
fn copy_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    copied: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = copied.get(id) {
                return Ok(Object::Reference(new_id));
            }
            let new_id = output.new_object_id();
            copied.insert(*id, new_id);

            let target = source.get_object(*id)?;
            let value = copy_deep(output, source, target, copied)?;
            output.objects.insert(new_id, value);
            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(
            output, source, dict, copied,
        )?)),
        Object::Array(items) => {
            let items = items
                .iter()
                .map(|item| copy_deep(output, source, item, copied))
                .collect::<Result<Vec<_>>>()?;
            Ok(Object::Array(items))
        }
        Object::Stream(stream) => {
            let dict = copy_dictionary(output, source, &stream.dict, copied)?;
            Ok(Object::Stream(Stream::new(dict, stream.content.clone())))
        }
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    copied: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary> {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_deep(output, source, value, copied)?);
    }
    Ok(new_dict)
}
