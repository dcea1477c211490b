//! Rendering one side of a booklet sheet

use super::io::SourceDocument;
use super::xobject::{FormCache, page_form};
use crate::constants::{FOLD_LINE_DASH, FOLD_LINE_WIDTH};
use crate::layout::{FaceLayout, Half, Placement, place_page};
use crate::sequence::{SidePair, Slot};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Add an output page for `side` and return its id
pub(crate) fn render_side(
    output: &mut Document,
    source: &SourceDocument,
    side: &SidePair,
    layout: &FaceLayout,
    settings: &SheetSettings,
    parent_pages_id: ObjectId,
    cache: &mut FormCache,
) -> Result<ObjectId> {
    let mut content_ops = Vec::new();
    let mut xobjects = Dictionary::new();

    for (half, slot) in [(Half::Left, side.left), (Half::Right, side.right)] {
        // Blank slots leave their half of the sheet empty
        let Slot::Page { number, rotated } = slot else {
            continue;
        };
        let page_id = source.page_id(number).ok_or_else(|| {
            BookletError::InvalidRange(format!(
                "page {number} is not in the {} page source",
                source.page_count()
            ))
        })?;

        let form = page_form(output, source.document(), page_id, cache)?;
        let name = match half {
            Half::Left => "L",
            Half::Right => "R",
        };
        xobjects.set(name, Object::Reference(form.id));

        let cell = layout.cell(half);
        let placement = place_page(
            &cell,
            half,
            form.width(),
            form.height(),
            settings.scaling_mode,
            rotated,
        );
        content_ops.push(format!(
            "q {} {} {} {} re W n {} /{} Do Q\n",
            cell.x,
            cell.y,
            cell.width,
            cell.height,
            placement_matrix(&placement, form.bbox),
            name
        ));
    }

    if settings.fold_line {
        content_ops.push(fold_line_ops(layout));
    }

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let content_id = output.add_object(Stream::new(
        Dictionary::new(),
        content_ops.concat().into_bytes(),
    ));

    let page_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(parent_pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(layout.width_pt),
                Object::Real(layout.height_pt),
            ]),
        ),
        ("Resources", Object::Dictionary(resources)),
        ("Contents", Object::Reference(content_id)),
    ]);
    Ok(output.add_object(page_dict))
}

/// `cm` operator mapping the form's bounding box onto the placement.
///
/// Rotated pages are turned 180° about the centre of the placement, so they
/// cover exactly the same area as an upright page would.
fn placement_matrix(placement: &Placement, bbox: [f32; 4]) -> String {
    let rect = &placement.content_rect;
    let s = placement.scale;
    let [x0, y0, _, _] = bbox;
    if placement.rotated {
        format!(
            "{} 0 0 {} {} {} cm",
            -s,
            -s,
            rect.right() + s * x0,
            rect.top() + s * y0
        )
    } else {
        format!("{} 0 0 {} {} {} cm", s, s, rect.x - s * x0, rect.y - s * y0)
    }
}

/// Dashed line down the fold, inside the sheet margins
fn fold_line_ops(layout: &FaceLayout) -> String {
    let x = layout.fold_x();
    let bottom = layout.left.y;
    let top = layout.left.top();
    format!(
        "q 0 0 0 RG {} w {} {} {} m {} {} l S Q\n",
        FOLD_LINE_WIDTH, FOLD_LINE_DASH, x, bottom, x, top
    )
}
