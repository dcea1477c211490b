//! Booklet assembly
//!
//! This module turns an [`ImpositionSequence`] into a PDF:
//! 1. Open the source document
//! 2. Convert each source page used into a Form XObject
//! 3. Draw two slots per output page, one output page per sheet side
//! 4. Save the result without ever leaving a partial file at the target path

mod io;
mod sheet;
mod xobject;

pub use io::{SourceDocument, load_pdf, open_source, save_pdf};

use crate::layout::FaceLayout;
use crate::options::BookletOptions;
use crate::plan::SignaturePlan;
use crate::sequence::{ImpositionSequence, sequence};
use crate::stats::{BookletStatistics, calculate_statistics};
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId};
use sheet::render_side;
use std::path::{Path, PathBuf};
use xobject::FormCache;

/// Outcome of a successful [`make_booklet`] run
#[derive(Debug, Clone, PartialEq)]
pub struct BookletReport {
    pub output_file: PathBuf,
    pub statistics: BookletStatistics,
}

/// Build the output document for `sequence` in memory
pub fn assemble(
    source: &SourceDocument,
    sequence: &ImpositionSequence,
    settings: &SheetSettings,
) -> Result<Document> {
    if sequence.is_empty() {
        return Err(BookletError::EmptyPlan);
    }

    let layout = FaceLayout::new(settings)?;
    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();
    let mut cache = FormCache::new();
    let mut page_refs = Vec::with_capacity(sequence.output_page_count());

    for side in sequence.sides() {
        let page_id = render_side(
            &mut output,
            source,
            side,
            &layout,
            settings,
            pages_tree_id,
            &mut cache,
        )?;
        page_refs.push(Object::Reference(page_id));
    }

    finalize_document(&mut output, pages_tree_id, page_refs);
    Ok(output)
}

/// Assemble and save a booklet.
///
/// Any failure, whether building the document or writing it, is reported as
/// [`BookletError::OutputWrite`] for `path`.
pub async fn write_booklet(
    source: &SourceDocument,
    sequence: &ImpositionSequence,
    settings: &SheetSettings,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let source = source.clone();
    let sequence = sequence.clone();
    let settings = *settings;

    let document = tokio::task::spawn_blocking(move || assemble(&source, &sequence, &settings))
        .await
        .map_err(|e| BookletError::output_write(path, e.into()))?
        .map_err(|e| BookletError::output_write(path, e))?;

    save_pdf(document, path)
        .await
        .map_err(|e| BookletError::output_write(path, e))
}

/// Run the whole pipeline described by `options`
pub async fn make_booklet(options: &BookletOptions) -> Result<BookletReport> {
    options.validate()?;

    let source = open_source(&options.input_file).await?;
    let range = options.resolve_range(source.page_count())?;
    let plan = SignaturePlan::from_parts(options.signature_config()?, range);
    log::info!(
        "Imposing {} into {} signature(s) of {} sheet(s), {} blank page(s)",
        range,
        plan.signature_count(),
        plan.sheets_per_signature(),
        plan.last_signature_blank_count()
    );

    let sequence = sequence(&plan, options.rotate_back_side)?;
    write_booklet(
        &source,
        &sequence,
        &options.sheet_settings(),
        &options.output_file,
    )
    .await?;
    log::info!("Wrote {}", options.output_file.display());

    Ok(BookletReport {
        output_file: options.output_file.clone(),
        statistics: calculate_statistics(&plan, source.page_count()),
    })
}

/// Create pages tree and catalog
fn finalize_document(output: &mut Document, pages_tree_id: ObjectId, page_refs: Vec<Object>) {
    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));

    output.trailer.set("Root", catalog_id);
}
