use lopdf::{Dictionary, Document, Object, Stream};
use pdf_booklet::*;
use std::path::{Path, PathBuf};

/// Create a test PDF with the specified number of pages
fn create_test_pdf(num_pages: usize) -> Document {
    let mut doc = Document::with_version("1.7");

    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for i in 0..num_pages {
        let content = format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]));
        kids.push(Object::Reference(page_id));
    }

    // MediaBox is inherited from the page tree root
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

/// A one-page PDF with the given content stream and optional `/Rotate`
fn create_single_page_pdf(content: Stream, rotate: Option<i64>) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(content);

    let mut page = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ]),
        ),
        ("Contents", Object::Reference(content_id)),
    ]);
    if let Some(rotate) = rotate {
        page.set("Rotate", Object::Integer(rotate));
    }
    let page_id = doc.add_object(page);

    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(vec![Object::Reference(page_id)])),
            ("Count", Object::Integer(1)),
        ])),
    );
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Form XObjects of an assembled document
fn forms(doc: &Document) -> Vec<&Stream> {
    doc.objects
        .values()
        .filter_map(|object| object.as_stream().ok())
        .filter(|stream| {
            stream
                .dict
                .get(b"Subtype")
                .and_then(|subtype| subtype.as_name())
                .map(|name| name == b"Form")
                .unwrap_or(false)
        })
        .collect()
}

fn write_test_pdf(dir: &Path, name: &str, num_pages: usize) -> PathBuf {
    let path = dir.join(name);
    let mut writer = Vec::new();
    create_test_pdf(num_pages).save_to(&mut writer).unwrap();
    std::fs::write(&path, writer).unwrap();
    path
}

fn source(num_pages: usize) -> SourceDocument {
    SourceDocument::from_document("test.pdf", create_test_pdf(num_pages))
}

fn page_contents(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .values()
        .map(|id| String::from_utf8(doc.get_page_content(*id).unwrap()).unwrap())
        .collect()
}

#[test]
fn test_output_page_count() {
    let plan = SignaturePlan::compute(2, 1, 10).unwrap();
    let seq = sequence(&plan, false).unwrap();

    let output = assemble(&source(10), &seq, &SheetSettings::default()).unwrap();

    // 2 signatures x 2 sheets x 2 sides
    assert_eq!(output.get_pages().len(), 8);
    assert_eq!(output.get_pages().len(), seq.output_page_count());
}

#[test]
fn test_output_pages_are_landscape_sheets() {
    let plan = SignaturePlan::compute(1, 1, 4).unwrap();
    let seq = sequence(&plan, false).unwrap();
    let settings = SheetSettings {
        paper_size: PaperSize::Letter,
        ..Default::default()
    };

    let output = assemble(&source(4), &seq, &settings).unwrap();

    for id in output.get_pages().values() {
        let page = output.get_dictionary(*id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        let width = media_box[2].as_float().unwrap();
        let height = media_box[3].as_float().unwrap();
        assert!((width - 792.0).abs() < 0.5);
        assert!((height - 612.0).abs() < 0.5);
    }
}

#[test]
fn test_blank_slots_draw_nothing() {
    // One page in a 2-sheet signature: the inner sheet is entirely blank
    let plan = SignaturePlan::compute(2, 1, 1).unwrap();
    let seq = sequence(&plan, false).unwrap();

    let output = assemble(&source(1), &seq, &SheetSettings::default()).unwrap();
    let contents = page_contents(&output);

    assert_eq!(contents.len(), 4);
    assert!(contents[0].contains("/R Do"));
    assert!(!contents[0].contains("/L Do"));
    assert!(!contents[1].contains("Do"));
    assert!(!contents[2].contains("Do"));
    assert!(!contents[3].contains("Do"));
}

#[test]
fn test_source_pages_are_shared_forms() {
    let plan = SignaturePlan::compute(1, 1, 4).unwrap();
    let seq = sequence(&plan, false).unwrap();

    let output = assemble(&source(4), &seq, &SheetSettings::default()).unwrap();

    let forms = forms(&output).len();
    assert_eq!(forms, 4);
}

#[test]
fn test_hex_encoded_source_content_is_not_drawn_as_operators() {
    let encoded = b"302030206D203130203130206C2053>".to_vec();
    let content = Stream::new(
        Dictionary::from_iter(vec![("Filter", Object::Name(b"ASCIIHexDecode".to_vec()))]),
        encoded.clone(),
    );
    let doc = SourceDocument::from_document("hex.pdf", create_single_page_pdf(content, None));
    let plan = SignaturePlan::compute(1, 1, 1).unwrap();
    let seq = sequence(&plan, false).unwrap();

    let output = assemble(&doc, &seq, &SheetSettings::default()).unwrap();
    let forms = forms(&output);
    assert_eq!(forms.len(), 1);

    let form = forms[0];
    match form.dict.get(b"Filter") {
        Ok(filter) => {
            assert_eq!(filter.as_name().unwrap(), b"ASCIIHexDecode");
            assert_eq!(form.content, encoded);
        }
        Err(_) => assert_eq!(form.content, b"0 0 m 10 10 l S"),
    }
}

#[test]
fn test_rotated_source_page_is_placed_turned() {
    let content = Stream::new(Dictionary::new(), b"0 0 m 10 10 l S".to_vec());
    let doc = SourceDocument::from_document(
        "rotated.pdf",
        create_single_page_pdf(content, Some(90)),
    );
    let plan = SignaturePlan::compute(1, 1, 1).unwrap();
    let seq = sequence(&plan, false).unwrap();

    let output = assemble(&doc, &seq, &SheetSettings::default()).unwrap();
    let forms = forms(&output);
    assert_eq!(forms.len(), 1);

    let matrix: Vec<f32> = forms[0]
        .dict
        .get(b"Matrix")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_float().unwrap())
        .collect();
    assert_eq!(matrix, vec![0.0, -1.0, 1.0, 0.0, 0.0, 612.0]);
}

#[test]
fn test_rotated_back_side() {
    let plan = SignaturePlan::compute(1, 1, 4).unwrap();
    let seq = sequence(&plan, true).unwrap();

    let output = assemble(&source(4), &seq, &SheetSettings::default()).unwrap();
    let contents = page_contents(&output);

    // Upright front, 180° back
    assert!(!contents[0].contains("re W n -"));
    assert_eq!(contents[1].matches("re W n -").count(), 2);
}

#[test]
fn test_fold_line() {
    let plan = SignaturePlan::compute(1, 1, 4).unwrap();
    let seq = sequence(&plan, false).unwrap();

    let plain = assemble(&source(4), &seq, &SheetSettings::default()).unwrap();
    assert!(
        page_contents(&plain)
            .iter()
            .all(|content| !content.contains("[6 3] 0 d"))
    );

    let settings = SheetSettings {
        fold_line: true,
        ..Default::default()
    };
    let marked = assemble(&source(4), &seq, &settings).unwrap();
    assert!(
        page_contents(&marked)
            .iter()
            .all(|content| content.contains("[6 3] 0 d"))
    );
}

#[test]
fn test_page_outside_source_is_rejected() {
    let plan = SignaturePlan::compute(1, 1, 8).unwrap();
    let seq = sequence(&plan, false).unwrap();

    let result = assemble(&source(4), &seq, &SheetSettings::default());
    assert!(matches!(result, Err(BookletError::InvalidRange(_))));
}

#[test]
fn test_degenerate_margins_are_rejected() {
    let plan = SignaturePlan::compute(1, 1, 4).unwrap();
    let seq = sequence(&plan, false).unwrap();
    let settings = SheetSettings {
        margins: SheetMargins::uniform(500.0),
        ..Default::default()
    };

    let result = assemble(&source(4), &seq, &settings);
    assert!(matches!(result, Err(BookletError::Config(_))));
}

#[tokio::test]
async fn test_open_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_test_pdf(dir.path(), "input.pdf", 6);

    let source = open_source(&path).await.unwrap();
    assert_eq!(source.page_count(), 6);
    assert_eq!(source.path(), path.as_path());
    assert!(source.page_id(6).is_some());
    assert!(source.page_id(7).is_none());
}

#[tokio::test]
async fn test_open_missing_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.pdf");

    match open_source(&path).await {
        Err(BookletError::SourceOpen { path: failed, .. }) => assert_eq!(failed, path),
        other => panic!("Expected SourceOpen error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_open_corrupt_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.pdf");
    std::fs::write(&path, b"this is not a pdf").unwrap();

    let result = open_source(&path).await;
    assert!(matches!(result, Err(BookletError::SourceOpen { .. })));
}

#[tokio::test]
async fn test_save_pdf_leaves_no_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saved.pdf");

    save_pdf(create_test_pdf(2), &path).await.unwrap();

    let loaded = Document::load(&path).unwrap();
    assert_eq!(loaded.get_pages().len(), 2);
    assert!(!dir.path().join("saved.pdf.part").exists());
}

#[tokio::test]
async fn test_write_booklet() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("booklet.pdf");
    let plan = SignaturePlan::compute(1, 2, 7).unwrap();
    let seq = sequence(&plan, false).unwrap();

    write_booklet(&source(8), &seq, &SheetSettings::default(), &path)
        .await
        .unwrap();

    let written = Document::load(&path).unwrap();
    assert_eq!(written.get_pages().len(), 4);
}

#[tokio::test]
async fn test_write_booklet_to_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("booklet.pdf");
    let plan = SignaturePlan::compute(1, 1, 4).unwrap();
    let seq = sequence(&plan, false).unwrap();

    let result = write_booklet(&source(4), &seq, &SheetSettings::default(), &path).await;

    assert!(matches!(result, Err(BookletError::OutputWrite { .. })));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_make_booklet() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_test_pdf(dir.path(), "input.pdf", 10);
    let output = dir.path().join("booklet.pdf");

    let options = BookletOptions {
        input_file: input,
        output_file: output.clone(),
        sheets_per_signature: 2,
        rotate_back_side: true,
        fold_line: true,
        ..Default::default()
    };

    let report = make_booklet(&options).await.unwrap();

    assert_eq!(report.output_file, output);
    assert_eq!(report.statistics.source_pages, 10);
    assert_eq!(report.statistics.signatures, 2);
    assert_eq!(report.statistics.blank_pages_added, 6);

    let written = Document::load(&output).unwrap();
    assert_eq!(written.get_pages().len(), report.statistics.output_pages);
}

#[tokio::test]
async fn test_make_booklet_page_subset() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_test_pdf(dir.path(), "input.pdf", 20);
    let output = dir.path().join("booklet.pdf");

    let options = BookletOptions {
        input_file: input,
        output_file: output.clone(),
        first_page: Some(5),
        last_page: Some(100),
        sheets_per_signature: 1,
        ..Default::default()
    };

    let report = make_booklet(&options).await.unwrap();

    // Pages 5-20 after clamping
    assert_eq!(report.statistics.selected_pages, 16);
    assert_eq!(report.statistics.signatures, 4);
    assert_eq!(Document::load(&output).unwrap().get_pages().len(), 8);
}

#[tokio::test]
async fn test_make_booklet_empty_source() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_test_pdf(dir.path(), "empty.pdf", 0);
    let output = dir.path().join("booklet.pdf");

    let options = BookletOptions {
        input_file: input,
        output_file: output.clone(),
        ..Default::default()
    };

    let result = make_booklet(&options).await;
    assert!(matches!(result, Err(BookletError::NoPages)));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_make_booklet_validation_fails() {
    let options = BookletOptions::default();
    let result = make_booklet(&options).await;
    assert!(matches!(result, Err(BookletError::Config(_))));
}
